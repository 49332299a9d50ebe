//! Domain Layer
//!
//! Pure description of deployments, device indexes, revisions and the
//! dedup bookkeeping. No filesystem access happens here; the ports module
//! defines the boundaries that infrastructure implements.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
