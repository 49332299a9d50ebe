//! Domain Services
//!
//! Stateless logic that spans several entities.

mod revision_allocator;

pub use revision_allocator::{next_revision, revision_of};
