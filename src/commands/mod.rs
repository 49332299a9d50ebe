//! Command handlers
//!
//! Each handler resolves configuration and flags into use-case inputs, runs
//! the use case, and prints a short summary unless JSON events were asked for.

mod build;
mod index;
mod publish;
mod status;

pub use build::cmd_build;
pub use index::cmd_index_combine;
pub use publish::cmd_publish;
pub use status::cmd_status;
