//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file helpers, the shadow pool, `.rev` markers
//! - `repositories/` - Deployment files, program spec, content source, CSV and properties
//! - `generations/` - Per-generation build strategies (V1 convention, V2 indexed)
//! - `events/` - Build event sinks (JSON, tracing)
//! - `archive` - Zip archives of published deployments

pub mod archive;
pub mod events;
pub mod fs;
pub mod generations;
pub mod repositories;

// Re-export for convenience
pub use events::{JsonEventSink, TracingEventSink};
pub use generations::{all_generations, for_generation, ConventionGeneration, IndexedGeneration};
pub use repositories::{CsvProgramSpec, DirectoryContentSource};
