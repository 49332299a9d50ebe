//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod content_exporter;
pub mod program_spec;

pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink};
pub use content_exporter::{ContentExporter, ExportError, ExportResult};
pub use program_spec::ProgramSpecProvider;
