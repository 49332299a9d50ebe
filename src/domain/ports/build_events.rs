//! Build Event Port
//!
//! Provides an observable interface for build and publish operations.
//! Skipped assets travel through here so the caller decides how loudly to
//! report them.

use std::path::PathBuf;

use crate::domain::value_objects::{DeviceGeneration, Revision};

/// Event emitted during build or publish
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// Build started
    Started {
        deployment: String,
        generation: DeviceGeneration,
        package_count: usize,
    },

    /// Firmware copied into the staged tree
    FirmwareExported { source: PathBuf },

    /// Package image started
    PackageStarted { index: usize, package: String },

    /// Package image finished
    PackageCompleted { index: usize, package: String },

    /// One asset could not be exported; the build continues without it
    AssetSkipped {
        package: Option<String>,
        item: String,
        reason: String,
    },

    /// A best-effort step failed and was ignored
    Warning { message: String },

    /// Build completed
    Completed {
        deployment: String,
        package_count: usize,
        skipped_count: usize,
    },

    /// Publish allocated a revision
    PublishStarted {
        deployment: String,
        revision: Revision,
    },

    /// Publish completed
    Published {
        deployment: String,
        revision: Revision,
        archive: PathBuf,
    },
}

/// Trait for receiving build events
///
/// Implementations can be:
/// - ConsoleEventSink: progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for automation
/// - TracingEventSink: forwards to `tracing`
/// - NoopEventSink: silent operation
pub trait BuildEventSink: Send + Sync {
    /// Handle a build event
    fn on_event(&self, event: BuildEvent);

    /// Whether this sink wants per-package events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
