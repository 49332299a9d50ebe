//! JSON Event Sink
//!
//! Outputs build and publish events as NDJSON for automation.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        let json = match event {
            BuildEvent::Started {
                deployment,
                generation,
                package_count,
            } => serde_json::json!({
                "event": "start",
                "command": "build",
                "deployment": deployment,
                "generation": generation.as_str(),
                "package_count": package_count,
            }),

            BuildEvent::FirmwareExported { source } => serde_json::json!({
                "event": "firmware",
                "command": "build",
                "source": source.display().to_string(),
            }),

            BuildEvent::PackageStarted { index, package } => serde_json::json!({
                "event": "package_start",
                "command": "build",
                "index": index,
                "package": package,
            }),

            BuildEvent::PackageCompleted { index, package } => serde_json::json!({
                "event": "package_done",
                "command": "build",
                "index": index,
                "package": package,
            }),

            BuildEvent::AssetSkipped {
                package,
                item,
                reason,
            } => serde_json::json!({
                "event": "item_skipped",
                "command": "build",
                "package": package,
                "item": item,
                "reason": reason,
            }),

            BuildEvent::Warning { message } => serde_json::json!({
                "event": "warning",
                "message": message,
            }),

            BuildEvent::Completed {
                deployment,
                package_count,
                skipped_count,
            } => {
                let status = if skipped_count == 0 {
                    "success"
                } else {
                    "partial"
                };
                serde_json::json!({
                    "event": "complete",
                    "command": "build",
                    "status": status,
                    "deployment": deployment,
                    "packages": package_count,
                    "skipped": skipped_count,
                })
            }

            BuildEvent::PublishStarted {
                deployment,
                revision,
            } => serde_json::json!({
                "event": "start",
                "command": "publish",
                "deployment": deployment,
                "revision": revision.as_str(),
            }),

            BuildEvent::Published {
                deployment,
                revision,
                archive,
            } => serde_json::json!({
                "event": "complete",
                "command": "publish",
                "status": "success",
                "deployment": deployment,
                "revision": revision.as_str(),
                "archive": archive.display().to_string(),
            }),
        };

        self.write_event(json);
    }
}
