//! Console Event Sink
//!
//! Human-readable progress lines for interactive runs.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{BuildEvent, BuildEventSink};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stderr(verbose: bool) -> Self {
        Self::with_writer(io::stderr(), verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }

    fn line(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{text}");
        }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        match event {
            BuildEvent::Started {
                deployment,
                generation,
                package_count,
            } => self.line(format!(
                "Building {deployment} for {generation} ({package_count} packages)"
            )),
            BuildEvent::FirmwareExported { source } => {
                self.line(format!("  firmware   {}", source.display()))
            }
            BuildEvent::PackageStarted { index, package } => {
                self.line(format!("  [{}] {package}", index + 1))
            }
            BuildEvent::PackageCompleted { .. } => {}
            BuildEvent::AssetSkipped {
                package,
                item,
                reason,
            } => match package {
                Some(package) => self.line(format!("  ! {package}: skipped {item}: {reason}")),
                None => self.line(format!("  ! skipped {item}: {reason}")),
            },
            BuildEvent::Warning { message } => self.line(format!("  ! {message}")),
            BuildEvent::Completed {
                deployment,
                package_count,
                skipped_count,
            } => {
                if skipped_count == 0 {
                    self.line(format!("Staged {deployment}: {package_count} packages"))
                } else {
                    self.line(format!(
                        "Staged {deployment}: {package_count} packages, {skipped_count} items skipped"
                    ))
                }
            }
            BuildEvent::PublishStarted {
                deployment,
                revision,
            } => self.line(format!("Publishing {deployment} as revision {revision}")),
            BuildEvent::Published {
                deployment,
                revision,
                archive,
            } => self.line(format!(
                "Published {deployment}-{revision}: {}",
                archive.display()
            )),
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
