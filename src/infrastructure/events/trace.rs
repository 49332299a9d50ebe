//! Tracing Event Sink
//!
//! Forwards build events to `tracing`, so they land in whatever subscriber
//! the binary installed.

use tracing::{debug, info, warn};

use crate::domain::ports::{BuildEvent, BuildEventSink};

#[derive(Debug, Default)]
pub struct TracingEventSink;

impl BuildEventSink for TracingEventSink {
    fn on_event(&self, event: BuildEvent) {
        match event {
            BuildEvent::Started {
                deployment,
                generation,
                package_count,
            } => info!(%deployment, %generation, package_count, "build started"),
            BuildEvent::FirmwareExported { source } => {
                info!(source = %source.display(), "firmware exported")
            }
            BuildEvent::PackageStarted { index, package } => {
                debug!(index, %package, "package started")
            }
            BuildEvent::PackageCompleted { index, package } => {
                debug!(index, %package, "package completed")
            }
            BuildEvent::AssetSkipped {
                package,
                item,
                reason,
            } => warn!(package = package.as_deref().unwrap_or("-"), %item, %reason, "asset skipped"),
            BuildEvent::Warning { message } => warn!("{message}"),
            BuildEvent::Completed {
                deployment,
                package_count,
                skipped_count,
            } => info!(%deployment, package_count, skipped_count, "build completed"),
            BuildEvent::PublishStarted {
                deployment,
                revision,
            } => info!(%deployment, %revision, "publishing"),
            BuildEvent::Published {
                deployment,
                revision,
                archive,
            } => info!(%deployment, %revision, archive = %archive.display(), "published"),
        }
    }

    fn wants_detailed_events(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }
}
