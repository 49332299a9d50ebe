//! Publish Use Case
//!
//! 1. Pick the next revision from the names in the publish root
//! 2. Move the publish-root marker to that revision
//! 3. Stamp the revision into the staged properties (best-effort)
//! 4. Copy the program spec, zip the deployment, merge metadata
//! 5. Mark the staging root as published

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::build::{METADATA_DIR, PROGRAMSPEC_DIR};
use crate::domain::ports::{BuildEvent, BuildEventSink, NoopEventSink};
use crate::domain::services::next_revision;
use crate::domain::value_objects::{Revision, RevisionMarker};
use crate::error::{TbError, TbResult};
use crate::infrastructure::archive::zip_dir;
use crate::infrastructure::fs::{copy_dir_all, create_dir_all, entry_names, replace_marker};
use crate::infrastructure::repositories::merge_metadata_dirs;
use crate::infrastructure::repositories::properties::{
    DeploymentProperties, DEPLOYMENT_INFO_PROPERTIES, DEPLOYMENT_NAME, DEPLOYMENT_REVISION,
};

use super::options::PublishOptions;
use super::result::PublishResult;

/// `content-<deployment>-<revision>.zip`
pub fn archive_name(deployment: &str, revision: &Revision) -> String {
    format!("content-{deployment}-{revision}.zip")
}

#[derive(Debug, Default)]
pub struct PublishUseCase;

impl PublishUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, options: &PublishOptions) -> TbResult<PublishResult> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    pub fn execute_with_events(
        &self,
        options: &PublishOptions,
        event_sink: Arc<dyn BuildEventSink>,
    ) -> TbResult<PublishResult> {
        let deployment = options.deployment.as_str();
        let deployment_dir = options.deployment_dir();
        if !deployment_dir.is_dir() {
            return Err(TbError::NotStaged {
                deployment: deployment.to_string(),
                path: deployment_dir,
            });
        }

        // Step 1: revision
        create_dir_all(&options.publish_root)?;
        let existing = entry_names(&options.publish_root)?;
        let revision = next_revision(deployment, existing.iter().map(String::as_str));
        info!(deployment, %revision, "publishing");
        event_sink.on_event(BuildEvent::PublishStarted {
            deployment: deployment.to_string(),
            revision: revision.clone(),
        });

        // Step 2: markers. The one inside the deployment travels in the zip.
        let marker = RevisionMarker::published(deployment, revision.clone());
        replace_marker(&options.publish_root, &marker)?;
        replace_marker(&deployment_dir, &marker)?;

        // Step 3: properties
        let mut warnings = Vec::new();
        let properties_path = deployment_dir
            .join(PROGRAMSPEC_DIR)
            .join(DEPLOYMENT_INFO_PROPERTIES);
        let stamped = DeploymentProperties::load(&properties_path).and_then(|mut props| {
            props.set(DEPLOYMENT_NAME, deployment);
            props.set(DEPLOYMENT_REVISION, revision.as_str());
            props.store(&properties_path, options.published_at)
        });
        if let Err(e) = stamped {
            let message = format!("unable to stamp revision into properties: {e}");
            warn!("{message}");
            event_sink.on_event(BuildEvent::Warning {
                message: message.clone(),
            });
            warnings.push(message);
        }

        // Step 4: published tree
        let publish_dir = options.publish_root.join(format!("{deployment}-{revision}"));
        create_dir_all(&publish_dir)?;
        let staged_spec = deployment_dir.join(PROGRAMSPEC_DIR);
        if staged_spec.is_dir() {
            copy_dir_all(&staged_spec, &publish_dir.join(PROGRAMSPEC_DIR))?;
        }
        let archive = publish_dir.join(archive_name(deployment, &revision));
        let archived_files = zip_dir(
            &deployment_dir,
            &format!("content/{deployment}"),
            &archive,
        )?;
        let metadata_files = merge_metadata_dirs(
            &deployment_dir.join(METADATA_DIR),
            &publish_dir.join(METADATA_DIR),
        )?;

        // Step 5: staging root now names the published revision
        replace_marker(&options.staging, &marker)?;

        event_sink.on_event(BuildEvent::Published {
            deployment: deployment.to_string(),
            revision: revision.clone(),
            archive: archive.clone(),
        });
        info!(
            deployment,
            %revision,
            files = archived_files,
            archive = %archive.display(),
            "published"
        );

        Ok(PublishResult {
            deployment: deployment.to_string(),
            revision,
            publish_dir,
            archive,
            archived_files,
            metadata_files,
            warnings,
        })
    }
}
