//! Publish Options

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Options for the publish use case
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Staging root holding `content/<deployment>`
    pub staging: PathBuf,
    /// Shared directory of published revisions
    pub publish_root: PathBuf,
    /// Deployment to publish
    pub deployment: String,
    /// Stamp written into the updated deployment properties
    pub published_at: DateTime<Utc>,
}

impl PublishOptions {
    pub fn new(
        staging: impl Into<PathBuf>,
        publish_root: impl Into<PathBuf>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            staging: staging.into(),
            publish_root: publish_root.into(),
            deployment: deployment.into(),
            published_at: Utc::now(),
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = published_at;
        self
    }

    /// `<staging>/content/<deployment>`
    pub fn deployment_dir(&self) -> PathBuf {
        self.staging.join("content").join(&self.deployment)
    }
}
