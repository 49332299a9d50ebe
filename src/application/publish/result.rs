//! Publish Result

use std::path::PathBuf;

use crate::domain::value_objects::Revision;

/// Result of a publish operation
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub deployment: String,
    pub revision: Revision,
    /// `<publish root>/<deployment>-<revision>`
    pub publish_dir: PathBuf,
    /// `content-<deployment>-<revision>.zip`
    pub archive: PathBuf,
    /// Files stored in the archive
    pub archived_files: usize,
    /// Metadata inputs merged into the published tree
    pub metadata_files: usize,
    /// Best-effort steps that failed
    pub warnings: Vec<String>,
}

impl PublishResult {
    /// `<deployment>-<revision>`
    pub fn published_name(&self) -> String {
        format!("{}-{}", self.deployment, self.revision)
    }
}
