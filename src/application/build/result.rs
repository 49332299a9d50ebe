//! Build Result

use std::path::PathBuf;

use crate::domain::value_objects::DeviceGeneration;

use super::session::BuildIssue;

#[derive(Debug, Clone)]
pub struct BuildResult {
    pub deployment: String,
    pub generation: DeviceGeneration,
    /// `content/<deployment>` in the staging root
    pub deployment_dir: PathBuf,
    pub packages: Vec<String>,
    /// Assets the build went on without
    pub issues: Vec<BuildIssue>,
    /// Unpublished marker left in the staging root
    pub marker: String,
    /// Real files in the shadow pool
    pub pooled_files: usize,
    /// Zero-byte markers pointing into the pool
    pub pool_markers: usize,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        self.issues.is_empty()
    }
}
