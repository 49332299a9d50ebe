//! Build Context
//!
//! Everything a build reads, resolved once before the first file is written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::entities::DeploymentSpec;
use crate::domain::value_objects::DeviceGeneration;

/// Directory of the pooled real files inside a deployment
pub const SHADOW_DIR: &str = "shadowFiles";
pub const PROGRAMSPEC_DIR: &str = "programspec";
pub const METADATA_DIR: &str = "metadata";

/// Input and output locations of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Staging root; deployments are built under `<staging>/content/`
    pub staging: PathBuf,
    /// Program options: firmware, system menus, config files, tutorial lists
    pub tb_options: PathBuf,
    /// Program specification directory, copied verbatim into the deployment
    pub programspec: PathBuf,
    /// Installation-wide fallback for `firmware.v2` and `system.v2`
    pub software: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BuildContext {
    program_id: String,
    operator: String,
    deployment: DeploymentSpec,
    generation: DeviceGeneration,
    dedup: bool,
    paths: BuildPaths,
    created_at: DateTime<Utc>,
}

impl BuildContext {
    pub fn new(
        program_id: impl Into<String>,
        deployment: DeploymentSpec,
        generation: DeviceGeneration,
        paths: BuildPaths,
    ) -> Self {
        Self {
            program_id: program_id.into(),
            operator: String::new(),
            deployment,
            generation,
            dedup: true,
            paths,
            created_at: Utc::now(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    /// Fix the build clock; used for stamps, marker names and CSV dates.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn deployment(&self) -> &DeploymentSpec {
        &self.deployment
    }

    pub fn deployment_name(&self) -> &str {
        self.deployment.name()
    }

    pub fn generation(&self) -> DeviceGeneration {
        self.generation
    }

    pub fn dedup(&self) -> bool {
        self.dedup
    }

    pub fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    pub fn tb_options(&self) -> &Path {
        &self.paths.tb_options
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `<staging>/content`
    pub fn content_root(&self) -> PathBuf {
        self.paths.staging.join("content")
    }

    /// `<staging>/content/<deployment>`
    pub fn deployment_dir(&self) -> PathBuf {
        self.content_root().join(self.deployment.name())
    }

    pub fn shadow_root(&self) -> PathBuf {
        self.deployment_dir().join(SHADOW_DIR)
    }

    pub fn staged_programspec_dir(&self) -> PathBuf {
        self.deployment_dir().join(PROGRAMSPEC_DIR)
    }

    /// `<deployment dir>/metadata/<deployment>`
    pub fn metadata_dir(&self) -> PathBuf {
        self.deployment_dir()
            .join(METADATA_DIR)
            .join(self.deployment.name())
    }
}
