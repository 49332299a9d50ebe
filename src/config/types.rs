//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DeviceGeneration;
use crate::error::TbResult;

use super::loader::{self, ConfigWarning};

/// Program identity written into every build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Program id; derived from the deployment name when empty
    #[serde(default)]
    pub id: String,

    /// Who runs the builds, recorded in the deployment properties
    #[serde(default)]
    pub operator: String,
}

/// Where a program's inputs and outputs live
///
/// Every entry except `staging` defaults to a directory inside the staging
/// root. A leading `~` expands to the home directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub staging: Option<PathBuf>,
    #[serde(default)]
    pub publish: Option<PathBuf>,
    #[serde(default)]
    pub tb_options: Option<PathBuf>,
    #[serde(default)]
    pub programspec: Option<PathBuf>,
    /// Root of the pre-encoded content tree
    #[serde(default)]
    pub content: Option<PathBuf>,
    /// Installation-wide `firmware.v2`/`system.v2` fallback
    #[serde(default)]
    pub software: Option<PathBuf>,
}

impl PathsConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn or_staging(&self, value: &Option<PathBuf>, default: &str) -> PathBuf {
        value
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| self.staging_dir().join(default))
    }

    pub fn publish_dir(&self) -> PathBuf {
        self.or_staging(&self.publish, "published")
    }

    pub fn tb_options_dir(&self) -> PathBuf {
        self.or_staging(&self.tb_options, "TB_Options")
    }

    pub fn programspec_dir(&self) -> PathBuf {
        self.or_staging(&self.programspec, "programspec")
    }

    pub fn content_dir(&self) -> PathBuf {
        self.or_staging(&self.content, "content-export")
    }

    pub fn software_dir(&self) -> Option<PathBuf> {
        self.software.as_deref().map(expand_home)
    }
}

/// Build defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub generation: DeviceGeneration,

    /// Share identical audio through the shadow pool
    #[serde(default = "default_true")]
    pub dedup: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            generation: DeviceGeneration::default(),
            dedup: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub program: ProgramConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> TbResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> TbResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Program id, or the part of `deployment` before the first `-`.
    pub fn program_id_for(&self, deployment: &str) -> String {
        if !self.program.id.is_empty() {
            return self.program.id.clone();
        }
        deployment
            .split('-')
            .next()
            .unwrap_or(deployment)
            .to_string()
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
