//! TOML Deployment Spec Repository
//!
//! Loads `deployment.toml` into the domain model. The serde types stay here so
//! the domain entities carry no serialization concerns.

use std::path::Path;

use serde::Deserialize;

use crate::domain::entities::{AudioItemRef, DeploymentSpec, PackageSpec, PlaylistSpec};
use crate::error::{TbError, TbResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDeployment {
    name: String,
    #[serde(default)]
    number: u32,
    #[serde(default)]
    packages: Vec<TomlPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPackage {
    name: String,
    language: String,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    has_tutorial: bool,
    #[serde(default)]
    user_feedback_hidden: bool,
    #[serde(default)]
    playlists: Vec<TomlPlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPlaylist {
    category: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    short_prompt: Option<String>,
    #[serde(default)]
    long_prompt: Option<String>,
}

impl TomlPlaylist {
    fn into_domain(self, package: &str) -> Result<PlaylistSpec, String> {
        let mut playlist = PlaylistSpec::new(self.category).with_items(self.items);
        if let Some(title) = self.title {
            playlist = playlist.with_title(title);
        }
        match (self.short_prompt, self.long_prompt) {
            (Some(short), Some(long)) => {
                playlist = playlist.with_prompts(AudioItemRef::new(short), AudioItemRef::new(long))
            }
            (None, None) => {}
            _ => {
                return Err(format!(
                    "playlist '{}' in package '{}' needs both short_prompt and long_prompt",
                    playlist.category(),
                    package
                ))
            }
        }
        Ok(playlist)
    }
}

impl TomlPackage {
    fn into_domain(self) -> Result<PackageSpec, String> {
        let mut package = PackageSpec::new(&self.name, self.language)
            .with_groups(self.groups)
            .with_tutorial(self.has_tutorial)
            .with_user_feedback_hidden(self.user_feedback_hidden);
        if let Some(variant) = self.variant {
            package = package.with_variant(variant);
        }
        if let Some(intro) = self.intro {
            package = package.with_intro(intro);
        }
        for playlist in self.playlists {
            package = package.with_playlist(playlist.into_domain(&self.name)?);
        }
        Ok(package)
    }
}

/// Parse a deployment description from TOML text.
pub fn parse_deployment_spec(content: &str) -> Result<DeploymentSpec, String> {
    let raw: TomlDeployment = toml::from_str(content).map_err(|e| e.to_string())?;
    let packages = raw
        .packages
        .into_iter()
        .map(TomlPackage::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    DeploymentSpec::new(raw.name, raw.number, packages).map_err(|e| e.to_string())
}

/// Load `path` as a deployment description.
pub fn load_deployment_spec(path: &Path) -> TbResult<DeploymentSpec> {
    let content = std::fs::read_to_string(path).map_err(|source| TbError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_deployment_spec(&content).map_err(|message| TbError::InvalidSpecFile {
        path: path.to_path_buf(),
        message,
    })
}
