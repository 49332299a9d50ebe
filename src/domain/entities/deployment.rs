//! Deployment specification
//!
//! The immutable description of what goes into one deployment. It is
//! produced by an external validator; the builder trusts it and only checks
//! structural invariants (non-empty names, unique package names).

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// Category holding recordings made by listeners
pub const CATEGORY_USER_FEEDBACK: &str = "9-0";
/// Category of the built-in device tutorial
pub const CATEGORY_TUTORIAL: &str = "$0-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("deployment name is empty")]
    EmptyDeploymentName,
    #[error("package name is empty in deployment '{deployment}'")]
    EmptyPackageName { deployment: String },
    #[error("package '{package}' has no language")]
    MissingLanguage { package: String },
    #[error("duplicate package '{package}' in deployment '{deployment}'")]
    DuplicatePackage { deployment: String, package: String },
    #[error("playlist with empty category in package '{package}'")]
    EmptyCategory { package: String },
}

/// Opaque reference to an audio item in the content repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioItemRef(String);

impl AudioItemRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AudioItemRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AudioItemRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AudioItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit short announcement and long invitation for a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistPrompts {
    pub short: AudioItemRef,
    pub long: AudioItemRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSpec {
    category: String,
    title: Option<String>,
    items: Vec<AudioItemRef>,
    prompts: Option<PlaylistPrompts>,
}

impl PlaylistSpec {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            title: None,
            items: Vec::new(),
            prompts: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AudioItemRef>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn with_prompts(mut self, short: AudioItemRef, long: AudioItemRef) -> Self {
        self.prompts = Some(PlaylistPrompts { short, long });
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Display title; falls back to the category id.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.category)
    }

    pub fn items(&self) -> &[AudioItemRef] {
        &self.items
    }

    pub fn prompts(&self) -> Option<&PlaylistPrompts> {
        self.prompts.as_ref()
    }

    pub fn is_user_feedback(&self) -> bool {
        self.category == CATEGORY_USER_FEEDBACK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: String,
    language: String,
    groups: Vec<String>,
    variant: Option<String>,
    playlists: Vec<PlaylistSpec>,
    intro: Option<AudioItemRef>,
    has_tutorial: bool,
    user_feedback_hidden: bool,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into().to_ascii_lowercase(),
            groups: Vec::new(),
            variant: None,
            playlists: Vec::new(),
            intro: None,
            has_tutorial: false,
            user_feedback_hidden: false,
        }
    }

    /// Group tags are lowercased and de-duplicated, keeping first occurrence.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group in groups {
            let group = group.as_ref().trim().to_ascii_lowercase();
            if !group.is_empty() && !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        self.variant = (!variant.is_empty()).then_some(variant);
        self
    }

    pub fn with_playlist(mut self, playlist: PlaylistSpec) -> Self {
        self.playlists.push(playlist);
        self
    }

    pub fn with_intro(mut self, intro: impl Into<AudioItemRef>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    pub fn with_tutorial(mut self, has_tutorial: bool) -> Self {
        self.has_tutorial = has_tutorial;
        self
    }

    pub fn with_user_feedback_hidden(mut self, hidden: bool) -> Self {
        self.user_feedback_hidden = hidden;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn playlists(&self) -> &[PlaylistSpec] {
        &self.playlists
    }

    pub fn intro(&self) -> Option<&AudioItemRef> {
        self.intro.as_ref()
    }

    pub fn has_tutorial(&self) -> bool {
        self.has_tutorial
    }

    pub fn user_feedback_hidden(&self) -> bool {
        self.user_feedback_hidden
    }

    pub fn user_feedback_public(&self) -> bool {
        !self.user_feedback_hidden
    }

    pub fn declares_category(&self, category: &str) -> bool {
        self.playlists.iter().any(|p| p.category() == category)
    }

    /// Declared categories in order, without repeats.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.playlists
            .iter()
            .map(PlaylistSpec::category)
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// `language` or `language,variant`, the key used in build properties
    pub fn language_key(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{},{}", self.language, variant),
            None => self.language.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSpec {
    name: String,
    number: u32,
    packages: Vec<PackageSpec>,
}

impl DeploymentSpec {
    /// Checks structural invariants. A `number` of 0 means "unknown".
    pub fn new(
        name: impl Into<String>,
        number: u32,
        packages: Vec<PackageSpec>,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpecError::EmptyDeploymentName);
        }
        let mut seen = HashSet::new();
        for package in &packages {
            if package.name().trim().is_empty() {
                return Err(SpecError::EmptyPackageName {
                    deployment: name.clone(),
                });
            }
            if package.language().is_empty() {
                return Err(SpecError::MissingLanguage {
                    package: package.name().to_string(),
                });
            }
            if package.playlists().iter().any(|p| p.category().is_empty()) {
                return Err(SpecError::EmptyCategory {
                    package: package.name().to_string(),
                });
            }
            if !seen.insert(package.name().to_ascii_lowercase()) {
                return Err(SpecError::DuplicatePackage {
                    deployment: name.clone(),
                    package: package.name().to_string(),
                });
            }
        }
        Ok(Self {
            name,
            number,
            packages,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn packages(&self) -> &[PackageSpec] {
        &self.packages
    }

    pub fn any_user_feedback_hidden(&self) -> bool {
        self.packages.iter().any(PackageSpec::user_feedback_hidden)
    }

    /// Languages in package order, without repeats.
    pub fn languages(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.packages
            .iter()
            .map(PackageSpec::language)
            .filter(|l| seen.insert(*l))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str) -> PackageSpec {
        PackageSpec::new(name, "en").with_playlist(PlaylistSpec::new("2-0").with_items(["id1"]))
    }

    #[test]
    fn duplicate_package_names_are_rejected() {
        let err = DeploymentSpec::new("TEST-24-1", 1, vec![package("A"), package("a")]).unwrap_err();
        assert_eq!(
            err,
            SpecError::DuplicatePackage {
                deployment: "TEST-24-1".to_string(),
                package: "a".to_string()
            }
        );
    }

    #[test]
    fn empty_deployment_name_is_rejected() {
        assert_eq!(
            DeploymentSpec::new("  ", 1, vec![]).unwrap_err(),
            SpecError::EmptyDeploymentName
        );
    }

    #[test]
    fn groups_are_normalized() {
        let pkg = PackageSpec::new("p", "EN").with_groups(["Default", "default", " north "]);
        assert_eq!(pkg.groups(), ["default", "north"]);
        assert_eq!(pkg.language(), "en");
    }

    #[test]
    fn playlist_title_defaults_to_category() {
        let playlist = PlaylistSpec::new("2-0");
        assert_eq!(playlist.title(), "2-0");
        assert_eq!(playlist.with_title("Health").title(), "Health");
    }

    #[test]
    fn categories_keep_declaration_order_without_repeats() {
        let pkg = PackageSpec::new("p", "en")
            .with_playlist(PlaylistSpec::new("3-0"))
            .with_playlist(PlaylistSpec::new("1-0"))
            .with_playlist(PlaylistSpec::new("3-0"));
        assert_eq!(pkg.categories(), ["3-0", "1-0"]);
    }

    #[test]
    fn language_key_includes_variant() {
        let pkg = PackageSpec::new("p", "en").with_variant("north");
        assert_eq!(pkg.language_key(), "en,north");
    }
}
