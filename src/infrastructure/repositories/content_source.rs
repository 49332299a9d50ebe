//! Directory Content Source
//!
//! A `ContentExporter` over a tree of already-encoded audio:
//!
//! ```text
//! <root>/messages/<id>.<ext>
//! <root>/languages/<lang>/<prompt>.<ext>
//! <root>/languages/<lang>/cat/<category>.<ext>      shared category prompts
//! <root>/packages/<package>/prompts/<category>.<ext> package overrides
//! <root>/communities/<dir>/languages/<lang>/10.<ext>
//! ```
//!
//! Encoding itself happens elsewhere; this source only finds and copies.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::entities::AudioItemRef;
use crate::domain::ports::{ContentExporter, ExportError, ExportResult};
use crate::domain::value_objects::AudioFormat;

/// Custom greeting prompt id
pub const GREETING_PROMPT: &str = "10";

#[derive(Debug, Clone)]
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `dir/<stem>.<ext>`, or why it can't be used.
    fn find(&self, item: &str, dir: &Path, stem: &str, format: AudioFormat) -> ExportResult<PathBuf> {
        let wanted = dir.join(format.file_name(stem));
        if wanted.is_file() {
            return Ok(wanted);
        }
        let other = match format {
            AudioFormat::A18 => AudioFormat::Mp3,
            AudioFormat::Mp3 => AudioFormat::A18,
        };
        if dir.join(other.file_name(stem)).is_file() {
            return Err(ExportError::UnsupportedFormat {
                item: item.to_string(),
                format,
            });
        }
        Err(ExportError::MissingSource {
            item: item.to_string(),
            searched: wanted,
        })
    }

    fn copy(item: &str, from: &Path, to: &Path) -> ExportResult<()> {
        trace!(from = %from.display(), to = %to.display(), "copy audio");
        let io_error = |source| ExportError::Io {
            item: item.to_string(),
            source,
        };
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::copy(from, to).map_err(io_error)?;
        Ok(())
    }
}

impl ContentExporter for DirectoryContentSource {
    fn export_audio_item(
        &self,
        item: &AudioItemRef,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<()> {
        let source = self.find(item.id(), &self.root.join("messages"), item.id(), format)?;
        Self::copy(item.id(), &source, target)
    }

    fn export_system_prompt(
        &self,
        prompt: &str,
        language: &str,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<()> {
        let dir = self.root.join("languages").join(language);
        let source = self.find(prompt, &dir, prompt, format)?;
        Self::copy(prompt, &source, target)
    }

    fn export_category_prompts(
        &self,
        package: &str,
        category: &str,
        language: &str,
        format: AudioFormat,
        target_dir: &Path,
    ) -> ExportResult<()> {
        let package_dir = self.root.join("packages").join(package).join("prompts");
        let shared_dir = self.root.join("languages").join(language).join("cat");
        let dir = if package_dir.join(format.file_name(category)).is_file() {
            package_dir
        } else {
            shared_dir
        };
        let invitation = format!("i{category}");
        let short = self.find(category, &dir, category, format)?;
        let long = self.find(&invitation, &dir, &invitation, format)?;
        Self::copy(category, &short, &target_dir.join(format.file_name(category)))?;
        Self::copy(&invitation, &long, &target_dir.join(format.file_name(&invitation)))
    }

    fn export_greeting(
        &self,
        community: &str,
        language: &str,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<bool> {
        let dir = self
            .root
            .join("communities")
            .join(community)
            .join("languages")
            .join(language);
        match self.find(community, &dir, GREETING_PROMPT, format) {
            Ok(source) => Self::copy(community, &source, target).map(|()| true),
            Err(ExportError::MissingSource { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
