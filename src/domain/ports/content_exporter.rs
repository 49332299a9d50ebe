//! Content export port
//!
//! The audio repository that turns item ids and prompt names into encoded
//! files. It can be slow and can fail per asset; failures are reported as
//! `ExportError` and never abort a build on their own.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::AudioItemRef;
use crate::domain::value_objects::AudioFormat;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("conversion of '{item}' failed: {message}")]
    Conversion { item: String, message: String },

    #[error("'{item}' is not available as {format}")]
    UnsupportedFormat { item: String, format: AudioFormat },

    #[error("no source for '{item}' (looked in {searched})")]
    MissingSource { item: String, searched: PathBuf },

    #[error("I/O error exporting '{item}': {source}")]
    Io {
        item: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// The item, prompt or greeting that failed
    pub fn item(&self) -> &str {
        match self {
            ExportError::Conversion { item, .. }
            | ExportError::UnsupportedFormat { item, .. }
            | ExportError::MissingSource { item, .. }
            | ExportError::Io { item, .. } => item,
        }
    }
}

/// Source of encoded audio
///
/// Implementations:
/// - `DirectoryContentSource`: copies pre-encoded files from a content tree
pub trait ContentExporter {
    /// Write one audio item, encoded as `format`, to `target`.
    fn export_audio_item(
        &self,
        item: &AudioItemRef,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<()>;

    /// Write a numbered system prompt (bell, silence, tutorial steps, ...)
    /// for `language` to `target`.
    fn export_system_prompt(
        &self,
        prompt: &str,
        language: &str,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<()>;

    /// Write the `<category>` announcement and its `i<category>` invitation
    /// into `target_dir`. Package-specific prompts win over the language's
    /// shared ones.
    fn export_category_prompts(
        &self,
        package: &str,
        category: &str,
        language: &str,
        format: AudioFormat,
        target_dir: &Path,
    ) -> ExportResult<()>;

    /// Write a recipient's custom greeting. Returns `false` when the
    /// recipient has none.
    fn export_greeting(
        &self,
        community: &str,
        language: &str,
        format: AudioFormat,
        target: &Path,
    ) -> ExportResult<bool>;
}
