//! Build Session
//!
//! Mutable state of one build: the shadow pool, skipped assets, collected
//! package indexes. Strategies receive it alongside the immutable context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::PackageIndex;
use crate::domain::ports::{BuildEvent, BuildEventSink, ContentExporter, ExportError, ExportResult};
use crate::domain::value_objects::AudioFormat;
use crate::error::TbResult;
use crate::infrastructure::fs::Deduplicator;

/// An asset the build went on without
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIssue {
    pub package: Option<String>,
    pub item: String,
    pub reason: String,
}

pub struct BuildSession<'a> {
    exporter: &'a dyn ContentExporter,
    sink: Arc<dyn BuildEventSink>,
    dedup: Deduplicator,
    package: Option<String>,
    issues: Vec<BuildIssue>,
    indexes: Vec<PackageIndex>,
}

impl<'a> BuildSession<'a> {
    pub fn new(
        exporter: &'a dyn ContentExporter,
        sink: Arc<dyn BuildEventSink>,
        dedup: Deduplicator,
    ) -> Self {
        Self {
            exporter,
            sink,
            dedup,
            package: None,
            issues: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn exporter(&self) -> &'a dyn ContentExporter {
        self.exporter
    }

    pub fn deduplicator(&self) -> &Deduplicator {
        &self.dedup
    }

    pub fn emit(&self, event: BuildEvent) {
        self.sink.on_event(event);
    }

    /// Attribute following skips to `package`.
    pub fn begin_package(&mut self, package: &str) {
        self.package = Some(package.to_string());
    }

    pub fn end_package(&mut self) {
        self.package = None;
    }

    /// See `Deduplicator::resolve`.
    pub fn resolve(&mut self, marker_dir: &Path, category: &Path, file_name: &str) -> TbResult<PathBuf> {
        self.dedup.resolve(marker_dir, category, file_name)
    }

    /// See `Deduplicator::resolve_pair`.
    pub fn resolve_pair(
        &mut self,
        marker_dir: &Path,
        category: &Path,
        file_name: &str,
        partner: &str,
    ) -> TbResult<PathBuf> {
        self.dedup.resolve_pair(marker_dir, category, file_name, partner)
    }

    /// Run `export` into `target` unless it is already there. A failed export
    /// is recorded and the build carries on.
    pub fn export<F>(&mut self, target: &Path, export: F) -> bool
    where
        F: FnOnce(&dyn ContentExporter, &Path) -> ExportResult<()>,
    {
        let exporter = self.exporter;
        match Deduplicator::export_once(target, |t| export(exporter, t)) {
            Ok(exported) => exported,
            Err(e) => {
                self.skip(e);
                false
            }
        }
    }

    /// Export numbered system prompts for `language` into `marker_dir`.
    pub fn export_system_prompts<'p, I>(
        &mut self,
        marker_dir: &Path,
        category: &Path,
        prompts: I,
        language: &str,
        format: AudioFormat,
    ) -> TbResult<()>
    where
        I: IntoIterator<Item = &'p str>,
    {
        for prompt in prompts {
            let target = self.resolve(marker_dir, category, &format.file_name(prompt))?;
            self.export(&target, |e, t| {
                e.export_system_prompt(prompt, language, format, t)
            });
        }
        Ok(())
    }

    /// Export the `<category>` announcement and `i<category>` invitation of
    /// `package` into `marker_dir`. Returns the announcement's file name.
    pub fn export_category_pair(
        &mut self,
        marker_dir: &Path,
        category_dir: &Path,
        package: &str,
        category: &str,
        language: &str,
        format: AudioFormat,
    ) -> TbResult<String> {
        let file_name = format.file_name(category);
        let invitation = format.file_name(&format!("i{category}"));
        let target = self.resolve_pair(marker_dir, category_dir, &file_name, &invitation)?;
        let target_dir = target.parent().unwrap_or(marker_dir).to_path_buf();
        self.export(&target, |e, _| {
            e.export_category_prompts(package, category, language, format, &target_dir)
        });
        Ok(file_name)
    }

    /// Record a recoverable failure.
    pub fn skip(&mut self, error: ExportError) {
        let issue = BuildIssue {
            package: self.package.clone(),
            item: error.item().to_string(),
            reason: error.to_string(),
        };
        warn!(
            package = issue.package.as_deref().unwrap_or("-"),
            item = %issue.item,
            "{}",
            issue.reason
        );
        self.sink.on_event(BuildEvent::AssetSkipped {
            package: issue.package.clone(),
            item: issue.item.clone(),
            reason: issue.reason.clone(),
        });
        self.issues.push(issue);
    }

    /// Report a best-effort step that failed.
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.sink.on_event(BuildEvent::Warning { message });
    }

    pub fn push_index(&mut self, index: PackageIndex) {
        self.indexes.push(index);
    }

    pub fn indexes(&self) -> &[PackageIndex] {
        &self.indexes
    }

    pub fn issues(&self) -> &[BuildIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<BuildIssue> {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AudioItemRef;
    use crate::domain::ports::NoopEventSink;
    use crate::domain::value_objects::AudioFormat;
    use tempfile::tempdir;

    struct Failing;

    impl ContentExporter for Failing {
        fn export_audio_item(&self, item: &AudioItemRef, _: AudioFormat, _: &Path) -> ExportResult<()> {
            Err(ExportError::Conversion {
                item: item.id().to_string(),
                message: "bad frame".to_string(),
            })
        }

        fn export_system_prompt(&self, _: &str, _: &str, _: AudioFormat, _: &Path) -> ExportResult<()> {
            Ok(())
        }

        fn export_category_prompts(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: AudioFormat,
            _: &Path,
        ) -> ExportResult<()> {
            Ok(())
        }

        fn export_greeting(&self, _: &str, _: &str, _: AudioFormat, _: &Path) -> ExportResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn failed_export_is_recorded_against_the_package() {
        let dir = tempdir().unwrap();
        let exporter = Failing;
        let mut session = BuildSession::new(
            &exporter,
            Arc::new(NoopEventSink),
            Deduplicator::new(dir.path().join("pool"), false),
        );
        session.begin_package("P-EN");

        let item = AudioItemRef::new("id1");
        let exported = session.export(&dir.path().join("id1.mp3"), |e, t| {
            e.export_audio_item(&item, AudioFormat::Mp3, t)
        });

        assert!(!exported);
        assert_eq!(session.issues().len(), 1);
        assert_eq!(session.issues()[0].package.as_deref(), Some("P-EN"));
        assert_eq!(session.issues()[0].item, "id1");
    }

    #[test]
    fn existing_target_is_not_exported_again() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("7.mp3");
        std::fs::write(&target, "silence").unwrap();
        let exporter = Failing;
        let mut session = BuildSession::new(
            &exporter,
            Arc::new(NoopEventSink),
            Deduplicator::new(dir.path().join("pool"), false),
        );

        let exported = session.export(&target, |e, t| {
            e.export_audio_item(&AudioItemRef::new("x"), AudioFormat::Mp3, t)
        });
        assert!(!exported);
        assert!(session.issues().is_empty());
    }
}
