//! Combine per-image descriptors
//!
//! Lets several images share one device: their `packages_data.txt` files are
//! merged into a single descriptor with one path table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::entities::PackageIndex;
use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::atomic_write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub output: PathBuf,
    pub packages: Vec<String>,
    pub paths: usize,
}

/// Parse every input, merge them, and write the result to `output`.
pub fn combine_index_files(
    inputs: &[PathBuf],
    deployment: &str,
    output: &Path,
    created_at: DateTime<Utc>,
) -> TbResult<CombineSummary> {
    let mut parts = Vec::with_capacity(inputs.len());
    for input in inputs {
        let text = fs::read_to_string(input).map_err(|source| TbError::Read {
            path: input.clone(),
            source,
        })?;
        let index = PackageIndex::parse(&text).map_err(|e| TbError::InvalidIndexFile {
            path: input.clone(),
            message: e.to_string(),
        })?;
        parts.push(index);
    }

    let combined = PackageIndex::combine(deployment, &parts)?;
    atomic_write(output, combined.render(created_at)?.as_bytes())?;

    let packages: Vec<String> = combined.packages().iter().map(|p| p.name.clone()).collect();
    info!(
        output = %output.display(),
        packages = packages.len(),
        paths = combined.paths().len(),
        "combined package index"
    );
    Ok(CombineSummary {
        output: output.to_path_buf(),
        packages,
        paths: combined.paths().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PackageRecord, PlaylistRecord};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn single(package: &str, language: &str) -> PackageIndex {
        let mut index = PackageIndex::new("TEST-24-1");
        let prompts = index.intern_path(&format!("content/prompts/{language}"));
        let announcement = index.audio_ref(&format!("content/prompts/{language}/7.mp3"), None);
        let short_prompt = index.audio_ref(&format!("content/prompts/{language}/2-0.mp3"), None);
        let long_prompt = index.audio_ref(&format!("content/prompts/{language}/i2-0.mp3"), None);
        let message = index.audio_ref("content/messages/id1.mp3", Some("id1"));
        index
            .add_package(PackageRecord {
                name: package.to_string(),
                announcement,
                prompt_paths: vec![prompts],
                playlists: vec![PlaylistRecord {
                    name: "2-0".to_string(),
                    short_prompt,
                    long_prompt,
                    messages: vec![message],
                }],
            })
            .unwrap();
        index
    }

    #[test]
    fn shared_directories_collapse() {
        let dir = tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 30).unwrap();
        let mut inputs = Vec::new();
        for (package, language) in [("TEST-24-1-en", "en"), ("TEST-24-1-fr", "fr")] {
            let path = dir.path().join(format!("{package}.txt"));
            fs::write(&path, single(package, language).render(at).unwrap()).unwrap();
            inputs.push(path);
        }

        let output = dir.path().join("out/packages_data.txt");
        let summary = combine_index_files(&inputs, "TEST-24-1", &output, at).unwrap();

        assert_eq!(summary.packages, ["TEST-24-1-en", "TEST-24-1-fr"]);
        // prompts/en, messages, prompts/fr
        assert_eq!(summary.paths, 3);
        let reread = PackageIndex::parse(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(reread.packages().len(), 2);
    }

    #[test]
    fn unreadable_input_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = combine_index_files(&[missing], "X", &dir.path().join("o.txt"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, TbError::Read { .. }));
    }
}
