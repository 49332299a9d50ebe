//! Shadow pool bookkeeping
//!
//! On disk a deduplicated asset is one real file in the pool plus zero-byte
//! markers wherever a package needs it. The pool location depends only on the
//! category directory and file name, so the map below can always be
//! reconstructed from the tree. Keeping it explicit makes the "one real file,
//! N markers" rule checkable.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Identity of a pooled asset: the image-relative directory plus file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    category: PathBuf,
    file_name: String,
}

impl ContentKey {
    pub fn new(category: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            file_name: file_name.into(),
        }
    }

    pub fn category(&self) -> &Path {
        &self.category
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// `<pool_root>/<category>/<file_name>`
    pub fn pool_path(&self, pool_root: &Path) -> PathBuf {
        pool_root.join(&self.category).join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    pool_path: PathBuf,
    markers: BTreeSet<PathBuf>,
}

impl ShadowEntry {
    pub fn pool_path(&self) -> &Path {
        &self.pool_path
    }

    pub fn markers(&self) -> &BTreeSet<PathBuf> {
        &self.markers
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShadowMap {
    entries: BTreeMap<ContentKey, ShadowEntry>,
}

impl ShadowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `marker` refers to the pooled copy of `key`. Returns the
    /// pool path, which is identical for every marker of the same key.
    pub fn record(&mut self, key: ContentKey, pool_root: &Path, marker: PathBuf) -> PathBuf {
        let pool_path = key.pool_path(pool_root);
        let entry = self.entries.entry(key).or_insert_with(|| ShadowEntry {
            pool_path: pool_path.clone(),
            markers: BTreeSet::new(),
        });
        entry.markers.insert(marker);
        entry.pool_path.clone()
    }

    pub fn get(&self, key: &ContentKey) -> Option<&ShadowEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ContentKey, &ShadowEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn marker_count(&self) -> usize {
        self.entries.values().map(|e| e.markers.len()).sum()
    }
}
