//! Content deduplication
//!
//! With dedup on, a package directory only receives a zero-byte marker and the
//! real bytes go to `<pool_root>/<category>/<file>`, shared by every package
//! of the build. The caller exports to the returned path only when nothing is
//! there yet, which collapses repeated references into a single write.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ContentKey, ShadowMap};
use crate::error::TbResult;

use super::local::{create_dir_all, touch};

#[derive(Debug)]
pub struct Deduplicator {
    pool_root: PathBuf,
    enabled: bool,
    shadows: ShadowMap,
}

impl Deduplicator {
    pub fn new(pool_root: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            pool_root: pool_root.into(),
            enabled,
            shadows: ShadowMap::new(),
        }
    }

    pub fn shadows(&self) -> &ShadowMap {
        &self.shadows
    }

    /// Where to export `file_name`, which must end up in `marker_dir`.
    ///
    /// `category` is the image-relative directory (`content/messages`,
    /// `languages/en/cat`, ...); it alone decides the pool location.
    pub fn resolve(&mut self, marker_dir: &Path, category: &Path, file_name: &str) -> TbResult<PathBuf> {
        create_dir_all(marker_dir)?;
        let marker = marker_dir.join(file_name);
        if !self.enabled {
            return Ok(marker);
        }
        touch(&marker)?;
        let key = ContentKey::new(category, file_name);
        let pool_path = self.shadows.record(key, &self.pool_root, marker);
        if let Some(parent) = pool_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(pool_path)
    }

    /// Like `resolve`, for an announcement and its invitation. Both markers
    /// are in place before the caller checks whether the pair needs export.
    pub fn resolve_pair(
        &mut self,
        marker_dir: &Path,
        category: &Path,
        file_name: &str,
        partner: &str,
    ) -> TbResult<PathBuf> {
        let primary = self.resolve(marker_dir, category, file_name)?;
        self.resolve(marker_dir, category, partner)?;
        Ok(primary)
    }

    /// Run `export` unless `target` already exists. Returns whether it ran.
    pub fn export_once<E, F>(target: &Path, export: F) -> Result<bool, E>
    where
        F: FnOnce(&Path) -> Result<(), E>,
    {
        if target.exists() {
            return Ok(false);
        }
        export(target).map(|()| true)
    }
}
