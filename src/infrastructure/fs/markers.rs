//! `.rev` marker files
//!
//! A directory holds at most one marker naming the state of the deployment
//! staged or published there. Writing a marker removes all others first.

use std::path::Path;

use crate::domain::value_objects::{RevisionMarker, MARKER_EXTENSION};
use crate::error::TbResult;

use super::local::{file_names, remove_file_if_exists, touch};

fn is_marker_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKER_EXTENSION))
}

/// Names of the `.rev` files directly in `dir`, sorted.
pub fn marker_file_names(dir: &Path) -> TbResult<Vec<String>> {
    Ok(file_names(dir)?
        .into_iter()
        .filter(|name| is_marker_file(name))
        .collect())
}

/// Markers in `dir` that parse; unrecognised `.rev` files are left out.
pub fn read_markers(dir: &Path) -> TbResult<Vec<RevisionMarker>> {
    Ok(marker_file_names(dir)?
        .iter()
        .filter_map(|name| RevisionMarker::parse(name))
        .collect())
}

/// Remove every `.rev` file in `dir`. Returns how many were removed.
pub fn clear_markers(dir: &Path) -> TbResult<usize> {
    let names = marker_file_names(dir)?;
    for name in &names {
        remove_file_if_exists(&dir.join(name))?;
    }
    Ok(names.len())
}

/// Replace whatever markers `dir` has with `marker`.
pub fn replace_marker(dir: &Path, marker: &RevisionMarker) -> TbResult<()> {
    clear_markers(dir)?;
    touch(&dir.join(marker.file_name()))
}
