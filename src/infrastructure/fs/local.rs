//! Local file operations
//!
//! Every helper returns a `TbResult` whose error names the path involved, so
//! callers that treat a failure as fatal can propagate it with `?`.

use std::fs;
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{TbError, TbResult};

pub fn create_dir_all(path: &Path) -> TbResult<()> {
    fs::create_dir_all(path).map_err(|source| TbError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Delete `path` if present and create it empty.
pub fn recreate_dir(path: &Path) -> TbResult<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|source| TbError::Remove {
            path: path.to_path_buf(),
            source,
        })?;
    }
    create_dir_all(path)
}

/// Create a zero-byte file unless something already exists there.
pub fn touch(path: &Path) -> TbResult<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| TbError::Write {
            path: path.to_path_buf(),
            source,
        })
}

pub fn remove_file_if_exists(path: &Path) -> TbResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(TbError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Copy one file, creating the target's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> TbResult<()> {
    if !from.is_file() {
        return Err(TbError::MissingRequired {
            path: from.to_path_buf(),
        });
    }
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| TbError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

/// Recursively copy the contents of `from` into `to`. Returns the number of
/// files copied.
pub fn copy_dir_all(from: &Path, to: &Path) -> TbResult<usize> {
    create_dir_all(to)?;
    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| TbError::Read {
            path: e.path().unwrap_or(from).to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop")),
        })?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Write through a temp file in the same directory, then rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> TbResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    create_dir_all(parent)?;
    let write_err = |source| TbError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(content).map_err(write_err)?;
    temp.flush().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Names of the regular files directly inside `dir`, sorted. A missing
/// directory yields an empty list.
pub fn file_names(dir: &Path) -> TbResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TbError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TbError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Names of every entry (files and directories) directly inside `dir`,
/// sorted. A missing directory yields an empty list.
pub fn entry_names(dir: &Path) -> TbResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TbError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut names = entries
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TbError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
    names.sort();
    Ok(names)
}

pub fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
