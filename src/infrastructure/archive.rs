//! Zip archive of a staged tree

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{TbError, TbResult};

/// Zip everything below `source` into `archive`. Entry names are
/// `<prefix>/<relative path>` with forward slashes, directories included.
/// Returns the number of files stored.
pub fn zip_dir(source: &Path, prefix: &str, archive: &Path) -> TbResult<usize> {
    let archive_error = |message: String| TbError::Archive {
        path: archive.to_path_buf(),
        message,
    };
    let file = File::create(archive).map_err(|source| TbError::Write {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let prefix = prefix.trim_matches('/');

    let mut files = 0;
    for entry in WalkDir::new(source).sort_by_file_name().min_depth(1) {
        let entry = entry.map_err(|e| archive_error(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| archive_error(e.to_string()))?;
        let mut name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !prefix.is_empty() {
            name = format!("{prefix}/{name}");
        }

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(|e| archive_error(e.to_string()))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| archive_error(e.to_string()))?;
            let mut input = File::open(entry.path()).map_err(|source| TbError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            io::copy(&mut input, &mut zip).map_err(|e| archive_error(e.to_string()))?;
            files += 1;
        }
    }
    zip.finish().map_err(|e| archive_error(e.to_string()))?;
    debug!(archive = %archive.display(), files, "archive written");
    Ok(files)
}
