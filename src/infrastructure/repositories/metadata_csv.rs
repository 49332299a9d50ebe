//! CSV metadata writer
//!
//! Writes the three metadata tables of a build and merges per-build files
//! into one set at publish time.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::entities::{
    CategoryRow, ContentRow, MetadataTables, PackageRow, CATEGORIES_IN_PACKAGES_CSV,
    CONTENT_IN_PACKAGES_CSV, PACKAGES_IN_DEPLOYMENT_CSV,
};
use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::create_dir_all;

pub const METADATA_FILES: [&str; 3] = [
    PACKAGES_IN_DEPLOYMENT_CSV,
    CATEGORIES_IN_PACKAGES_CSV,
    CONTENT_IN_PACKAGES_CSV,
];

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> TbError + '_ {
    move |e| TbError::Metadata {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn write_rows<H, R, I>(path: &Path, header: H, rows: I) -> TbResult<()>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    writer.write_record(header).map_err(csv_error(path))?;
    for row in rows {
        writer.write_record(row).map_err(csv_error(path))?;
    }
    writer.flush().map_err(|source| TbError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the three tables into `dir`.
pub fn write_tables(dir: &Path, tables: &MetadataTables) -> TbResult<()> {
    create_dir_all(dir)?;
    write_rows(
        &dir.join(PACKAGES_IN_DEPLOYMENT_CSV),
        PackageRow::HEADER,
        tables.packages().iter().map(PackageRow::record),
    )?;
    write_rows(
        &dir.join(CATEGORIES_IN_PACKAGES_CSV),
        CategoryRow::HEADER,
        tables.categories().iter().map(CategoryRow::record),
    )?;
    write_rows(
        &dir.join(CONTENT_IN_PACKAGES_CSV),
        ContentRow::HEADER,
        tables.content().iter().map(ContentRow::record),
    )?;
    debug!(dir = %dir.display(), "metadata written");
    Ok(())
}

/// Concatenate the data rows of CSV files under the fixed `header`. Each
/// input's own header row is dropped; unreadable files are skipped with a
/// warning. The output is always written. Returns how many inputs were merged.
pub fn merge_csv_files(inputs: &[PathBuf], header: &[&str], output: &Path) -> TbResult<usize> {
    let mut rows = Vec::new();
    let mut merged = 0;
    for input in inputs {
        let mut reader = match csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(input)
        {
            Ok(reader) => reader,
            Err(e) => {
                warn!(file = %input.display(), "skipping unreadable metadata: {e}");
                continue;
            }
        };
        let records: Result<Vec<_>, _> = reader.records().collect();
        match records {
            Ok(records) => {
                rows.extend(records);
                merged += 1;
            }
            Err(e) => warn!(file = %input.display(), "skipping unreadable metadata: {e}"),
        }
    }

    if let Some(parent) = output.parent() {
        create_dir_all(parent)?;
    }
    write_rows(output, header, rows.iter())?;
    Ok(merged)
}

/// Merge every metadata file found below `source_root` into `dest_dir`,
/// one output per table.
pub fn merge_metadata_dirs(source_root: &Path, dest_dir: &Path) -> TbResult<usize> {
    let tables: [(&str, &[&str]); 3] = [
        (PACKAGES_IN_DEPLOYMENT_CSV, &PackageRow::HEADER),
        (CATEGORIES_IN_PACKAGES_CSV, &CategoryRow::HEADER),
        (CONTENT_IN_PACKAGES_CSV, &ContentRow::HEADER),
    ];
    let mut merged = 0;
    for (name, header) in tables {
        let mut inputs: Vec<PathBuf> = WalkDir::new(source_root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && e.file_name() == name)
            .map(|e| e.into_path())
            .collect();
        inputs.sort();
        merged += merge_csv_files(&inputs, header, &dest_dir.join(name))?;
    }
    Ok(merged)
}
