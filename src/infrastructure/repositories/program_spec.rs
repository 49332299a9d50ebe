//! CSV Program Spec Repository
//!
//! Reads `recipients.csv` and `recipients_map.csv` from a program
//! specification directory. Column names are matched case-insensitively and
//! unknown columns are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entities::Recipient;
use crate::domain::ports::ProgramSpecProvider;
use crate::error::{TbError, TbResult};

pub const RECIPIENTS_CSV: &str = "recipients.csv";
pub const RECIPIENTS_MAP_CSV: &str = "recipients_map.csv";

#[derive(Debug, Clone, Default)]
pub struct CsvProgramSpec {
    recipients: Vec<Recipient>,
    recipients_map: BTreeMap<String, String>,
}

impl CsvProgramSpec {
    /// Load from `dir`. Either file may be missing; a program without
    /// recipients simply has no greetings.
    pub fn load(dir: &Path) -> TbResult<Self> {
        let recipients = match read_table(&dir.join(RECIPIENTS_CSV))? {
            Some(table) => table
                .rows(&["recipientid", "languagecode", "variant", "deployments"])
                .filter_map(|row| {
                    let id = row[0].trim();
                    if id.is_empty() {
                        return None;
                    }
                    let variant = row[2].trim();
                    Some(Recipient {
                        id: id.to_string(),
                        language: row[1].trim().to_ascii_lowercase(),
                        variant: (!variant.is_empty()).then(|| variant.to_string()),
                        deployments: parse_deployments(&row[3]),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        let recipients_map = match read_table(&dir.join(RECIPIENTS_MAP_CSV))? {
            Some(table) => table
                .rows(&["recipientid", "directory"])
                .filter(|row| !row[0].trim().is_empty() && !row[1].trim().is_empty())
                .map(|row| (row[0].trim().to_string(), row[1].trim().to_string()))
                .collect(),
            None => BTreeMap::new(),
        };

        debug!(
            recipients = recipients.len(),
            mapped = recipients_map.len(),
            dir = %dir.display(),
            "loaded program spec"
        );
        Ok(Self {
            recipients,
            recipients_map,
        })
    }
}

impl ProgramSpecProvider for CsvProgramSpec {
    fn recipients(&self) -> Vec<Recipient> {
        self.recipients.clone()
    }

    fn recipients_map(&self) -> BTreeMap<String, String> {
        self.recipients_map.clone()
    }
}

struct Table {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Project each record onto `columns`; absent columns read as "".
    fn rows<'a>(&'a self, columns: &[&str]) -> impl Iterator<Item = Vec<String>> + 'a {
        let indexes: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.headers.iter().position(|h| h == c))
            .collect();
        self.records.iter().map(move |record| {
            indexes
                .iter()
                .map(|i| i.and_then(|i| record.get(i)).unwrap_or("").to_string())
                .collect()
        })
    }
}

fn read_table(path: &Path) -> TbResult<Option<Table>> {
    if !path.is_file() {
        return Ok(None);
    }
    let metadata_error = |e: csv::Error| TbError::Metadata {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(metadata_error)?;
    let headers = reader
        .headers()
        .map_err(metadata_error)?
        .iter()
        .map(str::to_ascii_lowercase)
        .collect();
    let mut records = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => records.push(record),
            Err(e) => warn!(file = %path.display(), "skipping bad row: {e}"),
        }
    }
    Ok(Some(Table { headers, records }))
}

/// `"1,2, 4"` → `[1, 2, 4]`. Anything unparseable is dropped.
fn parse_deployments(cell: &str) -> Vec<u32> {
    cell.split([',', ';', ' '])
        .filter_map(|n| n.trim().parse().ok())
        .collect()
}
