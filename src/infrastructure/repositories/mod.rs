//! Repository Implementations
//!
//! Concrete implementations of domain ports plus the file formats a build
//! reads and writes.

mod content_source;
mod deployment_spec;
pub mod metadata_csv;
pub mod properties;
mod program_spec;

pub use content_source::{DirectoryContentSource, GREETING_PROMPT};
pub use deployment_spec::{load_deployment_spec, parse_deployment_spec};
pub use metadata_csv::{merge_csv_files, merge_metadata_dirs, write_tables, METADATA_FILES};
pub use properties::{DeploymentProperties, DEPLOYMENT_INFO_PROPERTIES};
pub use program_spec::{CsvProgramSpec, RECIPIENTS_CSV, RECIPIENTS_MAP_CSV};
