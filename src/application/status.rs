//! Staging status
//!
//! A staging root carries a single `.rev` marker naming what was last done
//! there: an unpublished build or a published revision.

use std::fmt;
use std::path::Path;

use crate::domain::value_objects::{Revision, RevisionMarker};
use crate::error::TbResult;
use crate::infrastructure::fs::marker_file_names;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingStatus {
    /// No marker at all
    Missing,
    Unpublished { deployment: String, timestamp: String },
    Published { deployment: String, revision: Revision },
    /// A `.rev` file that is neither kind of marker
    Unrecognized { file: String },
    /// More than one marker
    Ambiguous { files: Vec<String> },
}

impl StagingStatus {
    pub fn deployment(&self) -> Option<&str> {
        match self {
            Self::Unpublished { deployment, .. } | Self::Published { deployment, .. } => {
                Some(deployment)
            }
            _ => None,
        }
    }

    /// Whether the state is something a person needs to sort out
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Unrecognized { .. } | Self::Ambiguous { .. })
    }
}

impl fmt::Display for StagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "nothing staged"),
            Self::Unpublished {
                deployment,
                timestamp,
            } => write!(f, "{deployment} built at {timestamp}, not published"),
            Self::Published {
                deployment,
                revision,
            } => write!(f, "{deployment} published as revision {revision}"),
            Self::Unrecognized { file } => write!(f, "unrecognized marker {file}"),
            Self::Ambiguous { files } => {
                write!(f, "{} markers: {}", files.len(), files.join(", "))
            }
        }
    }
}

/// Read the marker in `staging`.
pub fn staging_status(staging: &Path) -> TbResult<StagingStatus> {
    let mut files = marker_file_names(staging)?;
    if files.len() > 1 {
        return Ok(StagingStatus::Ambiguous { files });
    }
    let Some(file) = files.pop() else {
        return Ok(StagingStatus::Missing);
    };
    Ok(match RevisionMarker::parse(&file) {
        Some(RevisionMarker::Published {
            deployment,
            revision,
        }) => StagingStatus::Published {
            deployment,
            revision,
        },
        Some(RevisionMarker::Unpublished {
            deployment,
            timestamp,
        }) => StagingStatus::Unpublished {
            deployment,
            timestamp,
        },
        None => StagingStatus::Unrecognized { file },
    })
}
