//! `.rev` marker files
//!
//! Exactly one marker should sit in a staging root or publish root. A
//! published marker names the revision; an unpublished marker carries a UTC
//! time token instead and never parses as an alphabetic revision.

use chrono::{DateTime, Utc};

use super::Revision;

pub const MARKER_EXTENSION: &str = "rev";
pub const UNPUBLISHED_PREFIX: &str = "UNPUBLISHED_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionMarker {
    /// `<deployment>-<revision>.rev`
    Published {
        deployment: String,
        revision: Revision,
    },
    /// `UNPUBLISHED_<HHMMSS.mmmZ>_<deployment>.rev`
    Unpublished {
        timestamp: String,
        deployment: String,
    },
}

impl RevisionMarker {
    pub fn published(deployment: impl Into<String>, revision: Revision) -> Self {
        Self::Published {
            deployment: deployment.into(),
            revision,
        }
    }

    pub fn unpublished_at(deployment: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::Unpublished {
            timestamp: at.format("%H%M%S%.3fZ").to_string(),
            deployment: deployment.into(),
        }
    }

    pub fn deployment(&self) -> &str {
        match self {
            Self::Published { deployment, .. } | Self::Unpublished { deployment, .. } => deployment,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::Published {
                deployment,
                revision,
            } => format!("{}-{}.{}", deployment, revision, MARKER_EXTENSION),
            Self::Unpublished {
                timestamp,
                deployment,
            } => format!(
                "{}{}_{}.{}",
                UNPUBLISHED_PREFIX, timestamp, deployment, MARKER_EXTENSION
            ),
        }
    }

    /// Parse a marker file name. Returns `None` for anything that is not a
    /// `.rev` marker.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(&format!(".{}", MARKER_EXTENSION))?;
        if let Some(rest) = stem.strip_prefix(UNPUBLISHED_PREFIX) {
            let (timestamp, deployment) = rest.split_once('_')?;
            if timestamp.is_empty() || deployment.is_empty() {
                return None;
            }
            return Some(Self::Unpublished {
                timestamp: timestamp.to_string(),
                deployment: deployment.to_string(),
            });
        }
        let (deployment, suffix) = stem.rsplit_once('-')?;
        let revision = Revision::parse(suffix).ok()?;
        if deployment.is_empty() {
            return None;
        }
        Some(Self::Published {
            deployment: deployment.to_string(),
            revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unpublished_token_uses_utc_time_with_millis() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap()
            + chrono::Duration::milliseconds(42);
        let marker = RevisionMarker::unpublished_at("TEST-24-1", at);
        assert_eq!(marker.file_name(), "UNPUBLISHED_070503.042Z_TEST-24-1.rev");
    }

    #[test]
    fn parse_round_trips_both_kinds() {
        let published = RevisionMarker::published("TEST-24-1", Revision::parse("ab").unwrap());
        assert_eq!(
            RevisionMarker::parse(&published.file_name()),
            Some(published)
        );

        let parsed = RevisionMarker::parse("UNPUBLISHED_101530.123Z_TEST-24-1.rev").unwrap();
        assert_eq!(parsed.deployment(), "TEST-24-1");
        assert!(!parsed.is_published());
    }

    #[test]
    fn parse_ignores_other_files() {
        assert_eq!(RevisionMarker::parse("TEST-24-1.rev"), None);
        assert_eq!(RevisionMarker::parse("TEST-24-1-a.zip"), None);
        assert_eq!(RevisionMarker::parse("notes.txt"), None);
    }
}
