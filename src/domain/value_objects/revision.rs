//! Publish revision suffixes
//!
//! A revision is a non-empty run of lowercase ASCII letters. Longer suffixes
//! always sort after shorter ones; equal lengths compare lexically. `next`
//! behaves like an odometer over `a..=z`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevisionError {
    #[error("revision suffix is empty")]
    Empty,
    #[error("invalid character '{ch}' in revision suffix '{suffix}'")]
    InvalidChar { suffix: String, ch: char },
}

/// Alphabetic publish revision (`a`, `b`, ..., `z`, `aa`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    /// The revision assigned to a deployment's first publish
    pub fn first() -> Self {
        Self("a".to_string())
    }

    /// Parse a suffix; uppercase letters are folded to lowercase.
    pub fn parse(suffix: &str) -> Result<Self, RevisionError> {
        if suffix.is_empty() {
            return Err(RevisionError::Empty);
        }
        if let Some(ch) = suffix.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(RevisionError::InvalidChar {
                suffix: suffix.to_string(),
                ch,
            });
        }
        Ok(Self(suffix.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The successor: "a"→"b", "z"→"aa", "az"→"ba", "zz"→"aaa".
    pub fn next(&self) -> Self {
        let mut bytes = self.0.as_bytes().to_vec();
        for pos in (0..bytes.len()).rev() {
            if bytes[pos] == b'z' {
                bytes[pos] = b'a';
            } else {
                bytes[pos] += 1;
                return Self(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        // carried past the leftmost letter
        bytes.insert(0, b'a');
        Self(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Revision {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
