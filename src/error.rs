//! Error types for tbdeploy
//!
//! Uses `thiserror` for library errors. Everything here aborts the operation
//! in progress; per-asset export failures are `ExportError`s and are recorded
//! on the build session instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::{IndexError, SpecError};
use crate::domain::value_objects::{DeviceGeneration, RevisionError};

/// Result type alias for tbdeploy operations
pub type TbResult<T> = Result<T, TbError>;

/// Main error type for tbdeploy operations
#[derive(Error, Debug)]
pub enum TbError {
    /// A staging or publish directory could not be created
    #[error("unable to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A previous tree could not be cleared
    #[error("unable to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required asset could not be copied
    #[error("unable to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Fixed asset the device cannot work without
    #[error("required file not found: {path}")]
    MissingRequired { path: PathBuf },

    /// Directory not found or empty
    #[error("required directory missing or empty: {path}")]
    MissingDirectory { path: PathBuf },

    #[error("no usable firmware found in {path}")]
    NoFirmware { path: PathBuf },

    #[error("no builder registered for {0} devices")]
    UnsupportedGeneration(DeviceGeneration),

    #[error("nothing staged for deployment '{deployment}' in {path}")]
    NotStaged { deployment: String, path: PathBuf },

    #[error("invalid deployment: {0}")]
    Spec(#[from] SpecError),

    #[error("invalid deployment file {path}: {message}")]
    InvalidSpecFile { path: PathBuf, message: String },

    #[error("invalid configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid package index {path}: {message}")]
    InvalidIndexFile { path: PathBuf, message: String },

    #[error("package index: {0}")]
    Index(#[from] IndexError),

    #[error("revision: {0}")]
    Revision(#[from] RevisionError),

    #[error("unable to write archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("metadata file {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
