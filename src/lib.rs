//! tbdeploy - deployment package builder and publisher
//!
//! Turns a deployment description into a staged directory tree ready to be
//! copied onto talking-book devices, for both the convention-based V1 layout
//! and the indexed V2 layout, then publishes it under a strictly increasing
//! revision.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    BuildContext, BuildPaths, BuildResult, BuildUseCase, PublishOptions, PublishResult,
    PublishUseCase,
};
pub use config::Config;
pub use domain::entities::{DeploymentSpec, PackageSpec, PlaylistSpec};
pub use domain::value_objects::{DeviceGeneration, Revision};
pub use error::{TbError, TbResult};
