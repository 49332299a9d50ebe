//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BuildUseCase` - Stages a deployment for one device generation
//! - `PublishUseCase` - Assigns a revision and writes the published tree
//! - `staging_status` - Reports the marker left in a staging root
//! - `combine_index_files` - Merges per-image `packages_data.txt` files

pub mod build;
pub mod index;
pub mod publish;
pub mod status;

pub use build::{BuildContext, BuildIssue, BuildPaths, BuildResult, BuildUseCase};
pub use index::{combine_index_files, CombineSummary};
pub use publish::{PublishOptions, PublishResult, PublishUseCase};
pub use status::{staging_status, StagingStatus};
