//! Build Module
//!
//! Stages a deployment for one device generation.
//!
//! ## Structure
//!
//! - `context` - Immutable inputs (`BuildContext`, `BuildPaths`)
//! - `session` - Mutable per-build state (`BuildSession`, `BuildIssue`)
//! - `strategy` - Per-generation behaviour (`DeviceGenerationStrategy`)
//! - `result` - Result types (`BuildResult`)
//! - `use_case` - The build sequence (`BuildUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use tbdeploy::application::build::{BuildContext, BuildUseCase};
//!
//! let use_case = BuildUseCase::new(exporter, program_spec, all_generations());
//! let result = use_case.execute(&ctx)?;
//! ```

mod context;
mod result;
mod session;
mod strategy;
mod use_case;

pub use context::{BuildContext, BuildPaths, METADATA_DIR, PROGRAMSPEC_DIR, SHADOW_DIR};
pub use result::BuildResult;
pub use session::{BuildIssue, BuildSession};
pub use strategy::{
    required_system_prompts, write_system_markers, DeviceGenerationStrategy, BELL_PROMPT,
    FIRST_MESSAGE_LIST, SILENCE_PROMPT,
};
pub use use_case::BuildUseCase;
