//! Publish Module
//!
//! Turns a staged deployment into a numbered, immutable revision.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`PublishOptions`)
//! - `result` - Result types (`PublishResult`)
//! - `use_case` - Core use case logic (`PublishUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use tbdeploy::application::publish::{PublishOptions, PublishUseCase};
//!
//! let result = PublishUseCase::new().execute(&PublishOptions::new(staging, publish_root, "TEST-24-1"))?;
//! println!("published {}", result.published_name());
//! ```

mod options;
mod result;
mod use_case;

pub use options::PublishOptions;
pub use result::PublishResult;
pub use use_case::{archive_name, PublishUseCase};
