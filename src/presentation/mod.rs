//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Console rendering of build events
//!
//! ## Structure
//!
//! - `cli` - Command-line definitions
//! - `console` - `ConsoleEventSink`
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//!
//! ## Usage
//!
//! ```ignore
//! use tbdeploy::presentation::factory;
//!
//! let use_case = factory::create_build_use_case(&config)?;
//! let result = use_case.execute_with_events(&ctx, factory::create_event_sink(output))?;
//! ```

pub mod cli;
pub mod console;
pub mod factory;

pub use cli::{Cli, Commands, IndexCommands};
pub use console::ConsoleEventSink;
pub use factory::{create_build_use_case, create_event_sink, EventOutput};
