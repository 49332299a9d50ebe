//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::{BuildPaths, BuildUseCase, PublishUseCase};
use crate::config::Config;
use crate::domain::ports::{BuildEventSink, NoopEventSink};
use crate::error::TbResult;
use crate::infrastructure::{
    all_generations, CsvProgramSpec, DirectoryContentSource, JsonEventSink, TracingEventSink,
};

use super::console::ConsoleEventSink;

/// Type alias for the concrete BuildUseCase with all dependencies
pub type ConcreteBuildUseCase = BuildUseCase<DirectoryContentSource, CsvProgramSpec>;

/// How build progress reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutput {
    /// NDJSON on stdout
    Json,
    /// Progress lines on stderr; per-package lines when `detailed`
    Console { detailed: bool },
    /// Only `tracing` records
    Log,
    Silent,
}

impl EventOutput {
    /// `--json` wins; otherwise console output, detailed from `-v`.
    pub fn from_flags(json: bool, verbose: u8) -> Self {
        if json {
            EventOutput::Json
        } else {
            EventOutput::Console {
                detailed: verbose > 0,
            }
        }
    }
}

pub fn create_event_sink(output: EventOutput) -> Arc<dyn BuildEventSink> {
    match output {
        EventOutput::Json => Arc::new(JsonEventSink::stdout()),
        EventOutput::Console { detailed } => Arc::new(ConsoleEventSink::stderr(detailed)),
        EventOutput::Log => Arc::new(TracingEventSink),
        EventOutput::Silent => Arc::new(NoopEventSink),
    }
}

/// Build paths resolved from configuration
pub fn build_paths(config: &Config) -> BuildPaths {
    BuildPaths {
        staging: config.paths.staging_dir(),
        tb_options: config.paths.tb_options_dir(),
        programspec: config.paths.programspec_dir(),
        software: config.paths.software_dir(),
    }
}

/// Create a build use case reading content and recipients from the
/// configured locations, with every device generation available
pub fn create_build_use_case(config: &Config) -> TbResult<ConcreteBuildUseCase> {
    let exporter = DirectoryContentSource::new(config.paths.content_dir());
    let program_spec = CsvProgramSpec::load(&config.paths.programspec_dir())?;

    Ok(BuildUseCase::new(exporter, program_spec, all_generations()))
}

pub fn create_publish_use_case() -> PublishUseCase {
    PublishUseCase::new()
}
