//! tbdeploy CLI - deployment builder and publisher for talking-book devices
//!
//! Usage: tbdeploy <COMMAND>
//!
//! Commands:
//!   build    Stage a deployment from its TOML description
//!   publish  Publish a staged deployment under the next revision
//!   status   Show what the staging area currently holds
//!   index    Device index utilities

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tbdeploy::config::load_config;
use tbdeploy::presentation::factory::EventOutput;
use tbdeploy::presentation::{Cli, Commands, IndexCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, warnings) = load_config(cli.config.as_deref())?;
    for warning in &warnings {
        let location = match warning.line {
            Some(line) => format!("{}:{line}", warning.file.display()),
            None => warning.file.display().to_string(),
        };
        match &warning.suggestion {
            Some(suggestion) => tracing::warn!(
                "{location}: unknown key '{}' (did you mean '{suggestion}'?)",
                warning.key
            ),
            None => tracing::warn!("{location}: unknown key '{}'", warning.key),
        }
    }

    let output = EventOutput::from_flags(cli.json, cli.verbose);
    match cli.command {
        Commands::Build {
            spec,
            generation,
            no_dedup,
        } => commands::cmd_build(&config, &spec, generation, no_dedup, output),
        Commands::Publish { deployment } => commands::cmd_publish(&config, &deployment, output),
        Commands::Status => commands::cmd_status(&config, cli.json),
        Commands::Index {
            command:
                IndexCommands::Combine {
                    inputs,
                    deployment,
                    output: path,
                },
        } => commands::cmd_index_combine(&inputs, &deployment, &path, cli.json),
    }
}

/// `RUST_LOG` when set, otherwise warn/info/debug/trace from `-v` count.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
