//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --json, --verbose) are inherited by all subcommands
//! - Flags given on the command line win over configuration and environment

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::DeviceGeneration;

/// tbdeploy - deployment builder and publisher for talking-book devices
#[derive(Parser, Debug)]
#[command(name = "tbdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./tbdeploy.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events instead of console output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage a deployment from its TOML description
    Build {
        /// Deployment description file
        #[arg(short, long, value_name = "FILE")]
        spec: PathBuf,

        /// Device generation to build for (v1 or v2)
        #[arg(short, long, value_parser = parse_generation)]
        generation: Option<DeviceGeneration>,

        /// Write every audio file in place instead of pooling duplicates
        #[arg(long)]
        no_dedup: bool,
    },

    /// Publish a staged deployment under the next revision
    Publish {
        /// Deployment name, e.g. TEST-24-1
        #[arg(short, long)]
        deployment: String,
    },

    /// Show what the staging area currently holds
    Status,

    /// Device index utilities
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// Merge several packages_data.txt files into one
    Combine {
        /// Index files to merge, in order
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Deployment name for the combined header
        #[arg(short, long)]
        deployment: String,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn parse_generation(value: &str) -> Result<DeviceGeneration, String> {
    value.parse::<DeviceGeneration>().map_err(|e| e.to_string())
}
