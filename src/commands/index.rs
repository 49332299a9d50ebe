//! Index command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use tbdeploy::application::combine_index_files;

pub fn cmd_index_combine(
    inputs: &[PathBuf],
    deployment: &str,
    output: &Path,
    json: bool,
) -> Result<()> {
    let summary = combine_index_files(inputs, deployment, output, Utc::now())
        .with_context(|| format!("combining into {}", output.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "complete",
                "command": "index-combine",
                "output": summary.output.display().to_string(),
                "packages": summary.packages,
                "paths": summary.paths,
            })
        );
    } else {
        println!(
            "{}: {} packages, {} paths",
            summary.output.display(),
            summary.packages.len(),
            summary.paths
        );
    }
    Ok(())
}
