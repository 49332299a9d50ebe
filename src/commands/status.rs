//! Status command handler

use anyhow::{bail, Context, Result};

use tbdeploy::application::{staging_status, StagingStatus};
use tbdeploy::config::Config;

pub fn cmd_status(config: &Config, json: bool) -> Result<()> {
    let staging = config.paths.staging_dir();
    let status = staging_status(&staging)
        .with_context(|| format!("reading {}", staging.display()))?;

    if json {
        let state = match &status {
            StagingStatus::Missing => "missing",
            StagingStatus::Unpublished { .. } => "unpublished",
            StagingStatus::Published { .. } => "published",
            StagingStatus::Unrecognized { .. } => "unrecognized",
            StagingStatus::Ambiguous { .. } => "ambiguous",
        };
        let revision = match &status {
            StagingStatus::Published { revision, .. } => Some(revision.to_string()),
            _ => None,
        };
        println!(
            "{}",
            serde_json::json!({
                "event": "status",
                "state": state,
                "deployment": status.deployment(),
                "revision": revision,
                "message": status.to_string(),
            })
        );
    } else {
        println!("{}: {status}", staging.display());
    }

    if status.is_problem() {
        bail!("staging area needs attention: {status}");
    }
    Ok(())
}
