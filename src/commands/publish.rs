//! Publish command handler

use anyhow::{Context, Result};

use tbdeploy::application::PublishOptions;
use tbdeploy::config::Config;
use tbdeploy::presentation::factory::{create_event_sink, create_publish_use_case, EventOutput};

pub fn cmd_publish(config: &Config, deployment: &str, output: EventOutput) -> Result<()> {
    let options = PublishOptions::new(
        config.paths.staging_dir(),
        config.paths.publish_dir(),
        deployment,
    );

    let result = create_publish_use_case()
        .execute_with_events(&options, create_event_sink(output))
        .with_context(|| format!("publishing {deployment}"))?;

    if output != EventOutput::Json {
        println!("{}", result.publish_dir.display());
        for warning in &result.warnings {
            eprintln!("warning: {warning}");
        }
    }
    Ok(())
}
