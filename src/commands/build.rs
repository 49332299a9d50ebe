//! Build command handler

use std::path::Path;

use anyhow::{Context, Result};

use tbdeploy::application::BuildContext;
use tbdeploy::config::Config;
use tbdeploy::domain::value_objects::DeviceGeneration;
use tbdeploy::infrastructure::repositories::load_deployment_spec;
use tbdeploy::presentation::factory::{
    build_paths, create_build_use_case, create_event_sink, EventOutput,
};

pub fn cmd_build(
    config: &Config,
    spec: &Path,
    generation: Option<DeviceGeneration>,
    no_dedup: bool,
    output: EventOutput,
) -> Result<()> {
    let deployment = load_deployment_spec(spec)
        .with_context(|| format!("loading deployment from {}", spec.display()))?;
    let program_id = config.program_id_for(deployment.name());
    let generation = generation.unwrap_or(config.build.generation);
    let dedup = config.build.dedup && !no_dedup;

    let ctx = BuildContext::new(program_id, deployment, generation, build_paths(config))
        .with_operator(operator(config))
        .with_dedup(dedup);

    let use_case = create_build_use_case(config).context("loading program specification")?;
    let result = use_case
        .execute_with_events(&ctx, create_event_sink(output))
        .with_context(|| format!("building {}", ctx.deployment_name()))?;

    if output != EventOutput::Json {
        println!("{}", result.deployment_dir.display());
        if dedup {
            println!(
                "{} pooled files, {} links",
                result.pooled_files, result.pool_markers
            );
        }
    }
    Ok(())
}

fn operator(config: &Config) -> String {
    if !config.program.operator.is_empty() {
        return config.program.operator.clone();
    }
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}
