//! Build Use Case
//!
//! Stages a deployment under `<staging>/content/<deployment>`:
//! 1. Clear the deployment directory
//! 2. Export firmware for the device generation
//! 3. Copy the program specification and write the deployment properties
//! 4. Add one image per package
//! 5. Export recipient greetings
//! 6. Finalize, write metadata, leave the unpublished marker
//!
//! Fatal problems abort with `TbError`. A missing or unconvertible asset is
//! recorded on the session and the build goes on.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::MetadataTables;
use crate::domain::ports::{
    BuildEvent, BuildEventSink, ContentExporter, NoopEventSink, ProgramSpecProvider,
};
use crate::domain::value_objects::{AudioFormat, RevisionMarker};
use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::{copy_dir_all, recreate_dir, replace_marker, touch, Deduplicator};
use crate::infrastructure::repositories::metadata_csv::write_tables;
use crate::infrastructure::repositories::properties::{
    DeploymentProperties, ACCEPTABLE_FIRMWARE_VERSIONS, AUDIO_LANGUAGES, CREATION_DATE,
    CREATION_TIME, CREATION_USER, DEPLOYMENT_INFO_PROPERTIES, DEPLOYMENT_NAME, DEPLOYMENT_NUMBER,
    PROGRAM_ID,
};
use crate::infrastructure::repositories::GREETING_PROMPT;

use super::context::BuildContext;
use super::result::BuildResult;
use super::session::BuildSession;
use super::strategy::DeviceGenerationStrategy;

pub struct BuildUseCase<CE, PS>
where
    CE: ContentExporter,
    PS: ProgramSpecProvider,
{
    exporter: CE,
    program_spec: PS,
    strategies: Vec<Box<dyn DeviceGenerationStrategy>>,
}

impl<CE, PS> BuildUseCase<CE, PS>
where
    CE: ContentExporter,
    PS: ProgramSpecProvider,
{
    pub fn new(
        exporter: CE,
        program_spec: PS,
        strategies: Vec<Box<dyn DeviceGenerationStrategy>>,
    ) -> Self {
        Self {
            exporter,
            program_spec,
            strategies,
        }
    }

    pub fn execute(&self, ctx: &BuildContext) -> TbResult<BuildResult> {
        self.execute_with_events(ctx, Arc::new(NoopEventSink))
    }

    pub fn execute_with_events(
        &self,
        ctx: &BuildContext,
        event_sink: Arc<dyn BuildEventSink>,
    ) -> TbResult<BuildResult> {
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.generation() == ctx.generation())
            .ok_or(TbError::UnsupportedGeneration(ctx.generation()))?;
        let deployment = ctx.deployment();
        let deployment_dir = ctx.deployment_dir();

        info!(
            deployment = deployment.name(),
            generation = %ctx.generation(),
            dir = %deployment_dir.display(),
            "building deployment"
        );
        event_sink.on_event(BuildEvent::Started {
            deployment: deployment.name().to_string(),
            generation: ctx.generation(),
            package_count: deployment.packages().len(),
        });

        // Step 1: fresh deployment directory
        recreate_dir(&deployment_dir)?;

        // Step 2: firmware
        let firmware = strategy.export_firmware(ctx)?;
        event_sink.on_event(BuildEvent::FirmwareExported { source: firmware });

        let mut session = BuildSession::new(
            &self.exporter,
            event_sink.clone(),
            Deduplicator::new(ctx.shadow_root(), ctx.dedup()),
        );

        // Step 3: program spec and properties
        self.stage_program_spec(ctx, &**strategy, &session)?;

        // Step 4: package images
        let mut tables = MetadataTables::new();
        let detailed = event_sink.wants_detailed_events();
        for (index, package) in deployment.packages().iter().enumerate() {
            if detailed {
                session.emit(BuildEvent::PackageStarted {
                    index,
                    package: package.name().to_string(),
                });
            }
            session.begin_package(package.name());
            strategy.add_image_for_package(ctx, &mut session, package)?;
            session.end_package();
            tables.extend(MetadataTables::for_package(
                ctx.program_id(),
                deployment.name(),
                package,
                ctx.created_at().date_naive(),
            ));
            if detailed {
                session.emit(BuildEvent::PackageCompleted {
                    index,
                    package: package.name().to_string(),
                });
            }
        }

        // Step 5: greetings
        self.export_greetings(ctx, strategy.audio_format(), &mut session)?;

        // Step 6: deployment-wide files, metadata, marker
        strategy.finalize(ctx, &mut session)?;
        write_tables(&ctx.metadata_dir(), &tables)?;

        let marker = RevisionMarker::unpublished_at(deployment.name(), ctx.created_at());
        replace_marker(&ctx.paths().staging, &marker)?;
        replace_marker(&deployment_dir, &marker)?;

        let shadows = session.deduplicator().shadows();
        let pooled_files = shadows.len();
        let pool_markers = shadows.marker_count();
        let issues = session.into_issues();

        event_sink.on_event(BuildEvent::Completed {
            deployment: deployment.name().to_string(),
            package_count: deployment.packages().len(),
            skipped_count: issues.len(),
        });
        info!(
            deployment = deployment.name(),
            skipped = issues.len(),
            pooled_files,
            "build finished"
        );

        Ok(BuildResult {
            deployment: deployment.name().to_string(),
            generation: ctx.generation(),
            deployment_dir,
            packages: deployment
                .packages()
                .iter()
                .map(|p| p.name().to_string())
                .collect(),
            issues,
            marker: marker.file_name(),
            pooled_files,
            pool_markers,
        })
    }

    /// Copy the program specification into the deployment and describe the
    /// build in `deployment_info.properties`. The properties are best-effort.
    fn stage_program_spec(
        &self,
        ctx: &BuildContext,
        strategy: &dyn DeviceGenerationStrategy,
        session: &BuildSession<'_>,
    ) -> TbResult<()> {
        let source = &ctx.paths().programspec;
        if !source.is_dir() {
            return Err(TbError::MissingDirectory {
                path: source.clone(),
            });
        }
        let staged = ctx.staged_programspec_dir();
        let copied = copy_dir_all(source, &staged)?;
        debug!(files = copied, "program spec staged");

        let properties = match strategy.acceptable_firmware_versions(ctx) {
            Ok(versions) => Some(deployment_properties(ctx, &versions)),
            Err(e) => {
                session.warn(format!("no deployment properties: {e}"));
                None
            }
        };
        if let Some(properties) = properties {
            let path = staged.join(DEPLOYMENT_INFO_PROPERTIES);
            if let Err(e) = properties.store(&path, ctx.created_at()) {
                session.warn(format!("unable to write deployment properties: {e}"));
            }
        }
        Ok(())
    }

    /// Greetings of the recipients who speak a package language. With an
    /// unknown deployment number every recipient is considered.
    fn export_greetings(
        &self,
        ctx: &BuildContext,
        format: AudioFormat,
        session: &mut BuildSession<'_>,
    ) -> TbResult<()> {
        let number = ctx.deployment().number();
        let recipients = if number > 0 {
            ctx.deployment()
                .languages()
                .into_iter()
                .flat_map(|language| self.program_spec.recipients_for(number, language))
                .collect()
        } else {
            self.program_spec.recipients()
        };

        let communities_dir = ctx.deployment_dir().join("communities");
        let mut seen = BTreeSet::new();
        for recipient in recipients {
            let community = self.program_spec.community_dir(&recipient);
            if !seen.insert((community.clone(), recipient.language.clone())) {
                continue;
            }
            let community_dir = communities_dir.join(&community);
            let target = community_dir
                .join("languages")
                .join(&recipient.language)
                .join(format.file_name(GREETING_PROMPT));
            match self
                .exporter
                .export_greeting(&community, &recipient.language, format, &target)
            {
                Ok(true) => touch(
                    &community_dir
                        .join("system")
                        .join(format!("{}.grp", recipient.language)),
                )?,
                Ok(false) => debug!(%community, language = %recipient.language, "no greeting"),
                Err(e) => session.skip(e),
            }
        }
        Ok(())
    }
}

fn deployment_properties(ctx: &BuildContext, firmware_versions: &[String]) -> DeploymentProperties {
    let deployment = ctx.deployment();
    let mut props = DeploymentProperties::new();
    props.set(PROGRAM_ID, ctx.program_id());
    props.set(DEPLOYMENT_NAME, deployment.name());
    props.set(DEPLOYMENT_NUMBER, deployment.number().to_string());
    props.set(AUDIO_LANGUAGES, deployment.languages().join(","));
    props.set(ACCEPTABLE_FIRMWARE_VERSIONS, firmware_versions.join(","));
    props.set(CREATION_DATE, ctx.created_at().format("%Y-%m-%d").to_string());
    props.set(
        CREATION_TIME,
        ctx.created_at().format("%I:%M:%S %p UTC").to_string(),
    );
    props.set(CREATION_USER, ctx.operator());
    for package in deployment.packages() {
        props.set(package.language_key(), package.name());
    }
    props
}
