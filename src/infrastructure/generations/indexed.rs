//! Second-generation ("indexed") images
//!
//! Every image carries `content/packages_data.txt` describing its single
//! package; the deployment also gets a combined descriptor at
//! `images.v2/packages_data.txt`. Audio is MP3.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::build::{
    required_system_prompts, write_system_markers, BuildContext, BuildSession,
    DeviceGenerationStrategy, BELL_PROMPT, SILENCE_PROMPT,
};
use crate::domain::entities::{
    AudioItemRef, AudioRef, PackageIndex, PackageRecord, PackageSpec, PlaylistRecord,
    CATEGORY_TUTORIAL, CATEGORY_USER_FEEDBACK, PACKAGES_DATA_FILE,
};
use crate::domain::value_objects::{AudioFormat, DeviceGeneration};
use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::{
    atomic_write, copy_dir_all, file_names, is_non_empty_dir, recreate_dir,
};

pub const FIRMWARE_V2_DIR: &str = "firmware.v2";
pub const SYSTEM_V2_DIR: &str = "system.v2";
pub const IMAGES_V2_DIR: &str = "images.v2";
/// Firmware image that must be present in a firmware directory
pub const FIRMWARE_HEX: &str = "TBookRev2b.hex";
/// Label file that must sit next to the firmware image
pub const FIRMWARE_LABEL: &str = "firmware_built.txt";

/// Tutorial steps, in the order the device plays them
pub const TUTORIAL_MESSAGES: [&str; 9] = ["17", "16", "28", "26", "20", "21", "19", "25", "54"];

const MESSAGES_DIR: &str = "content/messages";

/// Find `name` in `dir`, ignoring case.
fn find_ignoring_case(dir: &Path, name: &str) -> TbResult<Option<PathBuf>> {
    Ok(file_names(dir)?
        .into_iter()
        .find(|f| f.eq_ignore_ascii_case(name))
        .map(|f| dir.join(f)))
}

/// A firmware directory holds both the image and its label.
pub fn is_valid_firmware_dir(dir: &Path) -> bool {
    dir.is_dir()
        && [FIRMWARE_HEX, FIRMWARE_LABEL]
            .iter()
            .all(|name| matches!(find_ignoring_case(dir, name), Ok(Some(_))))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IndexedGeneration;

impl IndexedGeneration {
    pub fn new() -> Self {
        Self
    }

    /// Program override first, then the installation default.
    fn candidates(ctx: &BuildContext, name: &str) -> Vec<PathBuf> {
        std::iter::once(ctx.tb_options().join(name))
            .chain(ctx.paths().software.as_ref().map(|s| s.join(name)))
            .collect()
    }

    fn firmware_source(ctx: &BuildContext) -> TbResult<PathBuf> {
        Self::candidates(ctx, FIRMWARE_V2_DIR)
            .into_iter()
            .find(|dir| is_valid_firmware_dir(dir))
            .ok_or_else(|| TbError::NoFirmware {
                path: ctx.tb_options().join(FIRMWARE_V2_DIR),
            })
    }

    fn system_source(ctx: &BuildContext) -> Option<PathBuf> {
        Self::candidates(ctx, SYSTEM_V2_DIR)
            .into_iter()
            .find(|dir| is_non_empty_dir(dir))
    }

    fn images_dir(ctx: &BuildContext) -> PathBuf {
        ctx.deployment_dir().join(IMAGES_V2_DIR)
    }
}

/// Paths of one image, relative to the image root where the index needs them.
struct ImageLayout {
    image_dir: PathBuf,
    messages_dir: PathBuf,
    prompts_dir: PathBuf,
    /// `content/prompts/<lang>`
    prompts_rel: String,
}

impl ImageLayout {
    fn new(images_dir: &Path, package: &PackageSpec) -> Self {
        let image_dir = images_dir.join(package.name());
        let prompts_rel = format!("content/prompts/{}", package.language());
        Self {
            messages_dir: image_dir.join(MESSAGES_DIR),
            prompts_dir: image_dir.join(&prompts_rel),
            prompts_rel,
            image_dir,
        }
    }
}

/// Builds one image and its single-package index.
struct ImageWriter<'s, 'a> {
    session: &'s mut BuildSession<'a>,
    layout: ImageLayout,
    package: &'s PackageSpec,
    format: AudioFormat,
    index: PackageIndex,
}

impl ImageWriter<'_, '_> {
    fn export_message(&mut self, item: &AudioItemRef, title: Option<&str>) -> TbResult<AudioRef> {
        let file_name = self.format.file_name(item.id());
        let target = self
            .session
            .resolve(&self.layout.messages_dir, Path::new(MESSAGES_DIR), &file_name)?;
        let format = self.format;
        self.session
            .export(&target, |e, t| e.export_audio_item(item, format, t));
        Ok(self
            .index
            .audio_ref(&format!("{MESSAGES_DIR}/{file_name}"), title))
    }

    fn prompt_ref(&mut self, file_name: &str) -> AudioRef {
        let rel = format!("{}/{}", self.layout.prompts_rel, file_name);
        self.index.audio_ref(&rel, None)
    }

    /// Announcement and invitation of a category taken from the prompt pool.
    fn category_prompts(&mut self, category: &str) -> TbResult<(AudioRef, AudioRef)> {
        let pool = Path::new(&self.layout.prompts_rel).to_path_buf();
        let short = self.session.export_category_pair(
            &self.layout.prompts_dir,
            &pool,
            self.package.name(),
            category,
            self.package.language(),
            self.format,
        )?;
        let long = self.format.file_name(&format!("i{category}"));
        Ok((self.prompt_ref(&short), self.prompt_ref(&long)))
    }

    fn playlists(&mut self) -> TbResult<Vec<PlaylistRecord>> {
        let package = self.package;
        let mut records = Vec::new();
        for playlist in package.playlists() {
            let mut messages = Vec::with_capacity(playlist.items().len());
            for item in playlist.items() {
                messages.push(self.export_message(item, Some(item.id()))?);
            }
            let (short_prompt, long_prompt) = match playlist.prompts() {
                Some(prompts) => (
                    self.export_message(&prompts.short, None)?,
                    self.export_message(&prompts.long, None)?,
                ),
                None => self.category_prompts(playlist.category())?,
            };
            records.push(PlaylistRecord {
                name: playlist.title().to_string(),
                short_prompt,
                long_prompt,
                messages,
            });
        }

        if package.has_tutorial() {
            let pool = Path::new(&self.layout.prompts_rel).to_path_buf();
            self.session.export_system_prompts(
                &self.layout.prompts_dir,
                &pool,
                TUTORIAL_MESSAGES,
                package.language(),
                self.format,
            )?;
            let mut messages = Vec::with_capacity(TUTORIAL_MESSAGES.len());
            for id in TUTORIAL_MESSAGES {
                let file_name = self.format.file_name(id);
                let mut audio = self.prompt_ref(&file_name);
                audio.title = Some(id.to_string());
                messages.push(audio);
            }
            let (short_prompt, long_prompt) = self.category_prompts(CATEGORY_TUTORIAL)?;
            records.push(PlaylistRecord {
                name: "tutorial".to_string(),
                short_prompt,
                long_prompt,
                messages,
            });
        }

        if package.user_feedback_public() {
            let (short_prompt, long_prompt) = self.category_prompts(CATEGORY_USER_FEEDBACK)?;
            records.push(PlaylistRecord {
                name: "userfeedback".to_string(),
                short_prompt,
                long_prompt,
                messages: Vec::new(),
            });
        }
        Ok(records)
    }

    fn write(mut self, ctx: &BuildContext) -> TbResult<()> {
        let package = self.package;
        let pool = Path::new(&self.layout.prompts_rel).to_path_buf();
        let system_prompts = required_system_prompts(package.has_tutorial())
            .iter()
            .copied()
            .chain([BELL_PROMPT, SILENCE_PROMPT]);
        self.session.export_system_prompts(
            &self.layout.prompts_dir,
            &pool,
            system_prompts,
            package.language(),
            self.format,
        )?;

        // The prompts directory must be first in the table so it is path 1.
        let prompts_path = self.index.intern_path(&self.layout.prompts_rel);
        let announcement = match package.intro() {
            Some(intro) => self.export_message(intro, None)?,
            None => self.prompt_ref(&self.format.file_name(SILENCE_PROMPT)),
        };
        let playlists = self.playlists()?;
        self.index.add_package(PackageRecord {
            name: package.name().to_string(),
            announcement,
            prompt_paths: vec![prompts_path],
            playlists,
        })?;

        let system_dir = self.layout.image_dir.join("system");
        if let Some(source) = IndexedGeneration::system_source(ctx) {
            let copied = copy_dir_all(&source, &system_dir)?;
            debug!(files = copied, source = %source.display(), "system files staged");
        }
        write_system_markers(&system_dir, package)?;

        let text = self.index.render(ctx.created_at())?;
        atomic_write(
            &self.layout.image_dir.join("content").join(PACKAGES_DATA_FILE),
            text.as_bytes(),
        )?;
        self.session.push_index(self.index);
        Ok(())
    }
}

impl DeviceGenerationStrategy for IndexedGeneration {
    fn generation(&self) -> DeviceGeneration {
        DeviceGeneration::V2
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn export_firmware(&self, ctx: &BuildContext) -> TbResult<PathBuf> {
        let source = Self::firmware_source(ctx)?;
        let target = ctx.deployment_dir().join(FIRMWARE_V2_DIR);
        recreate_dir(&target)?;
        copy_dir_all(&source, &target)?;
        Ok(source)
    }

    fn acceptable_firmware_versions(&self, ctx: &BuildContext) -> TbResult<Vec<String>> {
        let source = Self::firmware_source(ctx)?;
        let label = find_ignoring_case(&source, FIRMWARE_LABEL)?.ok_or_else(|| {
            TbError::MissingRequired {
                path: source.join(FIRMWARE_LABEL),
            }
        })?;
        let text = fs::read_to_string(&label).map_err(|e| TbError::Read {
            path: label.clone(),
            source: e,
        })?;
        let version = text.trim();
        if version.is_empty() {
            return Err(TbError::NoFirmware { path: source });
        }
        Ok(vec![version.to_string()])
    }

    fn add_image_for_package(
        &self,
        ctx: &BuildContext,
        session: &mut BuildSession<'_>,
        package: &PackageSpec,
    ) -> TbResult<()> {
        let layout = ImageLayout::new(&Self::images_dir(ctx), package);
        recreate_dir(&layout.image_dir)?;
        ImageWriter {
            session,
            layout,
            package,
            format: self.audio_format(),
            index: PackageIndex::new(ctx.deployment_name()),
        }
        .write(ctx)
    }

    fn finalize(&self, ctx: &BuildContext, session: &mut BuildSession<'_>) -> TbResult<()> {
        let combined = PackageIndex::combine(ctx.deployment_name(), session.indexes())?;
        let text = combined.render(ctx.created_at())?;
        atomic_write(&Self::images_dir(ctx).join(PACKAGES_DATA_FILE), text.as_bytes())
    }
}
