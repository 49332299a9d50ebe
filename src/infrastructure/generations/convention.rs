//! First-generation ("convention") images
//!
//! No index file: a playlist is `messages/lists/1/<category>.txt` holding one
//! item id per line, and `_activeLists.txt` names the categories the device
//! walks through. Audio is A18.
//!
//! ```text
//! content/<deployment>/
//! ├── basic/<firmware>.img
//! ├── firmware.v1/<firmware>.img
//! └── images/<package>/
//!     ├── languages/<lang>/{0.a18, 1.a18, ..., control.txt, cat/}
//!     ├── messages/{audio/, lists/1/}
//!     └── system/{<package>.pkg, <group>.grp, config.txt, profiles.txt}
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::build::{
    required_system_prompts, write_system_markers, BuildContext, BuildSession,
    DeviceGenerationStrategy, BELL_PROMPT, FIRST_MESSAGE_LIST, SILENCE_PROMPT,
};
use crate::domain::entities::{PackageSpec, CATEGORY_TUTORIAL, CATEGORY_USER_FEEDBACK};
use crate::domain::value_objects::{AudioFormat, DeviceGeneration};
use crate::error::{TbError, TbResult};
use crate::infrastructure::fs::{atomic_write, copy_dir_all, copy_file, file_names, touch};

/// Oldest firmware that can hide user feedback
pub const MIN_FIRMWARE_FOR_HIDDEN_FEEDBACK: &str = "r1220";

const ACTIVE_LISTS: &str = "_activeLists.txt";
const INTRO_FILE: &str = "intro";

#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionGeneration;

impl ConventionGeneration {
    pub fn new() -> Self {
        Self
    }

    fn firmware_dir(ctx: &BuildContext) -> PathBuf {
        ctx.tb_options().join("firmware")
    }

    /// Firmware images, ordered case-insensitively.
    fn firmware_images(ctx: &BuildContext) -> TbResult<Vec<String>> {
        let mut images = file_names(&Self::firmware_dir(ctx))?;
        images.sort_by_key(|name| name.to_ascii_lowercase());
        Ok(images)
    }

    fn image_dir(ctx: &BuildContext, package: &PackageSpec) -> PathBuf {
        ctx.deployment_dir().join("images").join(package.name())
    }
}

/// `control-{with|no}_intro{_no_fb}.txt`
pub fn control_file_name(has_intro: bool, feedback_hidden: bool) -> String {
    format!(
        "control-{}_intro{}.txt",
        if has_intro { "with" } else { "no" },
        if feedback_hidden { "_no_fb" } else { "" }
    )
}

/// Contents of `_activeLists.txt`. Declared categories keep their order and
/// are locked with `!`; feedback stays unlocked and is left out when hidden.
pub fn active_lists(package: &PackageSpec) -> String {
    let mut lines = Vec::new();
    for category in package.categories() {
        if category == CATEGORY_USER_FEEDBACK {
            if package.user_feedback_public() {
                lines.push(category.to_string());
            }
        } else if category.starts_with('!') {
            lines.push(category.to_string());
        } else {
            lines.push(format!("!{category}"));
        }
    }
    if package.user_feedback_public() && !package.declares_category(CATEGORY_USER_FEEDBACK) {
        lines.push(CATEGORY_USER_FEEDBACK.to_string());
    }
    if package.has_tutorial() {
        lines.push(format!("!{CATEGORY_TUTORIAL}"));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Category prompts an image needs: declared ones, feedback, then tutorial.
fn prompt_categories(package: &PackageSpec) -> Vec<&str> {
    let mut categories = package.categories();
    for extra in [CATEGORY_USER_FEEDBACK, CATEGORY_TUTORIAL] {
        if extra == CATEGORY_TUTORIAL && !package.has_tutorial() {
            continue;
        }
        if !categories.contains(&extra) {
            categories.push(extra);
        }
    }
    categories
}

impl DeviceGenerationStrategy for ConventionGeneration {
    fn generation(&self) -> DeviceGeneration {
        DeviceGeneration::V1
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::A18
    }

    fn export_firmware(&self, ctx: &BuildContext) -> TbResult<PathBuf> {
        let dir = Self::firmware_dir(ctx);
        let latest = Self::firmware_images(ctx)?
            .pop()
            .ok_or_else(|| TbError::NoFirmware { path: dir.clone() })?;
        let source = dir.join(&latest);
        let deployment_dir = ctx.deployment_dir();
        for target in ["basic", "firmware.v1"] {
            copy_file(&source, &deployment_dir.join(target).join(&latest))?;
        }

        let bootstrap = ctx.tb_options().join("basic");
        if bootstrap.is_dir() {
            let copied = copy_dir_all(&bootstrap, &deployment_dir.join("basic"))?;
            debug!(files = copied, "bootstrap files staged");
        }
        Ok(source)
    }

    fn acceptable_firmware_versions(&self, ctx: &BuildContext) -> TbResult<Vec<String>> {
        let floor = ctx.deployment().any_user_feedback_hidden();
        let versions: Vec<String> = Self::firmware_images(ctx)?
            .iter()
            .map(|name| {
                Path::new(name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.clone())
            })
            .filter(|v| !floor || v.to_ascii_lowercase().as_str() >= MIN_FIRMWARE_FOR_HIDDEN_FEEDBACK)
            .collect();
        if versions.is_empty() {
            return Err(TbError::NoFirmware {
                path: Self::firmware_dir(ctx),
            });
        }
        Ok(versions)
    }

    fn add_image_for_package(
        &self,
        ctx: &BuildContext,
        session: &mut BuildSession<'_>,
        package: &PackageSpec,
    ) -> TbResult<()> {
        let format = self.audio_format();
        let language = package.language();
        let image_dir = Self::image_dir(ctx, package);
        let audio_dir = image_dir.join("messages/audio");
        let lists_dir = image_dir.join("messages/lists").join(FIRST_MESSAGE_LIST);
        let language_dir = image_dir.join("languages").join(language);
        let pool_language = Path::new("languages").join(language);

        // Playlist content and list files
        for category in package.categories() {
            let mut list = String::new();
            for playlist in package.playlists().iter().filter(|p| p.category() == category) {
                for item in playlist.items() {
                    let target = session.resolve(
                        &audio_dir,
                        Path::new("messages/audio"),
                        &format.file_name(item.id()),
                    )?;
                    session.export(&target, |e, t| e.export_audio_item(item, format, t));
                    list.push_str(item.id());
                    list.push('\n');
                }
            }
            atomic_write(&lists_dir.join(format!("{category}.txt")), list.as_bytes())?;
        }
        let feedback_list = lists_dir.join(format!("{CATEGORY_USER_FEEDBACK}.txt"));
        if !feedback_list.exists() {
            touch(&feedback_list)?;
        }
        atomic_write(&lists_dir.join(ACTIVE_LISTS), active_lists(package).as_bytes())?;

        // System prompts, then category prompt pairs
        let system_prompts = required_system_prompts(package.has_tutorial())
            .iter()
            .copied()
            .chain([BELL_PROMPT, SILENCE_PROMPT]);
        session.export_system_prompts(&language_dir, &pool_language, system_prompts, language, format)?;

        let cat_dir = language_dir.join("cat");
        let pool_cat = pool_language.join("cat");
        for category in prompt_categories(package) {
            session.export_category_pair(&cat_dir, &pool_cat, package.name(), category, language, format)?;
        }

        if let Some(intro) = package.intro() {
            session.export(&language_dir.join(format.file_name(INTRO_FILE)), |e, t| {
                e.export_audio_item(intro, format, t)
            });
        }

        // Fixed files the device cannot run without
        if package.has_tutorial() {
            let tutorial_list = format!("{CATEGORY_TUTORIAL}.txt");
            copy_file(
                &ctx.tb_options().join("languages").join(language).join(&tutorial_list),
                &language_dir.join(&tutorial_list),
            )?;
        }
        let control = control_file_name(package.intro().is_some(), package.user_feedback_hidden());
        copy_file(
            &ctx.tb_options().join("system_menus").join(control),
            &language_dir.join("control.txt"),
        )?;

        let system_dir = image_dir.join("system");
        write_system_markers(&system_dir, package)?;
        copy_file(
            &ctx.tb_options().join("config_files/config.txt"),
            &system_dir.join("config.txt"),
        )?;
        Ok(())
    }
}
