//! Device Generation Strategy
//!
//! The two device generations share the build sequence but differ in
//! firmware, audio format and on-device layout. Each generation implements
//! this trait; the build use case drives whichever one matches the context.

use std::path::{Path, PathBuf};

use crate::domain::entities::PackageSpec;
use crate::domain::value_objects::{AudioFormat, DeviceGeneration};
use crate::error::TbResult;
use crate::infrastructure::fs::{atomic_write, create_dir_all, touch};

use super::context::BuildContext;
use super::session::BuildSession;

/// Bell played on entering a package
pub const BELL_PROMPT: &str = "0";
/// Short silence, also the stand-in announcement of a package without intro
pub const SILENCE_PROMPT: &str = "7";

const SYSTEM_PROMPTS_WITH_TUTORIAL: [&str; 34] = [
    "0", "1", "2", "3", "4", "5", "6", "9", "10", "11", "16", "17", "18", "19", "20", "21", "22",
    "23", "24", "25", "26", "28", "29", "33", "37", "38", "41", "53", "54", "61", "62", "63", "65",
    "80",
];

const SYSTEM_PROMPTS_WITHOUT_TUTORIAL: [&str; 34] = [
    "0", "1", "2", "4", "5", "6", "7", "9", "10", "11", "16", "17", "18", "19", "20", "21", "22",
    "23", "24", "25", "26", "28", "29", "33", "37", "38", "41", "53", "54", "61", "62", "63", "65",
    "80",
];

/// System prompts every package image must carry.
pub fn required_system_prompts(has_tutorial: bool) -> &'static [&'static str] {
    if has_tutorial {
        &SYSTEM_PROMPTS_WITH_TUTORIAL
    } else {
        &SYSTEM_PROMPTS_WITHOUT_TUTORIAL
    }
}

/// First message list of every profile
pub const FIRST_MESSAGE_LIST: &str = "1";

/// Write the package and group markers plus `profiles.txt` into `system_dir`.
pub fn write_system_markers(system_dir: &Path, package: &PackageSpec) -> TbResult<()> {
    create_dir_all(system_dir)?;
    touch(&system_dir.join(format!("{}.pkg", package.name())))?;
    for group in package.groups() {
        touch(&system_dir.join(format!("{group}.grp")))?;
    }
    let profile = format!(
        "{},{},{},menu\n",
        package.name().to_uppercase(),
        package.language(),
        FIRST_MESSAGE_LIST
    );
    atomic_write(&system_dir.join("profiles.txt"), profile.as_bytes())
}

pub trait DeviceGenerationStrategy: Send + Sync {
    fn generation(&self) -> DeviceGeneration;

    fn audio_format(&self) -> AudioFormat;

    /// Copy firmware into the deployment directory. Returns where it came
    /// from. A generation without firmware cannot be built.
    fn export_firmware(&self, ctx: &BuildContext) -> TbResult<PathBuf>;

    /// Firmware versions the loader may leave on a device for this build.
    fn acceptable_firmware_versions(&self, ctx: &BuildContext) -> TbResult<Vec<String>>;

    /// Stage one package image.
    fn add_image_for_package(
        &self,
        ctx: &BuildContext,
        session: &mut BuildSession<'_>,
        package: &PackageSpec,
    ) -> TbResult<()>;

    /// Deployment-wide output written after the last package.
    fn finalize(&self, _ctx: &BuildContext, _session: &mut BuildSession<'_>) -> TbResult<()> {
        Ok(())
    }
}
