//! Test environment builder for isolated tbdeploy testing.
//!
//! `ProgramEnv` lays out a complete program in a temp directory:
//!
//! ```text
//! <root>/
//! ├── tbdeploy.toml
//! ├── TB_Options/{firmware, firmware.v2, system.v2, basic, system_menus, config_files, languages}
//! ├── content-export/{messages, languages, communities}
//! ├── programspec/{recipients.csv, recipients_map.csv}
//! ├── staging/
//! └── published/
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use walkdir::WalkDir;

use tbdeploy::application::{BuildContext, BuildResult, PublishOptions, PublishResult};
use tbdeploy::config::Config;
use tbdeploy::infrastructure::repositories::load_deployment_spec;
use tbdeploy::presentation::factory::{build_paths, create_build_use_case};
use tbdeploy::{DeviceGeneration, PublishUseCase, TbResult};

use super::fixtures::*;

/// Result of running the tbdeploy binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub struct ProgramEnv {
    pub root: TempDir,
}

impl ProgramEnv {
    /// A program tree with the `TEST-24-1` deployment description.
    pub fn new() -> Self {
        let env = Self {
            root: TempDir::new().unwrap(),
        };
        env.write_options();
        env.write_content();
        env.write_program_spec();
        env.write_config();
        env.write("TEST-24-1.toml", TEST_24_1);
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn staging(&self) -> PathBuf {
        self.path("staging")
    }

    pub fn publish_root(&self) -> PathBuf {
        self.path("published")
    }

    /// `staging/content/TEST-24-1`
    pub fn deployment_dir(&self) -> PathBuf {
        self.staging().join("content").join(DEPLOYMENT)
    }

    pub fn staged(&self, relative: &str) -> PathBuf {
        self.deployment_dir().join(relative)
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.program.id = PROGRAM.to_string();
        config.program.operator = "tester@example.org".to_string();
        config.paths.staging = Some(self.staging());
        config.paths.publish = Some(self.publish_root());
        config.paths.tb_options = Some(self.path("TB_Options"));
        config.paths.programspec = Some(self.path("programspec"));
        config.paths.content = Some(self.path("content-export"));
        config
    }

    /// Build `spec` through the library with the fixed clock.
    pub fn try_build_spec(
        &self,
        spec: &str,
        generation: DeviceGeneration,
        dedup: bool,
    ) -> TbResult<BuildResult> {
        let config = self.config();
        let deployment = load_deployment_spec(&self.path(spec))?;
        let ctx = BuildContext::new(PROGRAM, deployment, generation, build_paths(&config))
            .with_operator(config.program.operator.clone())
            .with_dedup(dedup)
            .with_created_at(created_at());
        create_build_use_case(&config)?.execute(&ctx)
    }

    pub fn build_spec(&self, spec: &str, generation: DeviceGeneration, dedup: bool) -> BuildResult {
        self.try_build_spec(spec, generation, dedup).unwrap()
    }

    pub fn build(&self, generation: DeviceGeneration) -> BuildResult {
        self.build_spec("TEST-24-1.toml", generation, true)
    }

    pub fn publish(&self) -> PublishResult {
        let options = PublishOptions::new(self.staging(), self.publish_root(), DEPLOYMENT)
            .with_published_at(created_at());
        PublishUseCase::new().execute(&options).unwrap()
    }

    /// Run the binary from the program root with a private home directory.
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let home = self.path("home");
        fs::create_dir_all(&home).unwrap();
        let mut command = Command::new(env!("CARGO_BIN_EXE_tbdeploy"));
        command
            .args(args)
            .current_dir(self.root.path())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("RUST_LOG");
        for (key, _) in std::env::vars() {
            if key.starts_with("TBDEPLOY_") {
                command.env_remove(key);
            }
        }
        command.envs(env_vars.iter().copied());
        let output = command.output().unwrap();
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    fn write_options(&self) {
        for name in V1_FIRMWARE {
            self.write(&format!("TB_Options/firmware/{name}"), name);
        }
        self.write("TB_Options/basic/bootstrap.txt", "boot");
        self.write("TB_Options/firmware.v2/TBookRev2b.hex", ":00000001FF");
        self.write("TB_Options/firmware.v2/firmware_built.txt", V2_FIRMWARE_LABEL);
        self.write("TB_Options/system.v2/csm_data.txt", "csm");
        for with_intro in ["with", "no"] {
            for feedback in ["", "_no_fb"] {
                let name = format!("control-{with_intro}_intro{feedback}.txt");
                self.write(&format!("TB_Options/system_menus/{name}"), &name);
            }
        }
        self.write("TB_Options/config_files/config.txt", "config");
        for language in ["en", "fr"] {
            self.write(&format!("TB_Options/languages/{language}/$0-1.txt"), "17\n16\n");
        }
    }

    fn write_content(&self) {
        for ext in ["a18", "mp3"] {
            for id in MESSAGES {
                self.write(&format!("content-export/messages/{id}.{ext}"), &format!("{id}.{ext}"));
            }
            for language in ["en", "fr"] {
                for prompt in SYSTEM_PROMPTS {
                    self.write(
                        &format!("content-export/languages/{language}/{prompt}.{ext}"),
                        &format!("{language}/{prompt}.{ext}"),
                    );
                }
                for category in CATEGORIES {
                    for stem in [category.to_string(), format!("i{category}")] {
                        self.write(
                            &format!("content-export/languages/{language}/cat/{stem}.{ext}"),
                            &format!("{language}/cat/{stem}.{ext}"),
                        );
                    }
                }
            }
            self.write(
                &format!("content-export/communities/village-one/languages/en/10.{ext}"),
                "hello",
            );
        }
    }

    fn write_program_spec(&self) {
        self.write("programspec/recipients.csv", RECIPIENTS_CSV);
        self.write("programspec/recipients_map.csv", RECIPIENTS_MAP_CSV);
    }

    fn write_config(&self) {
        let config = format!(
            "[program]\nid = '{PROGRAM}'\noperator = 'tester@example.org'\n\n\
             [paths]\nstaging = 'staging'\npublish = 'published'\n\
             tb_options = 'TB_Options'\nprogramspec = 'programspec'\ncontent = 'content-export'\n"
        );
        self.write("tbdeploy.toml", &config);
    }
}

/// Files below `dir`, relative, with forward slashes, sorted.
pub fn tree(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

pub fn file_len(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}
