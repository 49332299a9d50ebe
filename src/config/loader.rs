//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::value_objects::DeviceGeneration;
use crate::error::{TbError, TbResult};

use super::types::Config;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tbdeploy.toml";
/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "TBDEPLOY_";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> TbResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| TbError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| TbError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Candidate config files in lookup order
pub fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("tbdeploy").join("config.toml"));
    }
    candidates
}

/// Load `--config`, `./tbdeploy.toml`, the user config, or defaults, then
/// apply `TBDEPLOY_*` overrides. An explicit file that is missing or broken
/// is an error; implicit ones are skipped.
pub fn load_config(explicit: Option<&Path>) -> TbResult<(Config, Vec<ConfigWarning>)> {
    for candidate in config_candidates(explicit) {
        if explicit.is_none() && !candidate.is_file() {
            continue;
        }
        match load_with_warnings(&candidate) {
            Ok((config, warnings)) => {
                debug!(path = %candidate.display(), "loaded configuration");
                return Ok((with_env_overrides(config), warnings));
            }
            Err(e) if explicit.is_some() => return Err(e),
            Err(e) => warn!("ignoring {}: {e}", candidate.display()),
        }
    }
    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (TBDEPLOY_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
}

/// Overrides read through `lookup`, keyed without the prefix.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(id) = lookup("PROGRAM_ID") {
        config.program.id = id;
    }
    if let Some(operator) = lookup("OPERATOR") {
        config.program.operator = operator;
    }

    let paths = &mut config.paths;
    for (name, slot) in [
        ("STAGING", &mut paths.staging),
        ("PUBLISH", &mut paths.publish),
        ("TB_OPTIONS", &mut paths.tb_options),
        ("PROGRAMSPEC", &mut paths.programspec),
        ("CONTENT", &mut paths.content),
        ("SOFTWARE", &mut paths.software),
    ] {
        if let Some(value) = lookup(name) {
            *slot = Some(PathBuf::from(value));
        }
    }

    if let Some(generation) = lookup("GENERATION") {
        match generation.parse::<DeviceGeneration>() {
            Ok(g) => config.build.generation = g,
            Err(e) => warn!("{ENV_PREFIX}GENERATION: {e}"),
        }
    }
    if let Some(val) = lookup("DEDUP") {
        config.build.dedup = val.to_lowercase() != "false" && val != "0";
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "program",
        "id",
        "operator",
        "paths",
        "staging",
        "publish",
        "tb_options",
        "programspec",
        "content",
        "software",
        "build",
        "generation",
        "dedup",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
