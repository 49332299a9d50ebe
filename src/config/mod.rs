//! Configuration module for tbdeploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (TBDEPLOY_*)
//! 3. `--config` file, else `./tbdeploy.toml`, else `<config dir>/tbdeploy/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    apply_overrides, config_candidates, load_config, load_with_warnings, with_env_overrides,
    ConfigWarning, CONFIG_FILE_NAME, ENV_PREFIX,
};
pub use types::{expand_home, BuildConfig, Config, PathsConfig, ProgramConfig};
