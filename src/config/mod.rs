//! Tool configuration
//!
//! Layered like any other plain data, and merged with this crate's own
//! merge engine:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/plainmerge/config.toml)
//! 3. Repo config (.plainmerge.toml)
//! 4. CLI flags

mod defaults;
mod effective;

pub use defaults::BuiltinDefaults;
pub use effective::{
    default_host_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig,
    OutputOptions, REPO_CONFIG_FILE,
};
