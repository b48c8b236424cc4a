//! Effective configuration with full provenance
//!
//! The effective config captures the merged configuration plus information
//! about where each layer came from.

use chrono::{DateTime, Utc};
use plainmerge_classifier::Value;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::defaults::BuiltinDefaults;
use crate::document::{self, Format, LoadError};
use crate::merge::{merge_layers, MergeError, MergeOptions, Vacancy};

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "plainmerge/effective_config@1";

/// Repo config file name, looked up in the working directory
pub const REPO_CONFIG_FILE: &str = ".plainmerge.toml";

/// Upper bound accepted for `max_depth`
const MAX_DEPTH_CEILING: u64 = 4096;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Repo,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Output formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    pub pretty: bool,
    pub sort_keys: bool,
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// SHA-256 of the canonical (RFC 8785) form of `config`
    pub config_digest: String,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,

    #[serde(skip)]
    merge_options: MergeOptions,

    #[serde(skip)]
    output_options: OutputOptions,
}

/// Default host config location: `$HOME/.config/plainmerge/config.toml`
pub fn default_host_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("plainmerge")
            .join("config.toml")
    })
}

impl EffectiveConfig {
    /// Build effective config from layers
    pub fn build(
        host_config_path: Option<&Path>,
        repo_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layers 2 and 3: config files, skipped when absent
        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Repo, repo_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            debug!(?origin, path = %path.display(), "loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers)?;
        let (merge_options, output_options) = Self::validate_config(&merged)?;
        let config_digest = Self::canonical_digest(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            config_digest,
            sources,
            merge_options,
            output_options,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let doc = document::parse_bytes(path, &bytes, Format::Toml)?;
        Ok((doc.value, doc.digest))
    }

    fn canonical_digest(config: &Value) -> Result<String, ConfigError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(config)
            .map_err(|e| ConfigError::ParseError(format!("JCS error: {}", e)))?;
        Ok(document::digest(&jcs_bytes))
    }

    /// Validate configuration values
    fn validate_config(config: &Value) -> Result<(MergeOptions, OutputOptions), ConfigError> {
        // max_depth must be in [1, 4096]
        let max_depth = match config.get("max_depth") {
            Some(v) => match v.as_u64() {
                Some(depth) if (1..=MAX_DEPTH_CEILING).contains(&depth) => depth as usize,
                _ => {
                    return Err(ConfigError::ValidationError(format!(
                        "max_depth must be an integer in [1, {}]",
                        MAX_DEPTH_CEILING
                    )));
                }
            },
            None => crate::merge::DEFAULT_MAX_DEPTH,
        };

        let vacancy = match config.get("vacancy") {
            Some(v) => v
                .as_str()
                .ok_or_else(|| ConfigError::ValidationError("vacancy must be a string".to_string()))?
                .parse::<Vacancy>()
                .map_err(ConfigError::ValidationError)?,
            None => Vacancy::default(),
        };

        let flag = |key: &str, default: bool| -> Result<bool, ConfigError> {
            match config.pointer(&format!("/output/{}", key)) {
                Some(v) => v.as_bool().ok_or_else(|| {
                    ConfigError::ValidationError(format!("output.{} must be a boolean", key))
                }),
                None => Ok(default),
            }
        };
        let output = OutputOptions {
            pretty: flag("pretty", true)?,
            sort_keys: flag("sort_keys", false)?,
        };

        Ok((MergeOptions { max_depth, vacancy }, output))
    }

    pub fn merge_options(&self) -> MergeOptions {
        self.merge_options
    }

    pub fn output_options(&self) -> OutputOptions {
        self.output_options
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.merge_options(), MergeOptions::default());
        assert!(config.output_options().pretty);
        assert_eq!(config.config.pointer("/output/sort_keys"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_build_with_cli_override() {
        let cli = Value::from(json!({"max_depth": 16, "output": {"sort_keys": true}}));

        let config = EffectiveConfig::build(None, None, Some(cli)).unwrap();

        assert_eq!(config.merge_options().max_depth, 16);
        // Nested override keeps the sibling default
        assert!(config.output_options().pretty);
        assert!(config.output_options().sort_keys);
    }

    #[test]
    fn test_validation_max_depth() {
        for bad in [json!(0), json!(5000), json!("deep"), json!(2.5)] {
            let cli = Value::from(json!({ "max_depth": bad }));
            let result = EffectiveConfig::build(None, None, Some(cli));
            assert!(result.unwrap_err().to_string().contains("max_depth"));
        }
    }

    #[test]
    fn test_validation_vacancy() {
        let cli = Value::from(json!({"vacancy": "loose"}));
        let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("unknown vacancy policy"));

        let cli = Value::from(json!({"vacancy": "falsy"}));
        let config = EffectiveConfig::build(None, None, Some(cli)).unwrap();
        assert_eq!(config.merge_options().vacancy, Vacancy::Falsy);
    }

    #[test]
    fn test_validation_output_flags() {
        let cli = Value::from(json!({"output": {"pretty": "yes"}}));
        let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("output.pretty"));
    }

    #[test]
    fn test_output_replaced_by_scalar_is_merge_error() {
        let mut host = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(host, "output = 1").unwrap();
        let cli = Value::from(json!({"output": {"pretty": false}}));

        let err = EffectiveConfig::build(Some(host.path()), None, Some(cli)).unwrap_err();
        assert!(matches!(err, ConfigError::Merge(_)));
    }

    #[test]
    fn test_load_toml_layers() {
        let mut host = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(host, "max_depth = 64").unwrap();
        writeln!(host, "[output]").unwrap();
        writeln!(host, "pretty = false").unwrap();

        let mut repo = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(repo, "max_depth = 32").unwrap();

        let config = EffectiveConfig::build(Some(host.path()), Some(repo.path()), None).unwrap();

        assert_eq!(config.merge_options().max_depth, 32);
        assert!(!config.output_options().pretty);
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[1].origin, ConfigOrigin::Host);
        assert_eq!(config.sources[2].origin, ConfigOrigin::Repo);
        assert_eq!(config.sources[2].digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let config = EffectiveConfig::build(
            Some(Path::new("/nonexistent/host.toml")),
            Some(Path::new("/nonexistent/repo.toml")),
            None,
        )
        .unwrap();

        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_config_digest_ignores_key_order() {
        let a = EffectiveConfig::build(None, None, Some(Value::from(json!({"x": 1, "y": 2}))))
            .unwrap();
        let b: Value = serde_json::from_str(r#"{"y": 2, "x": 1}"#).unwrap();
        let b = EffectiveConfig::build(None, None, Some(b)).unwrap();
        assert_eq!(a.config_digest, b.config_digest);
    }

    #[test]
    fn test_to_json() {
        let json = EffectiveConfig::build(None, None, None)
            .unwrap()
            .to_json()
            .unwrap();
        assert!(json.contains("\"schema_id\": \"plainmerge/effective_config@1\""));
        assert!(json.contains("\"origin\": \"builtin\""));
        assert!(!json.contains("merge_options"));
    }
}
