//! Configuration loading for ses-firehose.
//!
//! This module handles:
//! - Loading config.json
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Schema version checking

use crate::logging::LogSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SES_REDACT_CONFIG";

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "ses_redact";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Output settings for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Pretty-print JSON written to stdout or the output file.
    #[serde(default)]
    pub pretty: bool,
}

/// Contents of config.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log: LogSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    /// Path the config was read from (None if using defaults).
    pub path: Option<PathBuf>,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority). Must exist.
    pub config_path: Option<PathBuf>,
    /// Explicit config directory, searched for config.json.
    pub config_dir: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit file via `--config` (ConfigOptions::config_path)
/// 2. Environment variable SES_REDACT_CONFIG
/// 3. config.json in ConfigOptions::config_dir or the XDG config home
///    (~/.config/ses_redact/)
/// 4. Built-in defaults
///
/// Explicitly named files must exist; the directory lookup falls back to
/// defaults when no file is present.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    load_config_with_env(options, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with_env<F>(options: &ConfigOptions, env: F) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = &options.config_path {
        return load_required(path);
    }

    if let Some(path) = env(CONFIG_ENV_VAR) {
        return load_required(Path::new(&path));
    }

    let default_path = resolve_config_dir(options, &env).join(CONFIG_FILE_NAME);
    if default_path.exists() {
        let config = load_config_from_file(&default_path)?;
        return Ok(ResolvedConfig {
            config,
            path: Some(default_path),
        });
    }

    Ok(ResolvedConfig {
        config: Config::default(),
        path: None,
    })
}

fn load_required(path: &Path) -> Result<ResolvedConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let config = load_config_from_file(path)?;
    Ok(ResolvedConfig {
        config,
        path: Some(path.to_path_buf()),
    })
}

/// Resolve the config directory.
fn resolve_config_dir<F>(options: &ConfigOptions, env: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = &options.config_dir {
        return dir.clone();
    }

    let xdg_config = env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });

    xdg_config.join(CONFIG_DIR_NAME)
}

/// Load config from a specific file.
pub fn load_config_from_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(ConfigError::VersionMismatch {
            path: path.to_path_buf(),
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_when_dir_empty() {
        let options = ConfigOptions {
            config_path: None,
            config_dir: Some(std::env::temp_dir().join("ses-firehose-test-config-nonexistent")),
        };
        let resolved = load_config_with_env(&options, no_env).unwrap();
        assert!(resolved.path.is_none());
        assert_eq!(resolved.config, Config::default());
    }

    #[test]
    fn test_config_dir_file_is_loaded() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_path_buf();
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{"schema_version": "1.0.0", "log": {"level": "debug", "format": "jsonl"}, "output": {"pretty": true}}"#,
        )
        .unwrap();

        let options = ConfigOptions {
            config_path: None,
            config_dir: Some(dir.clone()),
        };
        let resolved = load_config_with_env(&options, no_env).unwrap();

        assert_eq!(resolved.path, Some(dir.join(CONFIG_FILE_NAME)));
        assert_eq!(resolved.config.log.level, LogLevel::Debug);
        assert_eq!(resolved.config.log.format, LogFormat::Jsonl);
        assert!(resolved.config.output.pretty);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let options = ConfigOptions {
            config_path: Some(PathBuf::from("/nonexistent/ses-firehose/config.json")),
            config_dir: None,
        };
        let err = load_config_with_env(&options, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_env_path_is_used() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.json");
        std::fs::write(&path, r#"{"output": {"pretty": true}}"#).unwrap();

        let env_path = path.to_string_lossy().to_string();
        let env = move |key: &str| (key == CONFIG_ENV_VAR).then(|| env_path.clone());
        let resolved = load_config_with_env(&ConfigOptions::default(), env).unwrap();

        assert_eq!(resolved.path, Some(path));
        assert!(resolved.config.output.pretty);
        assert_eq!(resolved.config.schema_version, CONFIG_SCHEMA_VERSION);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_version_mismatch() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("old.json");
        std::fs::write(&path, r#"{"schema_version": "0.1.0"}"#).unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));
    }
}
