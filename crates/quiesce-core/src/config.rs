use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::file_tree::{DisplayFilter, TreeOptions};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuiesceConfig {
    pub version: u32,
    pub tree: TreeConfig,
    pub tasks: TasksConfig,
    pub logging: LoggingConfig,
}

impl Default for QuiesceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            tree: TreeConfig::default(),
            tasks: TasksConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    pub show_root_item: bool,
    pub compress_single_child_folders: bool,
    pub default_filter: DisplayFilter,
    pub show_line_changes: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let options = TreeOptions::default();
        Self {
            show_root_item: options.show_root_item,
            compress_single_child_folders: options.compress_single_child_folders,
            default_filter: DisplayFilter::All,
            show_line_changes: false,
        }
    }
}

impl TreeConfig {
    pub fn options(&self) -> TreeOptions {
        TreeOptions {
            show_root_item: self.show_root_item,
            compress_single_child_folders: self.compress_single_child_folders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TasksConfig {
    pub idle_timeout_ms: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 5_000,
        }
    }
}

impl TasksConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_dir() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs.home_dir().join(".config").join("quiesce"))
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    Ok(resolve_config_dir()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<QuiesceConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: QuiesceConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn load_config_or_default(path: &Path) -> Result<QuiesceConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(QuiesceConfig::default())
        }
        other => other,
    }
}

pub fn validate_config(config: &QuiesceConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if config.tasks.idle_timeout_ms == 0 {
        return Err(ConfigError::Validation {
            message: "tasks.idle_timeout_ms must be greater than zero".to_string(),
        });
    }

    if config.logging.level.parse::<tracing::Level>().is_err() {
        return Err(ConfigError::Validation {
            message: format!(
                "logging.level '{}' must be one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config_from_toml(raw: &str) -> Result<QuiesceConfig, ConfigError> {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp config");
        load_config(file.path())
    }

    #[test]
    fn accepts_full_config() {
        let raw = r#"
version = 1

[tree]
show_root_item = true
compress_single_child_folders = false
default_filter = "unstaged"
show_line_changes = true

[tasks]
idle_timeout_ms = 250

[logging]
level = "debug"
format = "json"
"#;

        let config = load_config_from_toml(raw).expect("valid config");
        assert!(config.tree.options().show_root_item);
        assert!(!config.tree.options().compress_single_child_folders);
        assert_eq!(config.tree.default_filter, DisplayFilter::Unstaged);
        assert_eq!(config.tasks.idle_timeout(), Duration::from_millis(250));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn omitted_sections_use_defaults() {
        let config = load_config_from_toml("version = 1\n").expect("valid config");
        assert_eq!(config, QuiesceConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            load_config_or_default(&dir.path().join("config.toml")).expect("default config");
        assert_eq!(config.tasks.idle_timeout_ms, 5_000);
    }

    #[test]
    fn rejects_unknown_version() {
        let error = load_config_from_toml("version = 2\n").expect_err("config should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn rejects_zero_idle_timeout() {
        let raw = r#"
version = 1

[tasks]
idle_timeout_ms = 0
"#;

        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let raw = r#"
version = 1

[logging]
level = "loud"
"#;

        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("logging.level 'loud'"));
    }

    #[test]
    fn rejects_unknown_filter_name() {
        let raw = r#"
version = 1

[tree]
default_filter = "modified"
"#;

        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
