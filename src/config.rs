//! Configuration loading.
//!
//! Sources are layered: built-in defaults, then an optional YAML file
//! (`TASK_MANAGER_CONFIG` or `./task-manager.yaml`), then environment
//! variables, then CLI overrides applied by `main`. The database path is the
//! one required setting: the server refuses to start without it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "TASK_MANAGER_CONFIG";
/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "TASK_MANAGER_DB";
/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "task-manager.yaml";

/// Default port for the standalone widget UI.
pub const DEFAULT_UI_PORT: u16 = 31870;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error(
        "no database path configured; set server.db_path in the config file, \
         the {DB_PATH_ENV} environment variable, or pass --database"
    )]
    MissingDbPath,
}

/// UI mode for the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    /// No UI, MCP server only (default)
    #[default]
    None,
    /// Serve the standalone widget pages over HTTP
    Web,
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path to the SQLite database. Required; no default.
    pub db_path: Option<PathBuf>,
    /// UI mode.
    pub ui_mode: UiMode,
    /// Port for the standalone widget UI.
    pub ui_port: u16,
    /// Public origin the widgets report to the chat host.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            ui_mode: UiMode::None,
            ui_port: DEFAULT_UI_PORT,
            base_url: format!("http://localhost:{}", DEFAULT_UI_PORT),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from file (if present) and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(db_path) = std::env::var(DB_PATH_ENV) {
            config.server.db_path = Some(PathBuf::from(db_path));
        }

        Ok(config)
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured database path, or the fatal startup error.
    pub fn require_db_path(&self) -> Result<&Path, ConfigError> {
        self.server
            .db_path
            .as_deref()
            .ok_or(ConfigError::MissingDbPath)
    }

    /// Create the database's parent directory if needed.
    pub fn ensure_db_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.require_db_path()?.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_db_path_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.require_db_path(),
            Err(ConfigError::MissingDbPath)
        ));
    }

    #[test]
    fn parses_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task-manager.yaml");
        std::fs::write(
            &path,
            "server:\n  db_path: /tmp/tasks.db\n  ui_mode: web\n  ui_port: 9000\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.server.db_path.as_deref(),
            Some(Path::new("/tmp/tasks.db"))
        );
        assert_eq!(config.server.ui_mode, UiMode::Web);
        assert_eq!(config.server.ui_port, 9000);
    }

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config: Config = serde_yaml::from_str("server:\n  db_path: x.db\n").unwrap();
        assert_eq!(config.server.ui_mode, UiMode::None);
        assert_eq!(config.server.ui_port, DEFAULT_UI_PORT);
    }
}
