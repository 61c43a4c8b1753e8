//! Server configuration
//!
//! Loaded from a TOML file (`USER_DIRECTORY_CONFIG`, else `config.toml`),
//! then overridden by environment variables. A missing file yields defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use user_directory_core::environment::{EnvironmentProbe, RuntimeEnvironment};

const CONFIG_PATH_VAR: &str = "USER_DIRECTORY_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; defaults to the number of CPUs
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON document path, relative to the working directory unless absolute
    pub path: PathBuf,
    pub environment: StorageEnvironment,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("server").join("db.json"),
            environment: StorageEnvironment::Auto,
        }
    }
}

/// Backend environment as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageEnvironment {
    /// Follow `USER_DIRECTORY_ENV` at every read and write
    #[default]
    Auto,
    Local,
    Ephemeral,
}

impl StorageEnvironment {
    #[must_use]
    pub fn probe(self) -> EnvironmentProbe {
        match self {
            Self::Auto => EnvironmentProbe::Detect,
            Self::Local => EnvironmentProbe::Fixed(RuntimeEnvironment::Local),
            Self::Ephemeral => EnvironmentProbe::Fixed(RuntimeEnvironment::Ephemeral),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
    /// Enables a daily rolling log file in this directory
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl AppConfig {
    /// Load from the configured file and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file; a missing file gives the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config file {}", path.display()))
            }
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `USER_DIRECTORY_HOST`, `USER_DIRECTORY_PORT` and `USER_DIRECTORY_DB_PATH`.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(host) = lookup("USER_DIRECTORY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("USER_DIRECTORY_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid USER_DIRECTORY_PORT: {port}"))?;
        }
        if let Some(path) = lookup("USER_DIRECTORY_DB_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        Ok(())
    }
}
