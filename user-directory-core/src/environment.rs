//! Runtime environment detection and backend selection.

use serde::{Deserialize, Serialize};

/// Environment variable naming the deployment environment.
pub const ENVIRONMENT_VAR: &str = "USER_DIRECTORY_ENV";

/// Value of [`ENVIRONMENT_VAR`] that marks an ephemeral deployment.
const EPHEMERAL_VALUE: &str = "production";

/// Where the process is running, as far as persistence is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Writable, persistent local filesystem
    Local,
    /// Production / serverless: the filesystem is not writable or not kept
    Ephemeral,
}

impl RuntimeEnvironment {
    /// Interpret a raw [`ENVIRONMENT_VAR`] value.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case(EPHEMERAL_VALUE) => Self::Ephemeral,
            _ => Self::Local,
        }
    }

    /// Read [`ENVIRONMENT_VAR`] from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_value(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }
}

/// Which backend serves a read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Durable,
    Volatile,
}

/// Pick the backend for an environment.
#[must_use]
pub const fn select_backend(env: RuntimeEnvironment) -> BackendKind {
    match env {
        RuntimeEnvironment::Local => BackendKind::Durable,
        RuntimeEnvironment::Ephemeral => BackendKind::Volatile,
    }
}

/// How the store learns its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentProbe {
    /// Re-read the process environment on every read and write
    #[default]
    Detect,
    /// Pinned environment
    Fixed(RuntimeEnvironment),
}

impl EnvironmentProbe {
    #[must_use]
    pub fn current(self) -> RuntimeEnvironment {
        match self {
            Self::Detect => RuntimeEnvironment::detect(),
            Self::Fixed(env) => env,
        }
    }
}
