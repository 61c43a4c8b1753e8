//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level. Records emitted
//! through the `log` facade by the library crates are bridged in.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

const LOG_FILE_PREFIX: &str = "user-directory.log";

/// Build the filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the process.
pub fn init(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    let (file_writer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json = config.format == LogFormat::Json;
    let stdout_json = json.then(|| fmt::layer().json());
    let stdout_pretty = (!json).then(fmt::layer);
    let file_layer = file_writer.map(|w| fmt::layer().with_writer(w).with_ansi(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_json)
        .with(stdout_pretty)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
