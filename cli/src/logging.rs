//! Per-invocation logging. Everything goes to stderr because stdout carries the
//! host protocol.

use std::path::Path;

use modinput_core::api::LoggingSettings;
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::CliError;

pub const LOG_ENV: &str = "MODINPUT_LOG";
const FALLBACK_LEVEL: &str = "info";

/// Keeps the subscriber installed for this thread. Dropping it flushes the file writer
/// and restores the previous subscriber.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    _default: DefaultGuard,
}

/// `MODINPUT_LOG` wins over the configured level. An unparseable directive falls back
/// to `info`.
pub fn build_filter(env_value: Option<&str>, configured: &str) -> EnvFilter {
    env_value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_LEVEL))
}

pub fn init_logging(settings: &LoggingSettings) -> Result<LogGuard, CliError> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env_value.as_deref(), &settings.level);

    let (file_out, file_guard) = match settings.directory.as_deref() {
        Some(dir) => {
            let (writer, guard) = file_writer(dir, &settings.file_prefix)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(file_out.map(|writer| fmt::layer().with_writer(writer).with_ansi(false)));

    let default = tracing::subscriber::set_default(subscriber);
    Ok(LogGuard {
        _file: file_guard,
        _default: default,
    })
}

/// Daily-rolled `<prefix>.log.<date>` files under `dir`.
fn file_writer(dir: &Path, prefix: &str) -> Result<(NonBlocking, WorkerGuard), CliError> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, format!("{prefix}.log"));
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins_over_config() {
        let filter = build_filter(Some("modinput=debug"), "warn");
        assert_eq!(filter.to_string(), "modinput=debug");
    }

    #[test]
    fn blank_env_uses_configured_level() {
        let filter = build_filter(Some("  "), "warn");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let filter = build_filter(None, "verbose=loudest");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn file_logging_creates_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let settings = LoggingSettings {
            level: "info".to_string(),
            directory: Some(dir.clone()),
            file_prefix: "test".to_string(),
        };

        let guard = init_logging(&settings).unwrap();
        tracing::info!(target: "modinput.test", "written to file");
        drop(guard);

        assert!(dir.is_dir());
        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("test.log")));
    }
}
