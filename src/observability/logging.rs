//! # Structured Logging
//!
//! Tracing subscriber setup: env-filtered, optionally JSON-formatted, and
//! optionally writing to a rolling file instead of stdout.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::errors::Result;

/// Initialize the global tracing subscriber.
///
/// Returns the appender guard when logging to a file; the guard must stay
/// alive for the life of the process or buffered lines are lost.
pub fn init_logging(config: &ObservabilityConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if let Some(log_file) = &config.log_file {
        let path = Path::new(log_file);
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "flotilla.log".into());

        let appender = tracing_appender::rolling::daily(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false);

        // try_init: a subscriber may already be installed in test binaries
        if config.json_logging {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }

        return Ok(Some(guard));
    }

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_logging {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }

    Ok(None)
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        database_url = %config.database.url,
        mock_driver = config.provider.use_mock_driver,
        metrics_enabled = config.observability.enable_metrics,
        "flotilla control plane configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_stdout() {
        let config = ObservabilityConfig::default();
        let guard = init_logging(&config).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_init_logging_file_returns_guard() {
        let dir = tempfile::tempdir().unwrap();
        let config = ObservabilityConfig {
            log_file: Some(dir.path().join("flotilla.log").to_string_lossy().into_owned()),
            ..Default::default()
        };
        let guard = init_logging(&config).unwrap();
        assert!(guard.is_some());
    }
}
