//! # Observability Infrastructure
//!
//! Structured logging and metrics collection for the flotilla control plane.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::init_metrics;

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::ObservabilityConfig;
use crate::errors::Result;

/// Initialize all observability components.
///
/// Returns the log appender guard (when file logging is enabled); hold it
/// for the life of the process.
pub fn init_observability(config: &ObservabilityConfig) -> Result<Option<WorkerGuard>> {
    let guard = init_logging(config)?;
    init_metrics(config)?;

    tracing::info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        metrics_enabled = config.enable_metrics,
        "Observability initialized"
    );

    Ok(guard)
}
