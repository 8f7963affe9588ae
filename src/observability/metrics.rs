//! # Metrics Collection
//!
//! Prometheus metrics for the control plane. Counters are emitted at their
//! call sites through the `metrics` facade; this module installs the
//! exporter and registers descriptions.

use std::net::SocketAddr;

use metrics::{describe_counter, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Initialize the Prometheus exporter if metrics are enabled.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let Some(metrics_addr) = config.metrics_bind_address() else {
        warn!("Metrics disabled: no bind address configured");
        return Ok(());
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("failed to initialize metrics exporter: {}", e)))?;

    describe_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

fn describe_metrics() {
    describe_counter!("nlb_created_total", Unit::Count, "NLBs provisioned through a driver");
    describe_counter!(
        "nlb_registered_total",
        Unit::Count,
        "NLBs adopted from existing provider resources"
    );
    describe_counter!("nlb_deleted_total", Unit::Count, "NLBs removed after clean teardown");
    describe_counter!(
        "nlb_force_deleted_total",
        Unit::Count,
        "NLB records force-removed despite failed teardown"
    );
}
