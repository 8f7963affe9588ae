//! Provider driver gateway.
//!
//! Abstraction over per-provider NLB APIs. The control plane sees one
//! capability set — create, describe, delete — behind the [`NlbDriver`]
//! trait, with one implementation selected per connection identifier through
//! the [`DriverRegistry`]. The shipped implementations are the HTTP broker
//! driver and an in-memory mock for tests and local development.

mod driver;
mod error;
mod http;
mod mock;
mod registry;

pub use driver::{ConnectionConfig, DriverNlb, DriverNlbSpec, NlbDriver};
pub use error::{DriverError, Result as DriverResult};
pub use http::HttpDriver;
pub use mock::{MockDriver, MockFailure};
pub use registry::DriverRegistry;

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::errors::Result;

/// Build the driver registry from configuration: the connection table plus
/// one HTTP driver per distinct provider, or the mock driver when requested.
pub fn build_registry(config: &ProviderConfig) -> Result<DriverRegistry> {
    let mut registry = DriverRegistry::new();
    let connections = config.load_connections()?;

    if config.use_mock_driver {
        registry.register(Arc::new(MockDriver::new("mock")));
        registry.add_connection(ConnectionConfig::new("mock-local", "mock"));
        for connection in connections {
            registry.add_connection(connection);
        }
        return Ok(registry);
    }

    let broker_url = config
        .broker_url
        .as_deref()
        .ok_or_else(|| crate::errors::Error::config("FLOTILLA_BROKER_URL is not set"))?;

    for connection in connections {
        if !registry.has_provider(&connection.provider) {
            registry
                .register(Arc::new(HttpDriver::new(broker_url, connection.provider.as_str())?));
        }
        registry.add_connection(connection);
    }

    Ok(registry)
}
