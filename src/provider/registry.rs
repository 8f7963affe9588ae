//! Provider driver registry
//!
//! Manages the set of provider drivers and the connection table that routes
//! requests onto them. Drivers are registered under their provider name;
//! a connection identifier resolves to exactly one driver.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::driver::{ConnectionConfig, NlbDriver};
use crate::errors::{Error, Result};

/// Registry of provider drivers keyed by provider name, plus the connection
/// table mapping connection identifiers onto providers.
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn NlbDriver>>,
    connections: HashMap<String, ConnectionConfig>,
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.drivers.keys().collect::<Vec<_>>())
            .field("connections", &self.connections.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { drivers: HashMap::new(), connections: HashMap::new() }
    }

    /// Register a driver under its provider name. Registering the same
    /// provider again replaces the previous driver.
    pub fn register(&mut self, driver: Arc<dyn NlbDriver>) {
        let provider = driver.provider().to_string();
        info!(provider = %provider, "Registering provider driver");
        self.drivers.insert(provider, driver);
    }

    /// Add a connection to the routing table.
    pub fn add_connection(&mut self, connection: ConnectionConfig) {
        self.connections.insert(connection.name.clone(), connection);
    }

    /// Check if a provider driver is registered
    pub fn has_provider(&self, provider: &str) -> bool {
        self.drivers.contains_key(provider)
    }

    /// Get list of registered provider names
    pub fn registered_providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = self.drivers.keys().cloned().collect();
        providers.sort();
        providers
    }

    /// Number of known connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Resolve a connection identifier to its driver and connection binding.
    pub fn resolve(&self, connection_name: &str) -> Result<(Arc<dyn NlbDriver>, ConnectionConfig)> {
        let connection = self
            .connections
            .get(connection_name)
            .cloned()
            .ok_or_else(|| Error::config(format!("unknown connection '{}'", connection_name)))?;

        let driver = self.drivers.get(&connection.provider).cloned().ok_or_else(|| {
            Error::config(format!(
                "no driver registered for provider '{}' (connection '{}')",
                connection.provider, connection_name
            ))
        })?;

        Ok((driver, connection))
    }
}
