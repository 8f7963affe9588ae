//! Core provider driver trait and types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// A named credential/provider/region binding. Connections are loaded from
/// the connection table at startup and select which driver serves a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// Connection identifier referenced by NLB requests
    pub name: String,
    /// Provider name the driver registry keys on (`aws`, `gcp`, ...)
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ConnectionConfig {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self { name: name.into(), provider: provider.into(), region: None }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// What a driver needs to provision one load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverNlbSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Provider-side view of a load balancer, as returned by `create` and
/// `describe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverNlb {
    /// Provider-native resource identifier, opaque to the control plane
    pub csp_nlb_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Capability set every provider driver implements.
///
/// One implementation serves all connections of its provider; the concrete
/// target (region, credential) travels in the [`ConnectionConfig`]. Side
/// effects are external — real cloud resources are created and destroyed.
/// Drivers never retry; retry policy belongs to the lifecycle controller.
#[async_trait]
pub trait NlbDriver: Send + Sync {
    /// Provider name this driver is registered under
    fn provider(&self) -> &str;

    /// Provision a new load balancer. Returns the provider-side record
    /// including its native identifier.
    async fn create(
        &self,
        connection: &ConnectionConfig,
        spec: &DriverNlbSpec,
    ) -> Result<DriverNlb>;

    /// Fetch an existing load balancer by its provider-native identifier.
    /// `None` means the resource does not exist — a normal outcome on the
    /// register path, not an error.
    async fn describe(
        &self,
        connection: &ConnectionConfig,
        csp_nlb_id: &str,
    ) -> Result<Option<DriverNlb>>;

    /// Tear down a load balancer. Idempotent: deleting an already-absent
    /// resource succeeds.
    async fn delete(&self, connection: &ConnectionConfig, csp_nlb_id: &str) -> Result<()>;
}
