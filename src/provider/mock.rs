//! In-memory mock driver for tests and local development.
//!
//! Selected by `FLOTILLA_USE_MOCK_DRIVER=1` instead of HTTP drivers, and used
//! throughout the test suite to script provider-side failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use super::driver::{ConnectionConfig, DriverNlb, DriverNlbSpec, NlbDriver};
use super::error::{DriverError, Result};

/// Scriptable failure kinds for the mock driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Rejected,
    Unavailable,
    QuotaExceeded,
}

impl MockFailure {
    fn to_error(self) -> DriverError {
        match self {
            MockFailure::Rejected => DriverError::rejected("mock: spec rejected"),
            MockFailure::Unavailable => DriverError::unavailable("mock: provider unavailable"),
            MockFailure::QuotaExceeded => DriverError::quota_exceeded("mock: quota exceeded"),
        }
    }
}

/// Mock provider driver holding its resources in memory.
#[derive(Debug, Default)]
pub struct MockDriver {
    provider: String,
    resources: DashMap<String, DriverNlb>,
    fail_create: Mutex<Option<MockFailure>>,
    fail_delete: DashSet<String>,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockDriver {
    pub fn new(provider: impl Into<String>) -> Self {
        Self { provider: provider.into(), ..Default::default() }
    }

    /// Pre-seed a provider-side resource, e.g. for register-path tests.
    pub fn with_resource(self, csp_nlb_id: impl Into<String>, name: impl Into<String>) -> Self {
        let csp_nlb_id = csp_nlb_id.into();
        self.resources.insert(
            csp_nlb_id.clone(),
            DriverNlb {
                csp_nlb_id,
                name: name.into(),
                description: None,
                tags: HashMap::new(),
            },
        );
        self
    }

    /// Make every subsequent `create` fail with the given kind.
    pub fn fail_create(self, failure: MockFailure) -> Self {
        *self.fail_create.lock().expect("mock lock poisoned") = Some(failure);
        self
    }

    /// Make `delete` fail for the given provider-native identifier.
    pub fn fail_delete_on(self, csp_nlb_id: impl Into<String>) -> Self {
        self.fail_delete.insert(csp_nlb_id.into());
        self
    }

    /// Number of provisioning calls observed.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of teardown calls observed.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Whether the provider-side resource still exists.
    pub fn has_resource(&self, csp_nlb_id: &str) -> bool {
        self.resources.contains_key(csp_nlb_id)
    }
}

#[async_trait::async_trait]
impl NlbDriver for MockDriver {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn create(
        &self,
        _connection: &ConnectionConfig,
        spec: &DriverNlbSpec,
    ) -> Result<DriverNlb> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = *self.fail_create.lock().expect("mock lock poisoned") {
            return Err(failure.to_error());
        }

        let nlb = DriverNlb {
            csp_nlb_id: format!("{}-{}", self.provider, Uuid::new_v4()),
            name: spec.name.clone(),
            description: spec.description.clone(),
            tags: spec.tags.clone(),
        };
        self.resources.insert(nlb.csp_nlb_id.clone(), nlb.clone());
        Ok(nlb)
    }

    async fn describe(
        &self,
        _connection: &ConnectionConfig,
        csp_nlb_id: &str,
    ) -> Result<Option<DriverNlb>> {
        Ok(self.resources.get(csp_nlb_id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, _connection: &ConnectionConfig, csp_nlb_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_delete.contains(csp_nlb_id) {
            return Err(DriverError::unavailable("mock: teardown refused"));
        }

        // Idempotent: removing an absent resource is still a success
        self.resources.remove(csp_nlb_id);
        Ok(())
    }
}
