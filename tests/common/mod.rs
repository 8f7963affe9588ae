//! Shared builders for integration tests: an in-memory store wired to a
//! scriptable mock driver behind the real registry.

use std::collections::HashMap;
use std::sync::Arc;

use flotilla::domain::CreateNlbRequest;
use flotilla::provider::{ConnectionConfig, DriverRegistry, MockDriver};
use flotilla::services::NlbService;
use flotilla::storage::MemoryNlbStore;

pub const NAMESPACE: &str = "ns01";
pub const CONNECTION: &str = "mock-local";

/// Build a service over an in-memory store and the given mock driver,
/// returning handles to both for assertions.
pub fn harness(driver: MockDriver) -> (Arc<MemoryNlbStore>, Arc<MockDriver>, NlbService) {
    let store = Arc::new(MemoryNlbStore::new());
    let driver = Arc::new(driver);

    let mut registry = DriverRegistry::new();
    registry.register(driver.clone());
    registry.add_connection(ConnectionConfig::new(CONNECTION, "mock"));

    let service = NlbService::new(store.clone(), Arc::new(registry));
    (store, driver, service)
}

pub fn create_request(name: &str) -> CreateNlbRequest {
    CreateNlbRequest {
        name: name.to_string(),
        connection_name: CONNECTION.to_string(),
        csp_nlb_id: None,
        description: None,
        metadata: HashMap::new(),
    }
}

pub fn register_request(name: &str, csp_nlb_id: &str) -> CreateNlbRequest {
    CreateNlbRequest {
        name: name.to_string(),
        connection_name: CONNECTION.to_string(),
        csp_nlb_id: Some(csp_nlb_id.to_string()),
        description: None,
        metadata: HashMap::new(),
    }
}
