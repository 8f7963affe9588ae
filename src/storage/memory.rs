//! In-memory resource store for tests and ephemeral deployments.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::NlbRecord;
use crate::errors::Result;
use crate::storage::NlbStore;

/// Resource store keeping records in a concurrent map keyed by
/// `(namespace, id)`. Satisfies the same contract as the SQLite store, minus
/// durability.
#[derive(Debug, Default)]
pub struct MemoryNlbStore {
    records: DashMap<(String, String), NlbRecord>,
}

impl MemoryNlbStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all namespaces.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NlbStore for MemoryNlbStore {
    async fn put(&self, record: &NlbRecord) -> Result<()> {
        self.records
            .insert((record.namespace.clone(), record.id.clone()), record.clone());
        Ok(())
    }

    async fn get(&self, namespace: &str, id: &str) -> Result<Option<NlbRecord>> {
        Ok(self
            .records
            .get(&(namespace.to_string(), id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn list_all(&self, namespace: &str) -> Result<Vec<NlbRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn delete(&self, namespace: &str, id: &str) -> Result<()> {
        self.records.remove(&(namespace.to_string(), id.to_string()));
        Ok(())
    }

    async fn exists(&self, namespace: &str, id: &str) -> Result<bool> {
        Ok(self.records.contains_key(&(namespace.to_string(), id.to_string())))
    }
}
