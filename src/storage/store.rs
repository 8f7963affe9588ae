//! Resource store contract.

use async_trait::async_trait;

use crate::domain::NlbRecord;
use crate::errors::Result;

/// Namespace-scoped durable map from resource identifier to NLB record.
///
/// Operations on distinct `(namespace, id)` pairs are independent. `put`
/// overwrites atomically — readers never observe a partially-written record.
/// An absent key is a normal outcome: `get` returns `None` and `delete` is a
/// no-op success. The only error surfaced here is `StorageUnavailable`, when
/// the durable medium cannot be reached; interpreting anything else is the
/// caller's responsibility.
///
/// The lifecycle controller is the sole writer.
#[async_trait]
pub trait NlbStore: Send + Sync {
    /// Insert or atomically overwrite a record.
    async fn put(&self, record: &NlbRecord) -> Result<()>;

    /// Fetch one record; `None` when no record exists for the key.
    async fn get(&self, namespace: &str, id: &str) -> Result<Option<NlbRecord>>;

    /// All records in a namespace, in no particular order.
    async fn list_all(&self, namespace: &str) -> Result<Vec<NlbRecord>>;

    /// Remove a record. Deleting a non-existent key is a no-op success.
    async fn delete(&self, namespace: &str, id: &str) -> Result<()>;

    /// Whether a record exists for the key.
    async fn exists(&self, namespace: &str, id: &str) -> Result<bool>;
}
