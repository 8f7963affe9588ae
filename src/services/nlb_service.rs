//! NLB lifecycle controller
//!
//! Orchestrates create/register, get, list, delete and bulk delete over the
//! resource store and the provider driver gateway. The controller is the
//! sole writer of the store; mutating operations on the same
//! `(namespace, id)` are serialized through per-key locks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use futures::StreamExt;
use metrics::counter;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::{
    BulkDeleteFailure, BulkDeleteOutcome, CreateNlbRequest, CreateOption, NlbRecord, NlbStatus,
};
use crate::errors::{Error, Result};
use crate::provider::{ConnectionConfig, DriverNlbSpec, DriverRegistry, NlbDriver};
use crate::services::filter;
use crate::storage::NlbStore;

const RESOURCE_TYPE: &str = "NLB";

/// How a single deletion ended, for bulk-outcome accounting.
enum DeleteDisposition {
    /// Provider teardown succeeded (or was not needed); record removed
    Removed,
    /// Provider teardown failed but `force` removed the record anyway;
    /// the provider-side resource may be orphaned
    ForceRemoved(Error),
}

/// Service owning the NLB lifecycle.
pub struct NlbService {
    store: Arc<dyn NlbStore>,
    registry: Arc<DriverRegistry>,
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
    provider_timeout: Duration,
    delete_concurrency: usize,
}

impl NlbService {
    /// Create a new lifecycle service over the given store and driver
    /// registry.
    pub fn new(store: Arc<dyn NlbStore>, registry: Arc<DriverRegistry>) -> Self {
        Self {
            store,
            registry,
            locks: DashMap::new(),
            provider_timeout: Duration::from_secs(30),
            delete_concurrency: 8,
        }
    }

    /// Deadline applied to each provider call.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Worker pool bound for bulk deletions.
    pub fn with_delete_concurrency(mut self, concurrency: usize) -> Self {
        self.delete_concurrency = concurrency.max(1);
        self
    }

    fn key_lock(&self, namespace: &str, id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((namespace.to_string(), id.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn call_with_deadline<T>(
        &self,
        operation: &str,
        fut: impl std::future::Future<Output = crate::provider::DriverResult<T>>,
        connection: &str,
    ) -> Result<T> {
        match tokio::time::timeout(self.provider_timeout, fut).await {
            Ok(result) => result.map_err(|e| e.into_error(connection)),
            Err(_) => Err(Error::timeout(operation, self.provider_timeout.as_millis() as u64)),
        }
    }

    /// Create a new NLB or register an existing provider-side one.
    ///
    /// The provision path commits a `Creating` record before calling the
    /// driver, then transitions it to `Active` or `Failed`. The register
    /// path never provisions: it describes the existing resource and commits
    /// an `Active` record directly.
    #[instrument(skip(self, request), fields(namespace = %namespace, nlb_id = %request.name, option = ?option), name = "nlb_create")]
    pub async fn create(
        &self,
        namespace: &str,
        request: CreateNlbRequest,
        option: CreateOption,
    ) -> Result<NlbRecord> {
        if namespace.is_empty() {
            return Err(Error::validation_field("namespace must not be empty", "namespace"));
        }
        request.validate_for(option)?;

        let lock = self.key_lock(namespace, &request.name);
        let _guard = lock.lock().await;

        if self.store.exists(namespace, &request.name).await? {
            return Err(Error::duplicate(RESOURCE_TYPE, &request.name));
        }

        let (driver, connection) = self.registry.resolve(&request.connection_name)?;

        match option {
            CreateOption::Register => {
                self.register(namespace, request, driver, connection).await
            }
            CreateOption::Provision => {
                self.provision(namespace, request, driver, connection).await
            }
        }
    }

    /// Adopt an existing provider-side load balancer as an internal record.
    async fn register(
        &self,
        namespace: &str,
        request: CreateNlbRequest,
        driver: Arc<dyn NlbDriver>,
        connection: ConnectionConfig,
    ) -> Result<NlbRecord> {
        let csp_nlb_id = request
            .csp_nlb_id
            .clone()
            .ok_or_else(|| Error::validation_field("cspNLBId is required", "cspNLBId"))?;

        let existing = self
            .call_with_deadline(
                "describe NLB",
                driver.describe(&connection, &csp_nlb_id),
                &connection.name,
            )
            .await?
            .ok_or_else(|| Error::registration_not_found(&connection.name, &csp_nlb_id))?;

        // Provider tags seed the metadata; caller-supplied keys win
        let mut metadata = existing.tags;
        metadata.extend(request.metadata);

        let record = NlbRecord {
            namespace: namespace.to_string(),
            id: request.name.clone(),
            connection_name: request.connection_name,
            csp_nlb_id: Some(csp_nlb_id),
            name: request.name,
            description: request.description.or(existing.description),
            metadata,
            status: NlbStatus::Active,
            created_at: Utc::now(),
        };
        self.store.put(&record).await?;

        counter!("nlb_registered_total", &[("namespace", namespace.to_string())]).increment(1);
        info!(csp_nlb_id = ?record.csp_nlb_id, "Registered existing NLB");

        Ok(record)
    }

    /// Provision a fresh load balancer through the provider driver.
    async fn provision(
        &self,
        namespace: &str,
        request: CreateNlbRequest,
        driver: Arc<dyn NlbDriver>,
        connection: ConnectionConfig,
    ) -> Result<NlbRecord> {
        let mut record = NlbRecord {
            namespace: namespace.to_string(),
            id: request.name.clone(),
            connection_name: request.connection_name.clone(),
            csp_nlb_id: None,
            name: request.name.clone(),
            description: request.description.clone(),
            metadata: request.metadata.clone(),
            status: NlbStatus::Creating,
            created_at: Utc::now(),
        };
        self.store.put(&record).await?;

        let spec = DriverNlbSpec {
            name: request.name.clone(),
            description: request.description,
            tags: request.metadata,
        };

        let provisioned = match tokio::time::timeout(
            self.provider_timeout,
            driver.create(&connection, &spec),
        )
        .await
        {
            // Deadline hit: the record stays Creating for reconciliation
            Err(_) => {
                warn!("Provisioning call timed out; record left at Creating");
                return Err(Error::timeout(
                    "create NLB",
                    self.provider_timeout.as_millis() as u64,
                ));
            }
            Ok(Err(driver_err)) => {
                if driver_err.may_have_allocated() {
                    record.status = NlbStatus::Failed;
                    self.store.put(&record).await?;
                    warn!(error = %driver_err, "Provisioning failed; record retained as Failed");
                } else {
                    // Clean rejection: nothing was allocated, drop the record
                    self.store.delete(namespace, &record.id).await?;
                    warn!(error = %driver_err, "Provisioning rejected; record removed");
                }
                return Err(driver_err.into_error(&connection.name));
            }
            Ok(Ok(provisioned)) => provisioned,
        };

        record.csp_nlb_id = Some(provisioned.csp_nlb_id);
        record.status = NlbStatus::Active;
        self.store.put(&record).await?;

        counter!("nlb_created_total", &[("namespace", namespace.to_string())]).increment(1);
        info!(csp_nlb_id = ?record.csp_nlb_id, "NLB provisioned");

        Ok(record)
    }

    /// Probe the storage backend with a cheap read.
    pub async fn ping_store(&self) -> Result<()> {
        self.store.exists("health", "probe").await.map(|_| ())
    }

    /// Provider names currently registered in the driver gateway.
    pub fn registered_providers(&self) -> Vec<String> {
        self.registry.registered_providers()
    }

    /// Fetch one NLB record.
    #[instrument(skip(self), fields(namespace = %namespace, nlb_id = %id), name = "nlb_get")]
    pub async fn get(&self, namespace: &str, id: &str) -> Result<NlbRecord> {
        self.store
            .get(namespace, id)
            .await?
            .ok_or_else(|| Error::not_found(RESOURCE_TYPE, id))
    }

    /// List records in a namespace, filtered by an optional field match.
    #[instrument(skip(self), fields(namespace = %namespace, filter_key = %filter_key), name = "nlb_list")]
    pub async fn list(
        &self,
        namespace: &str,
        filter_key: &str,
        filter_val: &str,
    ) -> Result<Vec<NlbRecord>> {
        let records = self.store.list_all(namespace).await?;
        Ok(records
            .into_iter()
            .filter(|record| filter::matches(record, filter_key, filter_val))
            .collect())
    }

    /// List only the identifiers in a namespace; no filtering applies.
    #[instrument(skip(self), fields(namespace = %namespace), name = "nlb_list_ids")]
    pub async fn list_ids(&self, namespace: &str) -> Result<Vec<String>> {
        let mut ids: Vec<String> =
            self.store.list_all(namespace).await?.into_iter().map(|r| r.id).collect();
        ids.sort();
        Ok(ids)
    }

    /// Delete one NLB.
    ///
    /// Without `force`, a failed provider teardown rejects the delete and
    /// the record keeps its previous status. With `force`, the record is
    /// removed regardless — the provider-side resource may be orphaned,
    /// which is the caller's accepted risk.
    #[instrument(skip(self), fields(namespace = %namespace, nlb_id = %id, force = force), name = "nlb_delete")]
    pub async fn delete(&self, namespace: &str, id: &str, force: bool) -> Result<()> {
        self.delete_inner(namespace, id, force).await.map(|_| ())
    }

    async fn delete_inner(
        &self,
        namespace: &str,
        id: &str,
        force: bool,
    ) -> Result<DeleteDisposition> {
        let lock = self.key_lock(namespace, id);
        let _guard = lock.lock().await;

        let record = self
            .store
            .get(namespace, id)
            .await?
            .ok_or_else(|| Error::not_found(RESOURCE_TYPE, id))?;

        let teardown = match record.csp_nlb_id.as_deref() {
            // Never allocated provider-side; nothing to tear down
            None => Ok(()),
            Some(csp_nlb_id) => {
                // Commit Deleting first so a timed-out call leaves a
                // reconcilable state behind
                let mut deleting = record.clone();
                deleting.status = NlbStatus::Deleting;
                self.store.put(&deleting).await?;

                match self.registry.resolve(&record.connection_name) {
                    Ok((driver, connection)) => {
                        self.call_with_deadline(
                            "delete NLB",
                            driver.delete(&connection, csp_nlb_id),
                            &connection.name,
                        )
                        .await
                        .map_err(|e| match e {
                            Error::Timeout { .. } => e,
                            other => Error::teardown_failed(id, other.to_string()),
                        })
                    }
                    Err(e) => Err(Error::teardown_failed(id, e.to_string())),
                }
            }
        };

        match teardown {
            Ok(()) => {
                self.store.delete(namespace, id).await?;
                counter!("nlb_deleted_total", &[("namespace", namespace.to_string())])
                    .increment(1);
                info!("NLB deleted");
                Ok(DeleteDisposition::Removed)
            }
            Err(err) if force => {
                self.store.delete(namespace, id).await?;
                counter!("nlb_force_deleted_total", &[("namespace", namespace.to_string())])
                    .increment(1);
                warn!(error = %err, "Force-removed NLB record; provider-side resource may be orphaned");
                Ok(DeleteDisposition::ForceRemoved(err))
            }
            Err(err @ Error::Timeout { .. }) => {
                // Record stays Deleting for later reconciliation
                warn!(error = %err, "Teardown timed out; record left at Deleting");
                Err(err)
            }
            Err(err) => {
                // Reject the delete and restore the pre-delete status
                self.store.put(&record).await?;
                warn!(error = %err, "Teardown failed; record retained");
                Err(err)
            }
        }
    }

    /// Delete every NLB in the namespace whose identifier contains
    /// `match_substring` (empty selects all).
    ///
    /// Per-resource deletions run on a bounded worker pool and fail
    /// independently; the outcome aggregates them. Only a failed enumeration
    /// fails the operation as a whole.
    #[instrument(skip(self), fields(namespace = %namespace, matching = %match_substring, force = force), name = "nlb_delete_all")]
    pub async fn delete_all(
        &self,
        namespace: &str,
        match_substring: &str,
        force: bool,
    ) -> Result<BulkDeleteOutcome> {
        let ids: Vec<String> = self
            .store
            .list_all(namespace)
            .await?
            .into_iter()
            .map(|record| record.id)
            .filter(|id| id.contains(match_substring))
            .collect();

        let results: Vec<(String, Result<DeleteDisposition>)> =
            futures::stream::iter(ids.into_iter().map(|id| async move {
                let result = self.delete_inner(namespace, &id, force).await;
                (id, result)
            }))
            .buffer_unordered(self.delete_concurrency)
            .collect()
            .await;

        let mut outcome = BulkDeleteOutcome::default();
        for (id, result) in results {
            match result {
                Ok(DeleteDisposition::Removed) => outcome.deleted.push(id),
                Ok(DeleteDisposition::ForceRemoved(err)) => {
                    warn!(nlb_id = %id, error = %err, "Removed despite provider failure");
                    outcome.orphaned.push(id);
                }
                Err(err) => outcome.failed.push(BulkDeleteFailure {
                    id,
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                }),
            }
        }

        info!(
            deleted = outcome.deleted.len(),
            orphaned = outcome.orphaned.len(),
            failed = outcome.failed.len(),
            "Bulk delete completed"
        );

        Ok(outcome)
    }
}
