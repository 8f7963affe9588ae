//! SQLite-backed resource store.
//!
//! Records live in a single `nlbs` table keyed by `(namespace, id)`, with
//! the metadata map serialized as a JSON text column. All queries are
//! runtime-bound; failures map onto `StorageUnavailable` with context.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::instrument;

use crate::domain::{NlbRecord, NlbStatus};
use crate::errors::{Error, Result};
use crate::storage::{DbPool, NlbStore};

/// Internal database row structure for NLB records.
#[derive(Debug, Clone, FromRow)]
struct NlbRow {
    pub namespace: String,
    pub id: String,
    pub connection_name: String,
    pub csp_nlb_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub metadata: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<NlbRow> for NlbRecord {
    type Error = Error;

    fn try_from(row: NlbRow) -> Result<Self> {
        let metadata: HashMap<String, String> =
            serde_json::from_str(&row.metadata).map_err(|e| Error::Serialization {
                source: e,
                context: format!("corrupt metadata column for NLB '{}'", row.id),
            })?;

        Ok(Self {
            namespace: row.namespace,
            id: row.id,
            connection_name: row.connection_name,
            csp_nlb_id: row.csp_nlb_id,
            name: row.name,
            description: row.description,
            metadata,
            status: NlbStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "namespace, id, connection_name, csp_nlb_id, name, description, \
                              metadata, status, created_at";

/// Resource store persisting NLB records in SQLite.
#[derive(Debug, Clone)]
pub struct SqlNlbStore {
    pool: DbPool,
}

impl SqlNlbStore {
    /// Creates a store backed by the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Returns the database pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl NlbStore for SqlNlbStore {
    #[instrument(skip(self, record), fields(namespace = %record.namespace, nlb_id = %record.id, status = %record.status), name = "db_put_nlb")]
    async fn put(&self, record: &NlbRecord) -> Result<()> {
        let metadata = serde_json::to_string(&record.metadata)?;

        // INSERT OR REPLACE keeps the overwrite atomic within one statement
        sqlx::query(
            "INSERT OR REPLACE INTO nlbs \
             (namespace, id, connection_name, csp_nlb_id, name, description, metadata, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&record.namespace)
        .bind(&record.id)
        .bind(&record.connection_name)
        .bind(&record.csp_nlb_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&metadata)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, nlb_id = %record.id, "Failed to write NLB record");
            Error::StorageUnavailable {
                context: format!("failed to write NLB '{}'", record.id),
                source: Some(e),
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(namespace = %namespace, nlb_id = %id), name = "db_get_nlb")]
    async fn get(&self, namespace: &str, id: &str) -> Result<Option<NlbRecord>> {
        let sql =
            format!("SELECT {} FROM nlbs WHERE namespace = $1 AND id = $2", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, NlbRow>(&sql)
            .bind(namespace)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, nlb_id = %id, "Failed to read NLB record");
                Error::StorageUnavailable {
                    context: format!("failed to read NLB '{}'", id),
                    source: Some(e),
                }
            })?;

        row.map(NlbRecord::try_from).transpose()
    }

    #[instrument(skip(self), fields(namespace = %namespace), name = "db_list_nlbs")]
    async fn list_all(&self, namespace: &str) -> Result<Vec<NlbRecord>> {
        let sql = format!(
            "SELECT {} FROM nlbs WHERE namespace = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, NlbRow>(&sql)
            .bind(namespace)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, namespace = %namespace, "Failed to list NLB records");
                Error::StorageUnavailable {
                    context: format!("failed to list NLBs in namespace '{}'", namespace),
                    source: Some(e),
                }
            })?;

        rows.into_iter().map(NlbRecord::try_from).collect()
    }

    #[instrument(skip(self), fields(namespace = %namespace, nlb_id = %id), name = "db_delete_nlb")]
    async fn delete(&self, namespace: &str, id: &str) -> Result<()> {
        // Zero rows affected is fine: delete on an absent key is a no-op
        sqlx::query("DELETE FROM nlbs WHERE namespace = $1 AND id = $2")
            .bind(namespace)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, nlb_id = %id, "Failed to delete NLB record");
                Error::StorageUnavailable {
                    context: format!("failed to delete NLB '{}'", id),
                    source: Some(e),
                }
            })?;

        Ok(())
    }

    #[instrument(skip(self), fields(namespace = %namespace, nlb_id = %id), name = "db_exists_nlb")]
    async fn exists(&self, namespace: &str, id: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM nlbs WHERE namespace = $1 AND id = $2",
        )
        .bind(namespace)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, nlb_id = %id, "Failed to check NLB existence");
            Error::StorageUnavailable {
                context: format!("failed to check existence of NLB '{}'", id),
                source: Some(e),
            }
        })?;

        Ok(count > 0)
    }
}
