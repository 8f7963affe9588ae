//! # Database Migration Management
//!
//! The schema is embedded in the binary and applied on startup when
//! `auto_migrate` is enabled. Statements are idempotent so re-running them
//! against an already-migrated database is safe.

use tracing::info;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

const MIGRATION_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS nlbs (
        namespace TEXT NOT NULL,
        id TEXT NOT NULL,
        connection_name TEXT NOT NULL,
        csp_nlb_id TEXT,
        name TEXT NOT NULL,
        description TEXT,
        metadata TEXT NOT NULL DEFAULT '{}',
        status TEXT NOT NULL CHECK (status IN ('Creating', 'Active', 'Failed', 'Deleting')),
        created_at TIMESTAMP NOT NULL,
        PRIMARY KEY (namespace, id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_nlbs_namespace ON nlbs (namespace)",
];

/// Apply the embedded schema to the given pool.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    for statement in MIGRATION_STATEMENTS {
        sqlx::query(statement).execute(pool).await.map_err(|e| Error::StorageUnavailable {
            context: "failed to apply schema migration".to_string(),
            source: Some(e),
        })?;
    }

    info!(statements = MIGRATION_STATEMENTS.len(), "Database migrations applied");
    Ok(())
}
