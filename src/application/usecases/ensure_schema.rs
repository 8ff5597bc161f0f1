// Use case: ensure_schema.

use crate::infrastructure::db::database::Database;
use std::sync::Arc;
use tracing::info;

/// Statements are idempotent; running them against an up-to-date database changes nothing.
const SCHEMA_STATEMENTS: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS webhook_events (
        event_id TEXT NOT NULL,
        event_type TEXT NULL,
        payload_digest TEXT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS webhook_events_event_id_key
        ON webhook_events (event_id)",
    "CREATE INDEX IF NOT EXISTS webhook_events_created_at_idx
        ON webhook_events (created_at)",
];

/// Creates the webhook event table with its uniqueness guard and expiry index.
pub struct EnsureSchemaUseCase {
    pub db: Arc<dyn Database>,
}

#[derive(Debug)]
pub enum EnsureSchemaError {
    Storage(String),
}

impl EnsureSchemaUseCase {
    /// Apply every schema statement in order. Stops at the first failure.
    pub async fn execute(&self) -> Result<(), EnsureSchemaError> {
        for statement in SCHEMA_STATEMENTS {
            self.db
                .execute(statement)
                .await
                .map_err(|e| EnsureSchemaError::Storage(format!("{e:?}")))?;
        }
        info!(statements = SCHEMA_STATEMENTS.len(), "webhook_event_schema_ready");
        Ok(())
    }
}
