use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::WebhookEventRow;
use async_trait::async_trait;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventRepositoryError {
    /// A live record already holds this event id.
    Conflict,
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for WebhookEventRepositoryError {
    fn from(_: DatabaseError) -> Self {
        WebhookEventRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait WebhookEventStore: Send + Sync {
    /// Fetch a record by event id. Returns `None` if it doesn't exist.
    async fn get(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError>;
    /// Atomically insert a record unless a record created at or after `expired_before` holds
    /// the same event id. An older record is replaced in the same step.
    /// Returns `Conflict` when a live record exists.
    async fn claim(
        &self,
        row: &WebhookEventRow,
        expired_before: OffsetDateTime,
    ) -> Result<WebhookEventRow, WebhookEventRepositoryError>;
    /// Delete every record created before `cutoff` and return how many were removed.
    async fn delete_created_before(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<u64, WebhookEventRepositoryError>;
    /// Round trip to the backing store.
    async fn ping(&self) -> Result<(), WebhookEventRepositoryError>;
}

/// A webhook event store that refuses every call, used when persistence is not configured.
pub struct DisabledWebhookEventStore;

#[async_trait]
impl WebhookEventStore for DisabledWebhookEventStore {
    async fn get(
        &self,
        _event_id: &str,
    ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError> {
        Err(WebhookEventRepositoryError::StorageUnavailable)
    }

    async fn claim(
        &self,
        _row: &WebhookEventRow,
        _expired_before: OffsetDateTime,
    ) -> Result<WebhookEventRow, WebhookEventRepositoryError> {
        Err(WebhookEventRepositoryError::StorageUnavailable)
    }

    async fn delete_created_before(
        &self,
        _cutoff: OffsetDateTime,
    ) -> Result<u64, WebhookEventRepositoryError> {
        Err(WebhookEventRepositoryError::StorageUnavailable)
    }

    async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
        Err(WebhookEventRepositoryError::StorageUnavailable)
    }
}
