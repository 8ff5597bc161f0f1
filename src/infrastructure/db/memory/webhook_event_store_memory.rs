use crate::infrastructure::db::dto::WebhookEventRow;
use crate::infrastructure::db::stores::webhook_event_store::{
    WebhookEventRepositoryError, WebhookEventStore,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

/// Process-local webhook event store. The map lock makes check-and-insert a single step.
#[derive(Default)]
pub struct WebhookEventStoreMemory {
    rows: Mutex<HashMap<String, WebhookEventRow>>,
}

impl WebhookEventStoreMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, WebhookEventRow>>, WebhookEventRepositoryError>
    {
        self.rows
            .lock()
            .map_err(|_| WebhookEventRepositoryError::StorageUnavailable)
    }
}

#[async_trait]
impl WebhookEventStore for WebhookEventStoreMemory {
    async fn get(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError> {
        Ok(self.rows()?.get(event_id).cloned())
    }

    async fn claim(
        &self,
        row: &WebhookEventRow,
        expired_before: OffsetDateTime,
    ) -> Result<WebhookEventRow, WebhookEventRepositoryError> {
        let mut rows = self.rows()?;
        match rows.entry(row.event_id.clone()) {
            Entry::Occupied(mut existing) => {
                if existing.get().created_at >= expired_before {
                    return Err(WebhookEventRepositoryError::Conflict);
                }
                existing.insert(row.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete_created_before(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<u64, WebhookEventRepositoryError> {
        let mut rows = self.rows()?;
        let before = rows.len();
        rows.retain(|_, row| row.created_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
        self.rows().map(|_| ())
    }
}
