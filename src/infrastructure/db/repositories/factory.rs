use std::sync::Arc;

use crate::infrastructure::db::memory::webhook_event_store_memory::WebhookEventStoreMemory;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::webhook_event_store_postgres::WebhookEventStorePostgres;
use crate::infrastructure::db::repositories::webhook_event_repository::WebhookEventRepository;
use crate::infrastructure::db::stores::webhook_event_store::WebhookEventRepositoryError;

#[derive(Clone)]
pub struct Repositories {
    /// Present only for the Postgres backend.
    pub db: Option<Arc<PostgresDatabase>>,
    pub webhook_event: Arc<WebhookEventRepository>,
}

impl Repositories {
    /// Build all repositories backed by Postgres stores.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        let webhook_event_store = Arc::new(WebhookEventStorePostgres::new(db.clone()));

        Self {
            db: Some(db),
            webhook_event: Arc::new(WebhookEventRepository::new(webhook_event_store)),
        }
    }

    /// Build all repositories backed by process-local stores.
    pub fn memory() -> Self {
        Self {
            db: None,
            webhook_event: Arc::new(WebhookEventRepository::new(Arc::new(
                WebhookEventStoreMemory::new(),
            ))),
        }
    }

    /// Check that the webhook event store answers.
    pub async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
        self.webhook_event.ping().await
    }
}
