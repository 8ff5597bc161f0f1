use crate::domain::entities::webhook_event::WebhookEventRecord;
use crate::domain::value_objects::external_event_id::ExternalEventId;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::WebhookEventRow;
use crate::infrastructure::db::stores::webhook_event_store::{
    WebhookEventRepositoryError, WebhookEventStore,
};
use std::sync::Arc;
use time::Duration;

pub struct WebhookEventRepository {
    store: Arc<dyn WebhookEventStore>,
}

impl WebhookEventRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn WebhookEventStore>) -> Self {
        Self { store }
    }

    /// Fetch a record by event id. Returns `None` if it doesn't exist.
    pub async fn get(
        &self,
        event_id: &ExternalEventId,
    ) -> Result<Option<WebhookEventRecord>, WebhookEventRepositoryError> {
        match self.store.get(event_id.as_str()).await? {
            Some(row) => row
                .into_record()
                .map(Some)
                .ok_or(WebhookEventRepositoryError::InvalidInput),
            None => Ok(None),
        }
    }

    /// Store a first-seen record. A record for the same id that is still inside `retention`
    /// makes this fail with `Conflict`.
    pub async fn claim(
        &self,
        record: &WebhookEventRecord,
        retention: Duration,
    ) -> Result<WebhookEventRecord, WebhookEventRepositoryError> {
        let row = WebhookEventRow::from_record(record);
        let expired_before = record.created_at.cutoff(retention).as_inner();
        let stored = self.store.claim(&row, expired_before).await?;
        stored
            .into_record()
            .ok_or(WebhookEventRepositoryError::InvalidInput)
    }

    /// Delete records created before `cutoff`.
    pub async fn delete_created_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, WebhookEventRepositoryError> {
        self.store.delete_created_before(cutoff.as_inner()).await
    }

    pub async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::WebhookEventRepository;
    use crate::domain::entities::webhook_event::{DEFAULT_RETENTION, WebhookEventRecord};
    use crate::domain::value_objects::external_event_id::ExternalEventId;
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::infrastructure::db::dto::WebhookEventRow;
    use crate::infrastructure::db::stores::webhook_event_store::{
        WebhookEventRepositoryError, WebhookEventStore,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use time::{Duration, OffsetDateTime};

    struct DummyStore {
        claimed: Mutex<Option<(WebhookEventRow, OffsetDateTime)>>,
        get_result: Mutex<Option<WebhookEventRow>>,
        claim_error: Option<WebhookEventRepositoryError>,
    }

    impl DummyStore {
        fn new() -> Self {
            Self {
                claimed: Mutex::new(None),
                get_result: Mutex::new(None),
                claim_error: None,
            }
        }
    }

    #[async_trait]
    impl WebhookEventStore for DummyStore {
        async fn get(
            &self,
            _event_id: &str,
        ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError> {
            Ok(self.get_result.lock().unwrap().clone())
        }

        async fn claim(
            &self,
            row: &WebhookEventRow,
            expired_before: OffsetDateTime,
        ) -> Result<WebhookEventRow, WebhookEventRepositoryError> {
            if let Some(err) = self.claim_error {
                return Err(err);
            }
            *self.claimed.lock().unwrap() = Some((row.clone(), expired_before));
            Ok(row.clone())
        }

        async fn delete_created_before(
            &self,
            _cutoff: OffsetDateTime,
        ) -> Result<u64, WebhookEventRepositoryError> {
            Ok(3)
        }

        async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
            Ok(())
        }
    }

    fn sample_record(now: Timestamp) -> WebhookEventRecord {
        WebhookEventRecord::new(
            ExternalEventId::parse("evt_123").unwrap(),
            now,
            Some("invoice.paid".to_string()),
            None,
        )
    }

    #[tokio::test]
    async fn given_record_when_claim_should_pass_retention_cutoff_to_store() {
        let store = Arc::new(DummyStore::new());
        let repo = WebhookEventRepository::new(store.clone());
        let now = Timestamp::from(OffsetDateTime::UNIX_EPOCH + Duration::days(50));

        let stored = repo.claim(&sample_record(now), DEFAULT_RETENTION).await.unwrap();

        assert_eq!(stored.event_id.as_str(), "evt_123");
        let (row, expired_before) = store.claimed.lock().unwrap().clone().unwrap();
        assert_eq!(row.created_at, now.as_inner());
        assert_eq!(expired_before, now.as_inner() - Duration::days(7));
    }

    #[tokio::test]
    async fn given_store_conflict_when_claim_should_return_conflict() {
        let mut store = DummyStore::new();
        store.claim_error = Some(WebhookEventRepositoryError::Conflict);
        let repo = WebhookEventRepository::new(Arc::new(store));

        let result = repo
            .claim(&sample_record(Timestamp::now_utc()), DEFAULT_RETENTION)
            .await;

        assert_eq!(result, Err(WebhookEventRepositoryError::Conflict));
    }

    #[tokio::test]
    async fn given_corrupt_row_when_get_should_return_invalid_input() {
        let store = Arc::new(DummyStore::new());
        *store.get_result.lock().unwrap() = Some(WebhookEventRow {
            event_id: " evt".to_string(),
            event_type: None,
            payload_digest: None,
            created_at: OffsetDateTime::now_utc(),
        });
        let repo = WebhookEventRepository::new(store);

        let result = repo.get(&ExternalEventId::parse("evt").unwrap()).await;

        assert_eq!(result, Err(WebhookEventRepositoryError::InvalidInput));
    }

    #[tokio::test]
    async fn given_cutoff_when_delete_created_before_should_return_store_count() {
        let repo = WebhookEventRepository::new(Arc::new(DummyStore::new()));

        let deleted = repo
            .delete_created_before(Timestamp::now_utc())
            .await
            .unwrap();

        assert_eq!(deleted, 3);
    }
}
