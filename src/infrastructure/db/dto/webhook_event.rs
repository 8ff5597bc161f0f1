use crate::domain::entities::webhook_event::WebhookEventRecord;
use crate::domain::value_objects::external_event_id::ExternalEventId;
use crate::domain::value_objects::timestamps::Timestamp;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct WebhookEventRow {
    pub event_id: String,
    pub event_type: Option<String>,
    pub payload_digest: Option<String>,
    pub created_at: OffsetDateTime,
}

impl WebhookEventRow {
    pub fn from_record(record: &WebhookEventRecord) -> Self {
        Self {
            event_id: record.event_id.as_str().to_string(),
            event_type: record.event_type.clone(),
            payload_digest: record.payload_digest.clone(),
            created_at: record.created_at.as_inner(),
        }
    }

    /// Convert back to the domain record. Returns `None` if the stored id no longer validates.
    pub fn into_record(self) -> Option<WebhookEventRecord> {
        let event_id = ExternalEventId::parse(&self.event_id).ok()?;
        Some(WebhookEventRecord {
            event_id,
            created_at: Timestamp::from(self.created_at),
            event_type: self.event_type,
            payload_digest: self.payload_digest,
        })
    }
}
