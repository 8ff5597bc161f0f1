use crate::domain::value_objects::external_event_id::ExternalEventId;
use crate::domain::value_objects::timestamps::Timestamp;
use time::Duration;

pub const MAX_EVENT_TYPE_LEN: usize = 255;
const DIGEST_HEX_LEN: usize = 64;

/// Default retention window for claimed events (7 days).
pub const DEFAULT_RETENTION: Duration = Duration::seconds(604_800);

/// A processed-event marker. Exists only to make a second claim of the same id fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEventRecord {
    pub event_id: ExternalEventId,
    pub created_at: Timestamp,
    pub event_type: Option<String>,
    pub payload_digest: Option<String>,
}

impl WebhookEventRecord {
    /// Build a record for a first-seen event. Metadata is informational and never
    /// blocks a claim: unusable values are dropped or shortened.
    pub fn new(
        event_id: ExternalEventId,
        created_at: Timestamp,
        event_type: Option<String>,
        payload_digest: Option<String>,
    ) -> Self {
        Self {
            event_id,
            created_at,
            event_type: event_type.and_then(normalize_event_type),
            payload_digest: payload_digest.filter(|d| is_payload_digest(d)),
        }
    }

    /// Instant at which the record stops guarding its event id.
    pub fn expires_at(&self, retention: Duration) -> Timestamp {
        self.created_at.plus(retention)
    }
}

/// Blank types become `None`; long ones are cut at a char boundary.
fn normalize_event_type(event_type: String) -> Option<String> {
    let trimmed = event_type.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut end = trimmed.len().min(MAX_EVENT_TYPE_LEN);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    Some(trimmed[..end].to_string())
}

/// Digests are lowercase hex SHA-256.
pub fn is_payload_digest(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn id(raw: &str) -> ExternalEventId {
        ExternalEventId::parse(raw).unwrap()
    }

    fn t0() -> Timestamp {
        Timestamp::from(OffsetDateTime::UNIX_EPOCH + Duration::days(100))
    }

    #[test]
    fn given_bare_event_when_created_should_hold_values() {
        let record = WebhookEventRecord::new(id("evt_123"), t0(), None, None);

        assert_eq!(record.event_id.as_str(), "evt_123");
        assert_eq!(record.created_at, t0());
        assert!(record.event_type.is_none());
    }

    #[test]
    fn given_blank_event_type_when_created_should_drop_it() {
        let record = WebhookEventRecord::new(id("evt_a"), t0(), Some("  ".to_string()), None);
        assert!(record.event_type.is_none());
    }

    #[test]
    fn given_oversized_event_type_when_created_should_truncate_on_char_boundary() {
        let long = format!("a{}", "é".repeat(200));
        let record = WebhookEventRecord::new(id("evt_a"), t0(), Some(long), None);

        let stored = record.event_type.unwrap();
        assert!(stored.len() <= MAX_EVENT_TYPE_LEN);
        assert!(stored.starts_with("aé"));
    }

    #[test]
    fn given_uppercase_digest_when_created_should_drop_it() {
        let record = WebhookEventRecord::new(id("evt_123"), t0(), None, Some("A".repeat(64)));
        assert!(record.payload_digest.is_none());
    }

    #[test]
    fn given_hex_digest_when_created_should_keep_it() {
        let digest = "0f".repeat(32);
        let record = WebhookEventRecord::new(
            id("evt_123"),
            t0(),
            Some("invoice.paid".into()),
            Some(digest.clone()),
        );
        assert_eq!(record.event_type.as_deref(), Some("invoice.paid"));
        assert_eq!(record.payload_digest, Some(digest));
    }

    #[test]
    fn given_record_when_expiry_computed_should_add_retention() {
        let record = WebhookEventRecord::new(id("evt_old"), t0(), None, None);

        assert_eq!(record.expires_at(DEFAULT_RETENTION), t0().plus(Duration::days(7)));
    }
}
