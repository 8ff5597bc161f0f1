use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IngestWebhookResponse {
    pub event_id: String,
    /// `processed` on first delivery, `duplicate` on redelivery.
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WebhookEventResponse {
    pub event_id: String,
    pub event_type: Option<String>,
    pub payload_digest: Option<String>,
    pub created_at: String,
    pub expires_at: String,
}
