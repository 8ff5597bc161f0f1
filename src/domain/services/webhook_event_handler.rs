use crate::domain::value_objects::external_event_id::ExternalEventId;
use async_trait::async_trait;
use tracing::info;

/// A provider event that has been claimed and is ready for side-effecting work.
#[derive(Debug, Clone)]
pub struct InboundWebhookEvent {
    pub event_id: ExternalEventId,
    pub event_type: Option<String>,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventHandlerError {
    Unavailable(String),
}

/// Downstream processing for claimed events. Invoked at most once per event id.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    async fn handle(&self, event: &InboundWebhookEvent) -> Result<(), WebhookEventHandlerError>;
}

/// Handler used when no billing integration is wired in: records the event in the log.
pub struct LoggingWebhookEventHandler;

#[async_trait]
impl WebhookEventHandler for LoggingWebhookEventHandler {
    async fn handle(&self, event: &InboundWebhookEvent) -> Result<(), WebhookEventHandlerError> {
        info!(
            event_id = %event.event_id,
            event_type = event.event_type.as_deref().unwrap_or(""),
            "webhook_event_processed"
        );
        Ok(())
    }
}
