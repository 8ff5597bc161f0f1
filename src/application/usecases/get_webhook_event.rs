// Use case: get_webhook_event.

use crate::application::context::AppContext;
use crate::domain::entities::webhook_event::WebhookEventRecord;
use crate::domain::value_objects::external_event_id::ExternalEventId;

/// Looks up the claim record for an event id.
pub struct GetWebhookEventUseCase;

#[derive(Debug, PartialEq, Eq)]
pub enum GetWebhookEventError {
    InvalidEventId,
    NotFound,
    Storage(String),
}

impl GetWebhookEventUseCase {
    pub async fn execute(
        ctx: &AppContext,
        event_id: &str,
    ) -> Result<WebhookEventRecord, GetWebhookEventError> {
        let event_id =
            ExternalEventId::parse(event_id).map_err(|_| GetWebhookEventError::InvalidEventId)?;

        ctx.repos
            .webhook_event
            .get(&event_id)
            .await
            .map_err(|e| GetWebhookEventError::Storage(format!("{e:?}")))?
            .ok_or(GetWebhookEventError::NotFound)
    }
}
