// Use case: ingest_webhook.
// Claims the provider event id first, then hands the event to the handler exactly once.

use crate::application::context::AppContext;
use crate::application::shared::payload_digest::payload_digest;
use crate::application::usecases::claim_webhook_event::{ClaimOutcome, ClaimWebhookEventUseCase};
use crate::domain::entities::webhook_event::WebhookEventRecord;
use crate::domain::services::webhook_event_handler::InboundWebhookEvent;
use crate::domain::value_objects::external_event_id::ExternalEventId;
use crate::domain::value_objects::timestamps::Timestamp;
use serde::Deserialize;
use tracing::warn;

pub struct IngestWebhookUseCase;

/// The fields every provider event carries. Everything else stays in the raw payload.
#[derive(Debug, Deserialize)]
struct ProviderEnvelope {
    id: String,
    #[serde(rename = "type")]
    event_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Processed { event_id: String },
    Duplicate { event_id: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum IngestError {
    MalformedPayload(String),
    InvalidEventId(String),
    Storage(String),
    /// Claimed but the handler failed. The claim stands; a redelivery is a duplicate.
    HandlerFailed { event_id: String, reason: String },
}

impl IngestWebhookUseCase {
    pub async fn execute(
        ctx: &AppContext,
        body: &[u8],
        now: Timestamp,
    ) -> Result<IngestOutcome, IngestError> {
        // Step 1: Parse the provider envelope.
        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| IngestError::MalformedPayload(e.to_string()))?;
        let envelope: ProviderEnvelope = serde_json::from_value(payload.clone())
            .map_err(|e| IngestError::MalformedPayload(e.to_string()))?;
        let event_id = ExternalEventId::parse(&envelope.id)
            .map_err(|e| IngestError::InvalidEventId(e.to_string()))?;

        // Step 2: Claim before any side effect.
        let record = WebhookEventRecord::new(
            event_id,
            now,
            envelope.event_type.clone(),
            Some(payload_digest(body)),
        );
        let outcome = ClaimWebhookEventUseCase::claim_record(ctx, &record)
            .await
            .map_err(|e| IngestError::Storage(e.to_string()))?;

        if outcome == ClaimOutcome::AlreadyClaimed {
            return Ok(IngestOutcome::Duplicate {
                event_id: envelope.id,
            });
        }

        // Step 3: Process the claimed event.
        let event = InboundWebhookEvent {
            event_id: record.event_id,
            event_type: envelope.event_type,
            payload,
        };
        if let Err(e) = ctx.handler.handle(&event).await {
            warn!(event_id = %event.event_id, error = ?e, "webhook_event_handler_failed_after_claim");
            return Err(IngestError::HandlerFailed {
                event_id: envelope.id,
                reason: format!("{e:?}"),
            });
        }

        Ok(IngestOutcome::Processed {
            event_id: envelope.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{IngestError, IngestOutcome, IngestWebhookUseCase};
    use crate::application::context::test_support::{
        RecordingHandler, memory_context, test_context,
    };
    use crate::domain::services::webhook_event_handler::WebhookEventHandlerError;
    use crate::domain::value_objects::external_event_id::ExternalEventId;
    use crate::domain::value_objects::timestamps::Timestamp;
    use std::sync::Arc;

    const INVOICE_PAID: &[u8] = br#"{"id":"evt_123","type":"invoice.paid","data":{"object":{"id":"in_1"}}}"#;

    #[tokio::test]
    async fn given_redelivered_event_when_ingested_should_process_once() {
        let handler = Arc::new(RecordingHandler::default());
        let ctx = memory_context(handler.clone());

        let first = IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc()).await;
        let second = IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc()).await;

        assert_eq!(
            first,
            Ok(IngestOutcome::Processed {
                event_id: "evt_123".to_string()
            })
        );
        assert_eq!(
            second,
            Ok(IngestOutcome::Duplicate {
                event_id: "evt_123".to_string()
            })
        );
        assert_eq!(*handler.seen.lock().unwrap(), vec!["evt_123".to_string()]);
    }

    #[tokio::test]
    async fn given_event_when_ingested_should_store_type_and_digest() {
        let ctx = memory_context(Arc::new(RecordingHandler::default()));

        IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc())
            .await
            .unwrap();

        let record = ctx
            .repos
            .webhook_event
            .get(&ExternalEventId::parse("evt_123").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.event_type.as_deref(), Some("invoice.paid"));
        assert_eq!(record.payload_digest.map(|d| d.len()), Some(64));
    }

    #[tokio::test]
    async fn given_body_without_id_when_ingested_should_return_malformed() {
        let ctx = memory_context(Arc::new(RecordingHandler::default()));

        let result =
            IngestWebhookUseCase::execute(&ctx, br#"{"type":"invoice.paid"}"#, Timestamp::now_utc())
                .await;

        assert!(matches!(result, Err(IngestError::MalformedPayload(_))));
    }

    #[tokio::test]
    async fn given_blank_id_when_ingested_should_return_invalid_event_id() {
        let ctx = memory_context(Arc::new(RecordingHandler::default()));

        let result =
            IngestWebhookUseCase::execute(&ctx, br#"{"id":""}"#, Timestamp::now_utc()).await;

        assert!(matches!(result, Err(IngestError::InvalidEventId(_))));
    }

    #[tokio::test]
    async fn given_unavailable_store_when_ingested_should_not_invoke_handler() {
        let ctx = test_context();

        let result = IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc()).await;

        assert!(matches!(result, Err(IngestError::Storage(_))));
    }

    #[tokio::test]
    async fn given_failing_handler_when_redelivered_should_stay_claimed() {
        let handler = Arc::new(RecordingHandler {
            fail_with: Some(WebhookEventHandlerError::Unavailable("ledger down".to_string())),
            ..RecordingHandler::default()
        });
        let ctx = memory_context(handler.clone());

        let first = IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc()).await;
        let second = IngestWebhookUseCase::execute(&ctx, INVOICE_PAID, Timestamp::now_utc()).await;

        assert!(matches!(first, Err(IngestError::HandlerFailed { .. })));
        assert!(matches!(second, Ok(IngestOutcome::Duplicate { .. })));
        assert_eq!(handler.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn given_empty_or_oversized_type_when_ingested_should_still_process() {
        let handler = Arc::new(RecordingHandler::default());
        let ctx = memory_context(handler.clone());
        let long_type = format!(r#"{{"id":"evt_b","type":"{}"}}"#, "x".repeat(300));

        let blank =
            IngestWebhookUseCase::execute(&ctx, br#"{"id":"evt_a","type":""}"#, Timestamp::now_utc())
                .await;
        let long =
            IngestWebhookUseCase::execute(&ctx, long_type.as_bytes(), Timestamp::now_utc()).await;

        assert_eq!(
            blank,
            Ok(IngestOutcome::Processed {
                event_id: "evt_a".to_string()
            })
        );
        assert_eq!(
            long,
            Ok(IngestOutcome::Processed {
                event_id: "evt_b".to_string()
            })
        );
        assert_eq!(handler.seen.lock().unwrap().len(), 2);
    }
}
