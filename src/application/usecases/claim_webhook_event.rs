// Use case: claim_webhook_event.

use crate::application::context::AppContext;
use crate::domain::entities::webhook_event::WebhookEventRecord;
use crate::domain::value_objects::external_event_id::{ExternalEventId, ExternalEventIdError};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::stores::webhook_event_store::WebhookEventRepositoryError;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, error};

/// Records an external event id so that it is processed at most once.
pub struct ClaimWebhookEventUseCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// First delivery: the caller owns processing of this event.
    Claimed,
    /// A live record already exists. Skip processing and do not retry.
    AlreadyClaimed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("invalid event id: {0}")]
    InvalidEventId(ExternalEventIdError),
    /// The store could not answer. The event must not be treated as processed.
    #[error("webhook event store unavailable: {0}")]
    Infrastructure(String),
}

#[derive(Debug, Clone)]
pub struct ClaimWebhookEventCommand {
    pub event_id: String,
    pub now: Timestamp,
    pub event_type: Option<String>,
    pub payload_digest: Option<String>,
}

impl ClaimWebhookEventCommand {
    /// A claim carrying only the event id.
    pub fn bare(event_id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            event_id: event_id.into(),
            now,
            event_type: None,
            payload_digest: None,
        }
    }
}

impl ClaimWebhookEventUseCase {
    /// Try to claim an event id at `now`.
    pub async fn execute(
        ctx: &AppContext,
        cmd: ClaimWebhookEventCommand,
    ) -> Result<ClaimOutcome, ClaimError> {
        // Step 1: Validate the id at the model boundary before touching the store.
        let event_id = ExternalEventId::parse(&cmd.event_id).map_err(ClaimError::InvalidEventId)?;
        let record =
            WebhookEventRecord::new(event_id, cmd.now, cmd.event_type, cmd.payload_digest);

        Self::claim_record(ctx, &record).await
    }

    /// Claim an already-built record. Only store failures can surface here.
    pub async fn claim_record(
        ctx: &AppContext,
        record: &WebhookEventRecord,
    ) -> Result<ClaimOutcome, ClaimError> {
        // Step 2: A single insert guarded by the unique event id.
        let result = ctx
            .repos
            .webhook_event
            .claim(record, ctx.retention.ttl())
            .await;

        // Step 3: Only a uniqueness refusal means "already claimed".
        match result {
            Ok(_) => {
                counter!("webhook_event_claims_total", "outcome" => "claimed").increment(1);
                debug!(event_id = %record.event_id, "webhook_event_claimed");
                Ok(ClaimOutcome::Claimed)
            }
            Err(WebhookEventRepositoryError::Conflict) => {
                counter!("webhook_event_claims_total", "outcome" => "duplicate").increment(1);
                debug!(event_id = %record.event_id, "webhook_event_duplicate");
                Ok(ClaimOutcome::AlreadyClaimed)
            }
            Err(e) => {
                counter!("webhook_event_claims_total", "outcome" => "error").increment(1);
                error!(event_id = %record.event_id, error = ?e, "webhook_event_claim_failed");
                Err(ClaimError::Infrastructure(format!("{e:?}")))
            }
        }
    }
}
