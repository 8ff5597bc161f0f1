// HTTP routes: payment provider webhook ingestion.

use crate::application::usecases::ingest_webhook::{
    IngestError, IngestOutcome, IngestWebhookUseCase,
};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::interface::http::dto::webhook_event::IngestWebhookResponse;
use crate::interface::http::problem::{
    WHD_EVENT_ID_INVALID, WHD_HANDLER_FAILED, WHD_REQUEST_MALFORMED, WHD_STORAGE_UNAVAILABLE,
    problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;

const INSTANCE: &str = "/webhooks/stripe";

/// Builds the webhook ingestion route.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/webhooks/stripe", post(receive))
}

/// Receives one provider event. 2xx stops provider retries; 5xx asks for a redelivery.
async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    // Step 1: Claim and process.
    let result = IngestWebhookUseCase::execute(&state.ctx, &body, Timestamp::now_utc()).await;

    // Step 2: Map output to HTTP response.
    match result {
        Ok(IngestOutcome::Processed { event_id }) => (
            StatusCode::OK,
            Json(IngestWebhookResponse {
                event_id,
                status: "processed",
            }),
        )
            .into_response(),
        Ok(IngestOutcome::Duplicate { event_id }) => (
            StatusCode::OK,
            Json(IngestWebhookResponse {
                event_id,
                status: "duplicate",
            }),
        )
            .into_response(),
        Err(IngestError::MalformedPayload(detail)) => problem(
            StatusCode::BAD_REQUEST,
            WHD_REQUEST_MALFORMED,
            Some(detail),
            Some(INSTANCE.to_string()),
        ),
        Err(IngestError::InvalidEventId(detail)) => problem(
            StatusCode::BAD_REQUEST,
            WHD_EVENT_ID_INVALID,
            Some(detail),
            Some(INSTANCE.to_string()),
        ),
        Err(IngestError::HandlerFailed { event_id, .. }) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            WHD_HANDLER_FAILED,
            Some(format!("event {event_id} was claimed but processing failed")),
            Some(INSTANCE.to_string()),
        ),
        Err(IngestError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHD_STORAGE_UNAVAILABLE,
            Some("storage unavailable".to_string()),
            Some(INSTANCE.to_string()),
        ),
    }
}
