// HTTP routes: claim record inspection.

use crate::application::usecases::get_webhook_event::{
    GetWebhookEventError, GetWebhookEventUseCase,
};
use crate::interface::http::dto::webhook_event::WebhookEventResponse;
use crate::interface::http::problem::{
    WHD_EVENT_ID_INVALID, WHD_EVENT_NOT_FOUND, WHD_STORAGE_UNAVAILABLE, problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use time::format_description::well_known::Rfc3339;

/// Builds webhook event lookup routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/webhook-events/:event_id", get(get_webhook_event))
}

async fn get_webhook_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Response {
    match GetWebhookEventUseCase::execute(&state.ctx, &event_id).await {
        Ok(record) => {
            let expires_at = record.expires_at(state.ctx.retention.ttl());
            let response = WebhookEventResponse {
                event_id: record.event_id.into_inner(),
                event_type: record.event_type,
                payload_digest: record.payload_digest,
                created_at: record
                    .created_at
                    .as_inner()
                    .format(&Rfc3339)
                    .unwrap_or_default(),
                expires_at: expires_at.as_inner().format(&Rfc3339).unwrap_or_default(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(GetWebhookEventError::InvalidEventId) => problem(
            StatusCode::BAD_REQUEST,
            WHD_EVENT_ID_INVALID,
            Some("invalid event_id".to_string()),
            None,
        ),
        Err(GetWebhookEventError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            WHD_EVENT_NOT_FOUND,
            Some("webhook event not found".to_string()),
            None,
        ),
        Err(GetWebhookEventError::Storage(_)) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHD_STORAGE_UNAVAILABLE,
            Some("storage unavailable".to_string()),
            None,
        ),
    }
}
