pub mod claim_webhook_event;
pub mod ensure_schema;
pub mod get_webhook_event;
pub mod ingest_webhook;
pub mod sweep_expired_events;
