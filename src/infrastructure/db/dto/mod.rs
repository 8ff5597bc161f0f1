pub mod webhook_event;

pub use webhook_event::WebhookEventRow;
