pub mod health;
pub mod metrics;
pub mod ready;
pub mod stripe_webhook;
pub mod webhook_event;
