pub mod webhook_event_store;
