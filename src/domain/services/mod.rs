pub mod webhook_event_handler;
