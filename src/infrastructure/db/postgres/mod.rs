mod database;
pub mod webhook_event_store_postgres;

pub use database::{PostgresConfig, PostgresDatabase};
