pub mod factory;
pub mod webhook_event_repository;

pub use factory::Repositories;
