use std::sync::Arc;

use crate::config::Retention;
use crate::domain::services::webhook_event_handler::WebhookEventHandler;
use crate::infrastructure::db::repositories::Repositories;

/// Shared application resources used by use cases and services.
pub struct AppContext {
    pub repos: Repositories,
    pub handler: Arc<dyn WebhookEventHandler>,
    pub retention: Retention,
}

impl AppContext {
    /// Build a new application context with shared repositories and services.
    pub fn new(
        repos: Repositories,
        handler: Arc<dyn WebhookEventHandler>,
        retention: Retention,
    ) -> Self {
        Self {
            repos,
            handler,
            retention,
        }
    }
}
