//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::DataService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data-access service backing every route
    pub service: Arc<DataService>,
}

impl AppState {
    pub fn new(service: DataService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
