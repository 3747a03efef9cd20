use std::sync::Arc;

use crate::generation::workflow::ContentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single workflow state holder; handlers are its only callers.
    pub store: Arc<ContentStore>,
}
