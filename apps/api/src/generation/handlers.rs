//! Axum route handlers for the Posts API — the presentation boundary of the workflow.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::generator::ContentRequest;
use crate::generation::workflow::StateSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleHashtagRequest {
    pub tag: String,
}

/// GET /api/v1/posts/state
pub async fn handle_get_state(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(state.store.snapshot())
}

/// POST /api/v1/posts/generate
///
/// Runs one generation cycle and returns the resolved state.
/// The cycle runs on its own task so a dropped connection cannot strand the
/// workflow in `Generating`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<StateSnapshot>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let store = Arc::clone(&state.store);
    tokio::spawn(async move { store.generate_post(request).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Generation task panicked: {e}")))??;

    Ok(Json(state.store.snapshot()))
}

/// POST /api/v1/posts/hashtags/toggle
pub async fn handle_toggle_hashtag(
    State(state): State<AppState>,
    Json(request): Json<ToggleHashtagRequest>,
) -> Json<StateSnapshot> {
    state.store.toggle_hashtag(&request.tag);
    Json(state.store.snapshot())
}

/// POST /api/v1/posts/hashtags/apply
pub async fn handle_apply_selected(State(state): State<AppState>) -> Json<StateSnapshot> {
    state.store.apply_selected();
    Json(state.store.snapshot())
}
