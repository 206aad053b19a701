//! HTTP API module
//!
//! Local control surface standing in for the menu-bar window: the same
//! start/pause/reset/skip buttons and flag toggles, plus read-only state.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::{
    auto_start_handler, health_handler, pause_handler, reset_handler, settings_handler,
    skip_breaks_handler, skip_handler, start_handler, status_handler, update_setting_handler,
};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/skip", post(skip_handler))
        .route("/toggle/skip-breaks", post(skip_breaks_handler))
        .route("/toggle/auto-start", post(auto_start_handler))
        .route("/settings", get(settings_handler))
        .route("/settings/:key", put(update_setting_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
