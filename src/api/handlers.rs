//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::{error, info};

use crate::{
    error::Error,
    presenter::status_title,
    settings::{SettingKey, SettingValue, Settings},
    state::AppState,
    tasks::TimerAction,
};
use super::responses::{ApiResponse, HealthResponse, SettingsResponse, StatusResponse};

async fn control(state: &AppState, action: TimerAction, message: &str) -> Result<Json<ApiResponse>, Error> {
    match state.perform(action).await {
        Ok(snapshot) => {
            info!("{} endpoint called - {}", action, message);
            Ok(Json(ApiResponse::new(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(e)
        }
    }
}

/// Handle POST /start - Begin ticking the current phase
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::Start, "Timer started").await
}

/// Handle POST /pause - Stop ticking
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::Pause, "Timer paused").await
}

/// Handle POST /reset - Refill the current phase and pause
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::Reset, "Timer reset").await
}

/// Handle POST /skip - Complete the current phase now
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::Skip, "Phase skipped").await
}

/// Handle POST /toggle/skip-breaks
pub async fn skip_breaks_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::ToggleSkipBreaks, "Skip breaks toggled").await
}

/// Handle POST /toggle/auto-start
pub async fn auto_start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Error> {
    control(&state, TimerAction::ToggleAutoStart, "Auto start toggled").await
}

/// Handle GET /settings - Current configuration values
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, Error> {
    let settings = state.timer.settings().await?;
    Ok(Json(settings_response(&settings)))
}

/// Handle PUT /settings/:key - Update one configuration value
pub async fn update_setting_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(value): Json<SettingValue>,
) -> Result<Json<SettingsResponse>, Error> {
    let key = SettingKey::parse(&name)?;
    let settings = state.timer.update_setting(key, value).await?;
    state.record_action(&format!("set {}", key));
    info!("Settings endpoint called - {} updated", key);
    Ok(Json(settings_response(&settings)))
}

/// Handle GET /status - Return the timer snapshot and status-bar title
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.timer.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        title: status_title(&timer),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn settings_response(settings: &Settings) -> SettingsResponse {
    SettingsResponse {
        settings: settings
            .to_map()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    }
}
