//! HTTP routes polled by the dashboard. Metrics handlers return 500 with
//! `{ "error": ... }` on failure; each category is an independent request.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::MetricsError;
use crate::metrics::{collect_metrics, collect_processes, collect_storage};
use crate::settings::{load_profile, save_profile, Profile};
use crate::state::AppState;
use crate::terminal::open_terminal;
use crate::types::{HistoryResponse, MetricsResponse, ProcessesResponse, StorageResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/metrics/history", get(history_handler))
        .route("/processes", get(processes_handler))
        .route("/storage", get(storage_handler))
        .route("/terminal", post(terminal_handler))
        .route("/profile", get(get_profile).post(post_profile))
        .with_state(state)
}

pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, MetricsError> {
    let metrics = collect_metrics(&state).await?;
    state.history.lock().await.record(&metrics);
    Ok(Json(metrics))
}

pub async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    let samples = state.history.lock().await.snapshot();
    Json(HistoryResponse { samples })
}

pub async fn processes_handler(
    State(state): State<AppState>,
) -> Result<Json<ProcessesResponse>, MetricsError> {
    Ok(Json(collect_processes(&state).await?))
}

pub async fn storage_handler(
    State(state): State<AppState>,
) -> Result<Json<StorageResponse>, MetricsError> {
    Ok(Json(collect_storage(&state).await?))
}

pub async fn terminal_handler(State(state): State<AppState>) -> Response {
    match open_terminal(state.platform) {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to open terminal");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to open terminal" })),
            )
                .into_response()
        }
    }
}

pub async fn get_profile(State(state): State<AppState>) -> Json<serde_json::Value> {
    let profile = load_profile(state.settings.as_ref());
    Json(json!({ "success": true, "profile": profile }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    name: Option<String>,
    email: Option<String>,
}

pub async fn post_profile(
    State(state): State<AppState>,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Response {
    let update = match body {
        Ok(Json(u)) => u,
        Err(rejection) => {
            info!(error = %rejection, "rejected profile update");
            return profile_required();
        }
    };
    let (Some(name), Some(email)) = (
        update.name.filter(|s| !s.trim().is_empty()),
        update.email.filter(|s| !s.trim().is_empty()),
    ) else {
        return profile_required();
    };
    let profile = Profile { name, email };
    save_profile(state.settings.as_ref(), &profile);
    Json(json!({ "success": true, "profile": profile })).into_response()
}

fn profile_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": "Name and email are required" })),
    )
        .into_response()
}
