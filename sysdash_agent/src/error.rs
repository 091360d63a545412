//! Error taxonomy for the probe → parse → normalize pipeline.
//!
//! A degenerate CPU delta (no ticks elapsed) is not an error: the sampler
//! reports 0% for it and never surfaces a failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::platform::Category;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// Command missing or failed, or pseudo-file unreadable.
    #[error("{category} probe `{probe}` unavailable: {reason}")]
    ProbeUnavailable {
        category: Category,
        probe: String,
        reason: String,
    },

    #[error("{category} probe `{probe}` timed out after {timeout_ms} ms")]
    ProbeTimeout {
        category: Category,
        probe: String,
        timeout_ms: u64,
    },

    /// The payload as a whole did not match the expected shape.
    #[error("could not parse {category} output: {reason}")]
    ParseFailure { category: Category, reason: String },

    #[error("unsupported platform `{0}`")]
    UnsupportedPlatform(String),
}

impl MetricsError {
    pub fn parse(category: Category, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            category,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Self::ProbeUnavailable { category, .. }
            | Self::ProbeTimeout { category, .. }
            | Self::ParseFailure { category, .. } => Some(*category),
            Self::UnsupportedPlatform(_) => None,
        }
    }
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        error!(error = %self, "metrics request failed");
        let what = self
            .category()
            .map(Category::description)
            .unwrap_or("system metrics");
        let body = json!({ "error": format!("Failed to fetch {what}: {self}") });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
