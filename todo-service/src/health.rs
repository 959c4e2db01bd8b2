//! Health check handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{repository::TodoRepository, state::AppState};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` while the process serves requests
    pub ok: bool,

    /// Service name
    pub service: String,

    /// Version
    pub version: String,
}

/// Liveness probe
///
/// Always returns 200 OK if the service is running.
pub async fn health<R: TodoRepository>(State(state): State<AppState<R>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
