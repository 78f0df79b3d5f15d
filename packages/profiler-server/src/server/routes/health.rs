use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    renderer: String,
}

/// Health check endpoint
///
/// Always 200 while the process is up. `renderer` reports the startup probe
/// result; an unavailable renderer only disables JS rendering.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "site-profiler".to_string(),
        renderer: state.profiler.renderer_status().as_str().to_string(),
    })
}
