use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use site_profiler::{ErrorResponse, ScrapeRequest, ScrapeResponse};

use crate::server::app::AppState;

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Profile one URL.
///
/// 400 for a missing/invalid URL or a page that could not be fetched, 500 for
/// anything else.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected scrape body");
            return error_response(StatusCode::BAD_REQUEST, "URL is required");
        }
    };

    match state.profiler.handle(request).await {
        Ok(outcome) => {
            let timing_ms = started.elapsed().as_millis() as u64;
            Json(ScrapeResponse::new(outcome, timing_ms)).into_response()
        }
        Err(e) if e.is_client_error() => {
            tracing::info!(error = %e, "Scrape request failed");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Scrape pipeline error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
