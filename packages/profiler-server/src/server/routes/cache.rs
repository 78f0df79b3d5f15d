use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct CacheStats {
    size: usize,
    keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearCacheParams {
    url: Option<String>,
}

#[derive(Serialize)]
pub struct ClearCacheResponse {
    cleared: usize,
}

/// Cache size and stored keys.
pub async fn cache_stats_handler(Extension(state): Extension<AppState>) -> Json<CacheStats> {
    let cache = state.profiler.cache();
    Json(CacheStats {
        size: cache.len(),
        keys: cache.keys(),
    })
}

/// Clear one URL's entry (`?url=`) or the whole cache.
pub async fn cache_clear_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ClearCacheParams>,
) -> Json<ClearCacheResponse> {
    let url = params.url.as_deref().filter(|u| !u.trim().is_empty());
    let cleared = state.profiler.cache().clear(url);
    tracing::info!(url = ?url, cleared, "Cache cleared");
    Json(ClearCacheResponse { cleared })
}
