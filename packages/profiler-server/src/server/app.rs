//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use site_profiler::{
    BrowserlessRenderer, ChromeRenderer, HttpFetcher, PageFetcher, Profiler, ProfilerConfig,
    RenderPool, ResultCache, UrlValidator, ValidatedFetcher,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{RendererKind, ServerConfig};
use crate::server::routes::{cache_clear_handler, cache_stats_handler, health_handler, scrape_handler};

/// Profiler as held by the server: any fetcher behind a trait object.
pub type AppProfiler = Profiler<Arc<dyn PageFetcher>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub profiler: Arc<AppProfiler>,
}

impl AppState {
    pub fn new(profiler: AppProfiler) -> Self {
        Self {
            profiler: Arc::new(profiler),
        }
    }
}

/// Wire the fetcher, render pool, and cache from configuration.
pub async fn build_profiler(config: &ServerConfig) -> Result<AppProfiler> {
    let profiler_config = profiler_config(config);

    let http = HttpFetcher::new(&profiler_config).context("Failed to build HTTP client")?;
    let fetcher: Arc<dyn PageFetcher> = if config.allow_private_hosts {
        tracing::warn!("ALLOW_PRIVATE_HOSTS set, SSRF guard disabled");
        Arc::new(http)
    } else {
        Arc::new(ValidatedFetcher::new(
            http.with_redirect_guard(UrlValidator::new()),
        ))
    };

    let cache = Arc::new(ResultCache::new(profiler_config.cache_ttl));
    let options = profiler_config.render_options();
    let pool = match config.renderer {
        RendererKind::Browserless => {
            let base_url = config
                .browserless_url
                .as_deref()
                .context("BROWSERLESS_URL must be set")?;
            let renderer = BrowserlessRenderer::new(base_url, config.browserless_token.as_deref())
                .context("Failed to build Browserless client")?;
            Some(RenderPool::start(renderer, config.render_sessions, options).await)
        }
        RendererKind::Chrome => {
            let renderer = ChromeRenderer::new(config.chrome_bin.clone());
            Some(RenderPool::start(renderer, config.render_sessions, options).await)
        }
        RendererKind::None => None,
    };

    let mut profiler = Profiler::new(fetcher, cache).with_config(profiler_config);
    if let Some(pool) = pool {
        profiler = profiler.with_renderer(Arc::new(pool));
    }
    Ok(profiler)
}

/// Pipeline tunables with any environment overrides applied.
pub fn profiler_config(config: &ServerConfig) -> ProfilerConfig {
    let mut profiler_config = ProfilerConfig::default();
    if let Some(timeout) = config.request_timeout {
        profiler_config = profiler_config.with_request_timeout(timeout);
    }
    if let Some(chars) = config.render_threshold_chars {
        profiler_config = profiler_config.with_render_threshold(chars);
    }
    if let Some(ttl) = config.cache_ttl {
        profiler_config = profiler_config.with_cache_ttl(ttl);
    }
    if let Some(score) = config.min_content_score {
        profiler_config = profiler_config.with_min_content_score(score);
    }
    if let Some(concurrency) = config.crawl_concurrency {
        profiler_config = profiler_config.with_crawl_concurrency(concurrency);
    }
    profiler_config
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin, the scraper is called from browsers
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape", post(scrape_handler))
        .route("/cache", get(cache_stats_handler).delete(cache_clear_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
