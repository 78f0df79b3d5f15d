//! Configuration for the profiling pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::renderer::RenderOptions;

/// Tunables for one `Profiler` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Attempts per fetch before giving up. Default: 3.
    pub max_fetch_attempts: u32,

    /// Fixed wait between failed fetch attempts. Default: 1s.
    pub retry_backoff: Duration,

    /// Per-request HTTP timeout. Default: 15s.
    pub request_timeout: Duration,

    /// Extracted text shorter than this (in characters) triggers a headless
    /// re-render. Default: 1000.
    pub render_threshold_chars: usize,

    /// Navigation timeout for a headless render. Default: 30s.
    pub render_timeout: Duration,

    /// Extra wait after network idle before the DOM is captured. Default: 2s.
    pub render_settle: Duration,

    /// Secondary pages crawled per request. Default: 4.
    pub max_secondary_pages: usize,

    /// Characters of each secondary page's text appended to the merged text.
    /// Default: 2000.
    pub secondary_page_text_chars: usize,

    /// Secondary pages fetched at once. 1 keeps fetches strictly sequential.
    /// Merge order never depends on this. Default: 1.
    pub crawl_concurrency: usize,

    /// How long a finished profile stays in the cache. Default: 1800s.
    pub cache_ttl: Duration,

    /// Completeness scores below this flag the profile for enrichment.
    ///
    /// Default: 300. Completeness never exceeds 100, so with the default
    /// every profile is flagged. Lower it to make the flag discriminate.
    pub min_content_score: u32,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_fetch_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(15),
            render_threshold_chars: 1000,
            render_timeout: Duration::from_secs(30),
            render_settle: Duration::from_secs(2),
            max_secondary_pages: 4,
            secondary_page_text_chars: 2000,
            crawl_concurrency: 1,
            cache_ttl: Duration::from_secs(1800),
            min_content_score: 300,
        }
    }
}

impl ProfilerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry policy.
    pub fn with_retries(mut self, attempts: u32, backoff: Duration) -> Self {
        self.max_fetch_attempts = attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the render trigger threshold.
    pub fn with_render_threshold(mut self, chars: usize) -> Self {
        self.render_threshold_chars = chars;
        self
    }

    /// Set secondary page concurrency.
    pub fn with_crawl_concurrency(mut self, concurrency: usize) -> Self {
        self.crawl_concurrency = concurrency.max(1);
        self
    }

    /// Set cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the enrichment threshold.
    pub fn with_min_content_score(mut self, score: u32) -> Self {
        self.min_content_score = score;
        self
    }

    /// Bounds handed to the renderer for each render.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            timeout: self.render_timeout,
            settle: self.render_settle,
        }
    }
}
