//! The Profiler - sequences every pipeline step for one request.
//!
//! ```text
//! cache? ─► fetch ─► classify + extract ─► render? ─► ecommerce? ─► crawl + merge? ─► score ─► cache
//! ```
//!
//! HTML parsing and analysis run on the blocking pool in self-contained
//! steps, so no parsed document ever lives across an `.await`.

use futures::{stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::classify::classify;
use super::discover::{discover, CrawlPlan};
use super::merge::{merge, SecondaryPage};
use super::score::score_completeness;
use crate::document::PageDocument;
use crate::error::{ProfileError, Result};
use crate::extract::HtmlFieldExtractor;
use crate::renderers::{RenderPool, RendererStatus};
use crate::stores::memory::ResultCache;
use crate::traits::extractor::FieldExtractor;
use crate::traits::fetcher::PageFetcher;
use crate::types::classification::{ClassificationResult, WebsiteType};
use crate::types::config::ProfilerConfig;
use crate::types::profile::{ProfileOutcome, ScrapeRequest, SiteProfile};
use crate::types::record::{EcommerceData, ExtractionRecord};

/// Everything learned from one document in a single synchronous pass.
#[derive(Debug)]
struct PageAnalysis {
    classification: ClassificationResult,
    record: ExtractionRecord,
    ecommerce: Option<EcommerceData>,
    crawl_plan: CrawlPlan,
}

/// Turns a URL into a [`SiteProfile`].
///
/// # Example
///
/// ```rust,ignore
/// let cache = Arc::new(ResultCache::default());
/// let profiler = Profiler::new(HttpFetcher::new(&config)?, cache)
///     .with_config(config)
///     .with_renderer(Arc::new(pool));
///
/// let outcome = profiler.profile("https://acme.io", false).await?;
/// println!("{} ({})", outcome.profile.merged.record.company_name, outcome.profile.website_type);
/// ```
pub struct Profiler<F: PageFetcher, E: FieldExtractor + 'static = HtmlFieldExtractor> {
    fetcher: F,
    extractor: Arc<E>,
    cache: Arc<ResultCache>,
    renderer: Option<Arc<RenderPool>>,
    config: ProfilerConfig,
}

impl<F: PageFetcher> Profiler<F> {
    /// Create a profiler with the default HTML extractor.
    pub fn new(fetcher: F, cache: Arc<ResultCache>) -> Self {
        Self::with_extractor(fetcher, HtmlFieldExtractor::new(), cache)
    }
}

impl<F: PageFetcher, E: FieldExtractor + 'static> Profiler<F, E> {
    pub fn with_extractor(fetcher: F, extractor: E, cache: Arc<ResultCache>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            cache,
            renderer: None,
            config: ProfilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ProfilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable conditional JS rendering through `pool`.
    pub fn with_renderer(mut self, pool: Arc<RenderPool>) -> Self {
        self.renderer = Some(pool);
        self
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn renderer_status(&self) -> RendererStatus {
        self.renderer
            .as_ref()
            .map(|pool| pool.status())
            .unwrap_or(RendererStatus::Unavailable)
    }

    /// Handle a scrape request as received from a caller.
    pub async fn handle(&self, request: ScrapeRequest) -> Result<ProfileOutcome> {
        let url = request.url.unwrap_or_default();
        self.profile(&url, request.skip_cache).await
    }

    /// Profile `url`, serving from the cache unless `skip_cache` is set.
    pub async fn profile(&self, url: &str, skip_cache: bool) -> Result<ProfileOutcome> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ProfileError::invalid_input("URL is required"));
        }
        if url::Url::parse(url).is_err() {
            return Err(ProfileError::invalid_input(format!("Invalid URL: {url}")));
        }

        if !skip_cache {
            if let Some(profile) = self.cache.get(url) {
                info!(url = %url, "Serving cached profile");
                return Ok(ProfileOutcome {
                    profile,
                    cached: true,
                });
            }
        }

        let started = Instant::now();
        let profile = self.run(url).await?;
        info!(
            url = %url,
            website_type = %profile.website_type,
            pages = profile.merged.pages_scraped,
            score = profile.completeness_score,
            js_rendered = profile.js_rendered,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Profiled site"
        );

        self.cache.put(url, profile.clone());
        Ok(ProfileOutcome {
            profile,
            cached: false,
        })
    }

    async fn run(&self, url: &str) -> Result<SiteProfile> {
        let page = self.fetcher.fetch(url).await?;
        let final_url = page.final_url.clone();
        let original_bytes = page.byte_len();
        info!(url = %url, final_url = %final_url, bytes = original_bytes, "Fetched seed page");

        let mut analysis = self.analyze(page.body, &final_url, url).await?;
        let mut js_rendered = false;

        let text_chars = analysis.record.raw_text.chars().count();
        if text_chars < self.config.render_threshold_chars {
            if let Some(pool) = self.renderer.as_ref().filter(|p| p.is_available()) {
                debug!(url = %final_url, text_chars, "Sparse page, rendering");
                match pool.render(&final_url).await {
                    Some(html) if html.len() > original_bytes => {
                        info!(
                            url = %final_url,
                            original_bytes,
                            rendered_bytes = html.len(),
                            "Adopting rendered document"
                        );
                        analysis = self.analyze(html, &final_url, url).await?;
                        js_rendered = true;
                    }
                    Some(html) => {
                        warn!(
                            url = %final_url,
                            original_bytes,
                            rendered_bytes = html.len(),
                            "Rendered document not larger, keeping original"
                        );
                    }
                    None => {}
                }
            }
        }

        let PageAnalysis {
            classification,
            record,
            ecommerce,
            crawl_plan,
        } = analysis;

        let merged = if classification.website_type.crawls_secondary_pages() {
            let secondaries = self.crawl(crawl_plan).await;
            merge(record, secondaries, self.config.secondary_page_text_chars)
        } else {
            merge(record, Vec::new(), self.config.secondary_page_text_chars)
        };

        let completeness = score_completeness(
            &merged.record,
            classification.website_type,
            ecommerce.as_ref(),
            self.config.min_content_score,
        );

        Ok(SiteProfile {
            url: url.to_string(),
            final_url,
            website_type: classification.website_type,
            classification,
            merged,
            ecommerce,
            js_rendered,
            completeness_score: completeness.score,
            needs_enrichment: completeness.needs_enrichment,
            scraped_at: chrono::Utc::now(),
        })
    }

    /// Classify, extract, and plan follow-ups for one document served from
    /// `url` in answer to a request for `seed_url`.
    async fn analyze(&self, html: String, url: &str, seed_url: &str) -> Result<PageAnalysis> {
        let extractor = Arc::clone(&self.extractor);
        let url = url.to_string();
        let seed_url = seed_url.to_string();
        let max_pages = self.config.max_secondary_pages;

        tokio::task::spawn_blocking(move || {
            let doc = PageDocument::parse(html);
            let classification = classify(&doc, &url);
            let record = extractor.extract(&doc, &url);

            let website_type = classification.website_type;
            let ecommerce = (website_type == WebsiteType::Ecommerce)
                .then(|| extractor.extract_ecommerce(&doc, &url));
            let crawl_plan = if website_type.crawls_secondary_pages() {
                discover(&doc, &url, &seed_url, max_pages)
            } else {
                Vec::new()
            };

            PageAnalysis {
                classification,
                record,
                ecommerce,
                crawl_plan,
            }
        })
        .await
        .map_err(|e| ProfileError::Internal(format!("page analysis failed: {e}")))
    }

    /// Fetch and extract secondary pages, keeping plan order. Failed pages
    /// are dropped.
    async fn crawl(&self, plan: CrawlPlan) -> Vec<SecondaryPage> {
        if plan.is_empty() {
            return Vec::new();
        }
        info!(pages = plan.len(), "Crawling secondary pages");

        let concurrency = self.config.crawl_concurrency.max(1);
        stream::iter(plan)
            .map(|url| self.fetch_secondary(url))
            .buffered(concurrency)
            .filter_map(|page| async move { page })
            .collect()
            .await
    }

    async fn fetch_secondary(&self, url: String) -> Option<SecondaryPage> {
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping secondary page");
                return None;
            }
        };

        let extractor = Arc::clone(&self.extractor);
        let page_url = url.clone();
        let record = tokio::task::spawn_blocking(move || {
            let doc = PageDocument::parse(page.body);
            extractor.extract(&doc, &page_url)
        })
        .await;

        match record {
            Ok(record) => Some(SecondaryPage { url, record }),
            Err(e) => {
                warn!(url = %url, error = %e, "Secondary page extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    fn profiler(fetcher: MockFetcher) -> Profiler<MockFetcher> {
        Profiler::new(fetcher, Arc::new(ResultCache::default()))
    }

    #[tokio::test]
    async fn test_missing_url_is_invalid_input() {
        let profiler = profiler(MockFetcher::new());
        let err = profiler.handle(ScrapeRequest::default()).await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidInput { .. }));
        assert_eq!(err.to_string(), "URL is required");
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_invalid_input() {
        let fetcher = MockFetcher::new();
        let profiler = profiler(fetcher.clone());
        let err = profiler.profile("not a url", false).await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidInput { .. }));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_client_error() {
        let fetcher = MockFetcher::new().with_status("https://down.io", 503);
        let err = profiler(fetcher)
            .profile("https://down.io", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Fetch(_)));
        assert!(err.is_client_error());
        assert!(err.to_string().starts_with("Failed to fetch URL: "));
    }

    #[tokio::test]
    async fn test_ecommerce_page_skips_crawl() {
        let cards = r#"<div class="product-card"><h3>Mug</h3><span>$12</span></div>"#.repeat(4);
        let html = format!(
            r#"<html><body>
                <nav><a href="/about">About</a></nav>
                {cards}
                <button class="add-to-cart">Add to cart</button>
            </body></html>"#
        );
        let fetcher = MockFetcher::new().with_page("https://shop.io", html);
        let outcome = profiler(fetcher.clone())
            .profile("https://shop.io", false)
            .await
            .unwrap();

        assert_eq!(outcome.profile.website_type, WebsiteType::Ecommerce);
        let ecommerce = outcome.profile.ecommerce.expect("ecommerce data");
        assert_eq!(ecommerce.products.len(), 1);
        assert_eq!(outcome.profile.merged.pages_scraped, 1);
        assert_eq!(fetcher.calls(), vec!["https://shop.io"]);
    }

    #[tokio::test]
    async fn test_renderer_status_without_pool() {
        let profiler = profiler(MockFetcher::new());
        assert_eq!(profiler.renderer_status(), RendererStatus::Unavailable);
    }
}
