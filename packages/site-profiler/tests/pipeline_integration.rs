//! Integration tests for the profiling pipeline.
//!
//! These drive the full Profiler through mock fetchers and renderers:
//! 1. Cache hits and bypass
//! 2. Conditional rendering and the adoption guard
//! 3. Secondary page crawl and merge
//! 4. Error mapping for failed and blocked fetches

use std::sync::Arc;
use std::time::Duration;

use site_profiler::{
    testing::{MockFetcher, MockRenderer},
    ProfileError, Profiler, RenderOptions, RenderPool, ResultCache, ScrapeRequest,
    ValidatedFetcher, WebsiteType,
};

const SEED: &str = "https://acme.io";

fn startup_home() -> String {
    let body = "Acme helps small teams ship reliable software without the overhead. ".repeat(20);
    format!(
        r#"<html><head><title>Acme | Ship faster</title></head><body>
            <nav>
                <a href="/about">About</a>
                <a href="/team">Team</a>
                <a href="/pricing">Pricing</a>
                <a href="/careers">Careers</a>
            </nav>
            <h1>Ship faster</h1>
            <p>{body}</p>
        </body></html>"#
    )
}

fn profiler_with(fetcher: MockFetcher) -> Profiler<MockFetcher> {
    Profiler::new(fetcher, Arc::new(ResultCache::default()))
}

async fn pool(renderer: MockRenderer) -> Arc<RenderPool> {
    Arc::new(RenderPool::start(renderer, 1, RenderOptions::default()).await)
}

#[tokio::test]
async fn test_second_request_is_served_from_cache_unchanged() {
    let fetcher = MockFetcher::new().with_page(SEED, startup_home());
    let profiler = profiler_with(fetcher.clone());

    let first = profiler.profile(SEED, false).await.unwrap();
    let second = profiler.profile("HTTPS://ACME.IO/", false).await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(
        serde_json::to_string(&first.profile).unwrap(),
        serde_json::to_string(&second.profile).unwrap()
    );
    assert_eq!(fetcher.call_count(SEED), 1);
}

#[tokio::test]
async fn test_skip_cache_refetches_and_rewrites() {
    let fetcher = MockFetcher::new().with_page(SEED, startup_home());
    let profiler = profiler_with(fetcher.clone());

    profiler.profile(SEED, false).await.unwrap();
    let outcome = profiler
        .handle(ScrapeRequest {
            url: Some(SEED.to_string()),
            skip_cache: true,
        })
        .await
        .unwrap();

    assert!(!outcome.cached);
    assert_eq!(fetcher.call_count(SEED), 2);
    assert_eq!(profiler.cache().len(), 1);
}

#[tokio::test]
async fn test_render_not_adopted_when_not_larger() {
    let html = format!("<html><body><p>{}</p></body></html>", "a".repeat(200));
    let fetcher = MockFetcher::new().with_page(SEED, html);
    let renderer = MockRenderer::new().with_render(SEED, "<html></html>");

    let profiler = profiler_with(fetcher).with_renderer(pool(renderer.clone()).await);
    let outcome = profiler.profile(SEED, false).await.unwrap();

    assert_eq!(renderer.calls(), vec![SEED]);
    assert!(!outcome.profile.js_rendered);
    assert_eq!(outcome.profile.merged.record.raw_text, "a".repeat(200));
}

#[tokio::test]
async fn test_larger_render_is_adopted() {
    let fetcher = MockFetcher::new().with_page(SEED, r#"<html><body><div id="root"></div></body></html>"#);
    let rendered = format!(
        r#"<html><head><title>Rendered Co | Home</title></head><body><h1>Hello</h1><p>{}</p></body></html>"#,
        "Rendered content from the client bundle. ".repeat(10)
    );
    let renderer = MockRenderer::new().with_render(SEED, rendered);

    let profiler = profiler_with(fetcher).with_renderer(pool(renderer).await);
    let outcome = profiler.profile(SEED, false).await.unwrap();

    assert!(outcome.profile.js_rendered);
    assert_eq!(outcome.profile.merged.record.company_name, "Rendered Co");
}

#[tokio::test]
async fn test_render_failure_keeps_original() {
    let fetcher = MockFetcher::new().with_page(SEED, "<html><body><p>tiny</p></body></html>");
    // Unknown URL: the mock renderer times out
    let renderer = MockRenderer::new();

    let profiler = profiler_with(fetcher).with_renderer(pool(renderer.clone()).await);
    let outcome = profiler.profile(SEED, false).await.unwrap();

    assert_eq!(renderer.calls().len(), 1);
    assert!(!outcome.profile.js_rendered);
    assert_eq!(outcome.profile.merged.record.raw_text, "tiny");
}

#[tokio::test]
async fn test_unavailable_renderer_is_skipped() {
    let fetcher = MockFetcher::new().with_page(SEED, "<html><body><p>tiny</p></body></html>");
    let renderer = MockRenderer::unavailable().with_render(SEED, "<html>much larger</html>".repeat(10));

    let profiler = profiler_with(fetcher).with_renderer(pool(renderer.clone()).await);
    let outcome = profiler.profile(SEED, false).await.unwrap();

    assert!(renderer.calls().is_empty());
    assert!(!outcome.profile.js_rendered);
}

#[tokio::test]
async fn test_secondary_pages_are_merged_in_discovery_order() {
    let fetcher = MockFetcher::new()
        .with_page(SEED, startup_home())
        .with_page(
            "https://acme.io/about",
            r#"<html><body><h2>Our story</h2><p>Serving 40 countries worldwide.</p></body></html>"#,
        )
        .with_page(
            "https://acme.io/team",
            r#"<html><body><section class="team"><p>Jane Doe</p><p>John Smith</p></section></body></html>"#,
        )
        .with_status("https://acme.io/pricing", 500);

    let profiler = profiler_with(fetcher.clone());
    let outcome = profiler.profile(SEED, false).await.unwrap();
    let profile = outcome.profile;

    assert_eq!(profile.website_type, WebsiteType::ContentStartup);
    assert_eq!(
        fetcher.calls(),
        vec![
            SEED,
            "https://acme.io/about",
            "https://acme.io/team",
            "https://acme.io/pricing",
        ]
    );
    assert_eq!(profile.merged.pages_scraped, 3);
    assert_eq!(
        profile.merged.additional_pages,
        vec!["https://acme.io/about", "https://acme.io/team"]
    );

    let record = &profile.merged.record;
    assert_eq!(record.company_name, "Acme");
    assert_eq!(record.team, vec!["Jane Doe", "John Smith"]);
    assert_eq!(record.metrics.get("countries").map(String::as_str), Some("40"));
    assert!(record.headings.contains(&"Our story".to_string()));
    assert!(record.raw_text.contains("--- Page: https://acme.io/about ---"));
    assert!(profile.needs_enrichment);
}

#[tokio::test]
async fn test_concurrent_crawl_keeps_merge_order() {
    // The first planned page answers last
    let fetcher = MockFetcher::new()
        .with_page(SEED, startup_home())
        .with_page("https://acme.io/about", "<html><body><h2>About us</h2></body></html>")
        .with_delay("https://acme.io/about", Duration::from_millis(100))
        .with_page("https://acme.io/team", "<html><body><h2>Team page</h2></body></html>")
        .with_delay("https://acme.io/team", Duration::from_millis(30))
        .with_page("https://acme.io/pricing", "<html><body><h2>Plans</h2></body></html>");

    let config = site_profiler::ProfilerConfig::default().with_crawl_concurrency(3);
    let profiler = profiler_with(fetcher).with_config(config);
    let outcome = profiler.profile(SEED, false).await.unwrap();

    let headings = &outcome.profile.merged.record.headings;
    let position = |h: &str| headings.iter().position(|x| x == h).unwrap();
    assert!(position("About us") < position("Team page"));
    assert!(position("Team page") < position("Plans"));
    assert_eq!(
        outcome.profile.merged.additional_pages,
        vec![
            "https://acme.io/about",
            "https://acme.io/team",
            "https://acme.io/pricing",
        ]
    );
}

#[tokio::test]
async fn test_redirected_seed_is_not_crawled_again() {
    let seed = "https://acme.io/company";
    let fetcher = MockFetcher::new()
        .with_redirect(
            seed,
            "https://acme.io/company-info",
            r#"<html><head><title>Acme | Company</title></head><body>
                <nav><a href="/company">Company</a><a href="/about/">About</a></nav>
                <footer><a href="/about">About</a></footer>
            </body></html>"#,
        )
        .with_page("https://acme.io/about/", "<html><body><h2>Our story</h2></body></html>");

    let profiler = profiler_with(fetcher.clone());
    let outcome = profiler.profile(seed, false).await.unwrap();

    assert!(outcome.profile.website_type.crawls_secondary_pages());
    assert_eq!(fetcher.calls(), vec![seed, "https://acme.io/about/"]);
    assert_eq!(outcome.profile.merged.additional_pages, vec!["https://acme.io/about/"]);
    assert_eq!(outcome.profile.final_url, "https://acme.io/company-info");
}

#[tokio::test]
async fn test_failed_seed_fetch_is_client_error_and_not_cached() {
    let fetcher = MockFetcher::new().with_status(SEED, 404);
    let profiler = profiler_with(fetcher);

    let err = profiler.profile(SEED, false).await.unwrap_err();
    assert!(matches!(err, ProfileError::Fetch(_)));
    assert!(err.is_client_error());
    assert!(profiler.cache().is_empty());
}

#[tokio::test]
async fn test_private_address_is_blocked() {
    let inner = MockFetcher::new().with_page("http://127.0.0.1/", "<html></html>");
    let profiler = Profiler::new(
        ValidatedFetcher::new(inner.clone()),
        Arc::new(ResultCache::default()),
    );

    let err = profiler.profile("http://127.0.0.1/", false).await.unwrap_err();
    assert!(err.is_client_error());
    assert!(inner.calls().is_empty());
}
