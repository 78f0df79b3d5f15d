//! Organization Profiling Library
//!
//! Turns an arbitrary web page into a structured profile of the organization
//! or product behind it: name, description, pricing, features, team, metrics,
//! contacts, and social links.
//!
//! # Pipeline
//!
//! fetch → classify website type → extract fields → re-render sparse pages
//! with a headless browser → crawl a few priority pages on the same domain →
//! merge → score completeness → cache.
//!
//! Every network-facing step sits behind a trait ([`PageFetcher`],
//! [`Renderer`]) so the whole pipeline runs against the doubles in
//! [`testing`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use site_profiler::{HttpFetcher, Profiler, ProfilerConfig, ResultCache, ValidatedFetcher};
//! use std::sync::Arc;
//!
//! let config = ProfilerConfig::default();
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new(&config)?);
//! let profiler = Profiler::new(fetcher, Arc::new(ResultCache::new(config.cache_ttl)))
//!     .with_config(config);
//!
//! let outcome = profiler.profile("https://acme.io", false).await?;
//! assert!(!outcome.cached);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Fetcher, renderer, and field extractor seams
//! - [`types`] - Records, classification, configuration, and profiles
//! - [`pipeline`] - Classifier, crawler, merger, scorer, and the `Profiler`
//! - [`extract`] - Default HTML field extractor
//! - [`fetchers`] - HTTP fetcher with retries and identity rotation
//! - [`renderers`] - Browserless and local Chromium renderers plus the pool
//! - [`stores`] - TTL result cache
//! - [`testing`] - Mock implementations for testing

pub mod document;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod pipeline;
pub mod renderers;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use document::PageDocument;
pub use error::{FetchError, ProfileError, RenderError, Result, SecurityError};
pub use extract::HtmlFieldExtractor;
pub use fetchers::{HttpFetcher, RetryPolicy};
pub use pipeline::{
    classify, discover, merge, score_completeness, CrawlPlan, Profiler, SecondaryPage,
};
pub use renderers::{BrowserlessRenderer, ChromeRenderer, RenderPool, RendererStatus};
pub use stores::{cache_key, normalize_url, ResultCache};
pub use traits::{
    extractor::FieldExtractor,
    fetcher::{FetchedPage, PageFetcher, UrlValidator, ValidatedFetcher},
    renderer::{RenderOptions, Renderer},
};
pub use types::{
    classification::{ClassificationResult, Confidence, WebsiteType},
    config::ProfilerConfig,
    profile::{
        CompletenessScore, ErrorResponse, ProfileOutcome, ScrapeRequest, ScrapeResponse,
        SiteProfile,
    },
    record::{
        ContactInfo, EcommerceData, ExtractionRecord, FooterInfo, HeroContent, MergedRecord,
        PriceRange, PricingEntry, PricingPlan, Product, StoreFeatures,
    },
};
