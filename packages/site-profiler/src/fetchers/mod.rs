//! Fetcher implementations.
//!
//! - `HttpFetcher` - reqwest-based fetching with retry and identity rotation
//! - `ValidatedFetcher` - SSRF guard around any fetcher (re-exported)

mod http;

pub use http::{retry_with_identities, ClientIdentity, HttpFetcher, RetryPolicy, IDENTITY_POOL};

// Re-export from traits for convenience
pub use crate::traits::fetcher::{FetchedPage, PageFetcher, UrlValidator, ValidatedFetcher};
