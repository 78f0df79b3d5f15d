//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the profiler without
//! making real network calls or launching browsers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult, RenderError, RenderResult};
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::traits::renderer::{RenderOptions, Renderer};

#[derive(Clone)]
enum MockResponse {
    Page(FetchedPage),
    Status(u16),
}

/// A mock fetcher for testing.
///
/// Serves predefined pages by URL; anything unknown is a 404. Clones share
/// state, so a test can keep a handle for assertions after handing one to a
/// `Profiler`.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        let page = FetchedPage::new(url.clone(), body);
        self.responses
            .write()
            .unwrap()
            .insert(url, MockResponse::Page(page));
        self
    }

    /// Serve `body` for `url` as if it were redirected to `final_url`.
    pub fn with_redirect(
        self,
        url: impl Into<String>,
        final_url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let page = FetchedPage::new(final_url, body);
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Page(page));
        self
    }

    /// Answer `url` with a non-2xx status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Hold the response for `url` back by `delay`.
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.into(), delay);
        self
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        let delay = self.delays.read().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Page(page)) => Ok(page),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock renderer for testing.
#[derive(Clone)]
pub struct MockRenderer {
    html: Arc<RwLock<HashMap<String, String>>>,
    available: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self {
            html: Arc::default(),
            available: true,
            calls: Arc::default(),
        }
    }
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose startup probe fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Return `html` when `url` is rendered. Unknown URLs time out.
    pub fn with_render(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.html.write().unwrap().insert(url.into(), html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, url: &str, _options: RenderOptions) -> RenderResult<String> {
        self.calls.write().unwrap().push(url.to_string());
        self.html
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Timeout {
                url: url.to_string(),
            })
    }

    async fn probe(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_tracks_calls() {
        let fetcher = MockFetcher::new().with_page("https://a.com/", "<p>a</p>");
        let page = fetcher.fetch("https://a.com/").await.unwrap();
        assert_eq!(page.body, "<p>a</p>");
        assert!(fetcher.fetch("https://a.com/missing").await.is_err());
        assert_eq!(fetcher.calls(), vec!["https://a.com/", "https://a.com/missing"]);
    }

    #[tokio::test]
    async fn test_mock_renderer_unknown_url_fails() {
        let renderer = MockRenderer::new();
        let err = renderer
            .render("https://a.com/", RenderOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Timeout { .. }));
    }
}
