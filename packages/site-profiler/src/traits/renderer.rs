//! Renderer trait for headless-browser re-fetches of JS-heavy pages.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::RenderResult;

/// Navigation and settle bounds for one render.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Upper bound on navigation plus network idle
    pub timeout: Duration,

    /// Fixed wait after network idle before capturing the DOM
    pub settle: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            settle: Duration::from_secs(2),
        }
    }
}

/// Produces the fully rendered HTML of a URL.
///
/// Each call runs in its own isolated browser session; implementations must
/// not leak cookies or storage between calls.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str, options: RenderOptions) -> RenderResult<String>;

    /// Startup capability check. `false` marks the renderer unavailable.
    async fn probe(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "unknown"
    }
}
