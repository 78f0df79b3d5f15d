//! Bounded pool around a single renderer.

use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{info, warn};

use crate::error::{RenderError, RenderResult};
use crate::traits::renderer::{RenderOptions, Renderer};

/// Result of the startup capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    Available,
    Unavailable,
}

impl RendererStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererStatus::Available => "available",
            RendererStatus::Unavailable => "unavailable",
        }
    }
}

/// Shares one renderer between requests, capping concurrent browser
/// sessions. Sessions are acquired explicitly and released on drop.
pub struct RenderPool {
    renderer: Arc<dyn Renderer>,
    permits: Semaphore,
    status: RendererStatus,
    options: RenderOptions,
}

impl RenderPool {
    /// Probe the renderer once and build the pool.
    pub async fn start<R: Renderer + 'static>(
        renderer: R,
        max_sessions: usize,
        options: RenderOptions,
    ) -> Self {
        let status = if renderer.probe().await {
            info!(renderer = renderer.name(), max_sessions, "Renderer available");
            RendererStatus::Available
        } else {
            warn!(renderer = renderer.name(), "Renderer probe failed, JS rendering disabled");
            RendererStatus::Unavailable
        };

        Self {
            renderer: Arc::new(renderer),
            permits: Semaphore::new(max_sessions.max(1)),
            status,
            options,
        }
    }

    pub fn status(&self) -> RendererStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == RendererStatus::Available
    }

    /// Reserve a browser session. Fails fast if the renderer is unavailable.
    pub async fn acquire(&self) -> RenderResult<RenderSession<'_>> {
        if !self.is_available() {
            return Err(RenderError::Unavailable);
        }

        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RenderError::Unavailable)?;

        Ok(RenderSession {
            pool: self,
            _permit: permit,
        })
    }

    /// Render `url`, swallowing failures. `None` means keep the original
    /// document.
    pub async fn render(&self, url: &str) -> Option<String> {
        let session = match self.acquire().await {
            Ok(session) => session,
            Err(e) => {
                warn!(url = %url, error = %e, "No render session");
                return None;
            }
        };

        let result = session.render(url).await;
        session.release();

        match result {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(url = %url, renderer = self.renderer.name(), error = %e, "Render failed");
                None
            }
        }
    }
}

/// One reserved browser session.
pub struct RenderSession<'a> {
    pool: &'a RenderPool,
    _permit: SemaphorePermit<'a>,
}

impl RenderSession<'_> {
    pub async fn render(&self, url: &str) -> RenderResult<String> {
        self.pool.renderer.render(url, self.pool.options).await
    }

    /// Give the session back to the pool.
    pub fn release(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRenderer;

    #[tokio::test]
    async fn test_unavailable_renderer_is_never_called() {
        let mock = MockRenderer::unavailable().with_render("https://a.com/", "<html></html>");
        let pool = RenderPool::start(mock.clone(), 2, RenderOptions::default()).await;

        assert_eq!(pool.status(), RendererStatus::Unavailable);
        assert!(pool.render("https://a.com/").await.is_none());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_is_swallowed() {
        let pool = RenderPool::start(MockRenderer::new(), 1, RenderOptions::default()).await;
        assert!(pool.is_available());
        assert!(pool.render("https://a.com/").await.is_none());
    }

    #[tokio::test]
    async fn test_session_released_after_render() {
        let mock = MockRenderer::new().with_render("https://a.com/", "<p>rendered</p>");
        let pool = RenderPool::start(mock, 1, RenderOptions::default()).await;

        assert_eq!(pool.render("https://a.com/").await.as_deref(), Some("<p>rendered</p>"));
        // Single permit: a second render only works if the first released it
        assert_eq!(pool.render("https://a.com/").await.as_deref(), Some("<p>rendered</p>"));
    }
}
