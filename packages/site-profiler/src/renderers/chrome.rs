//! Renderer that shells out to a local headless Chromium.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{RenderError, RenderResult};
use crate::traits::renderer::{RenderOptions, Renderer};

/// Launches `chromium --headless --dump-dom` once per render, each time with a
/// throwaway profile directory.
pub struct ChromeRenderer {
    chrome_bin: String,
}

impl ChromeRenderer {
    pub fn new(chrome_bin: impl Into<String>) -> Self {
        let chrome_bin = chrome_bin.into();
        info!(chrome_bin = %chrome_bin, "ChromeRenderer initialized");
        Self { chrome_bin }
    }
}

pub(crate) fn chrome_args(profile_dir: &str, url: &str, options: RenderOptions) -> Vec<String> {
    vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!("--user-data-dir={profile_dir}"),
        format!("--timeout={}", options.timeout.as_millis()),
        // Virtual time keeps running until the network is idle, plus the budget
        format!("--virtual-time-budget={}", options.settle.as_millis()),
        "--dump-dom".to_string(),
        url.to_string(),
    ]
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, url: &str, options: RenderOptions) -> RenderResult<String> {
        let parsed = url::Url::parse(url).map_err(|e| RenderError::Launch(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RenderError::Launch(format!(
                "only http/https URLs can be rendered, got: {}",
                parsed.scheme()
            )));
        }

        let profile = tempfile::tempdir()
            .map_err(|e| RenderError::Launch(format!("temp profile dir: {e}")))?;
        let args = chrome_args(&profile.path().display().to_string(), url, options);

        debug!(url = %url, renderer = "chrome", "Render starting");

        let output = tokio::time::timeout(
            options.timeout + options.settle,
            tokio::process::Command::new(&self.chrome_bin)
                .args(&args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| RenderError::Timeout {
            url: url.to_string(),
        })?
        .map_err(|e| RenderError::Launch(format!("{}: {e}", self.chrome_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(url = %url, renderer = "chrome", stderr = %stderr, "Chrome exited with error");
            return Err(RenderError::Launch(format!("chrome exited with {}", output.status)));
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(url = %url, renderer = "chrome", bytes = html.len(), "Render complete");
        Ok(html)
    }

    async fn probe(&self) -> bool {
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            tokio::process::Command::new(&self.chrome_bin)
                .arg("--version")
                .kill_on_drop(true)
                .output(),
        )
        .await;

        matches!(result, Ok(Ok(output)) if output.status.success())
    }

    fn name(&self) -> &str {
        "chrome"
    }
}
