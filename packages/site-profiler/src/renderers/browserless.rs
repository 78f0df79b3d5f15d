//! Renderer backed by a Browserless `/content` endpoint.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::traits::renderer::{RenderOptions, Renderer};

/// Renders pages through a remote Browserless instance. Browserless runs every
/// `/content` call in a fresh browser context.
pub struct BrowserlessRenderer {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessRenderer {
    pub fn new(base_url: &str, token: Option<&str>) -> RenderResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        info!(base_url, "BrowserlessRenderer initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let mut endpoint = format!("{}{}", self.base_url, path);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }
}

/// Request body for `/content`: wait for network idle, then settle.
pub(crate) fn content_request(url: &str, options: RenderOptions) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "gotoOptions": {
            "waitUntil": "networkidle0",
            "timeout": options.timeout.as_millis() as u64,
        },
        "waitForTimeout": options.settle.as_millis() as u64,
    })
}

#[async_trait]
impl Renderer for BrowserlessRenderer {
    async fn render(&self, url: &str, options: RenderOptions) -> RenderResult<String> {
        debug!(url = %url, renderer = "browserless", "Render starting");

        let resp = self
            .client
            .post(self.endpoint("/content"))
            .json(&content_request(url, options))
            // Leave room for the settle delay and the response itself
            .timeout(options.timeout + options.settle + Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    RenderError::from(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp.text().await?;
        debug!(url = %url, renderer = "browserless", bytes = html.len(), "Render complete");
        Ok(html)
    }

    async fn probe(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/json/version"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "browserless"
    }
}
