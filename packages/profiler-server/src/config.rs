use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Which headless rendering backend to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Browserless,
    Chrome,
    None,
}

impl RendererKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "browserless" => Ok(Self::Browserless),
            "chrome" | "chromium" => Ok(Self::Chrome),
            "none" | "off" | "" => Ok(Self::None),
            other => bail!("RENDERER must be browserless, chrome, or none (got {other})"),
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub renderer: RendererKind,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    pub chrome_bin: String,
    pub render_sessions: usize,
    pub request_timeout: Option<Duration>,
    pub render_threshold_chars: Option<usize>,
    pub cache_ttl: Option<Duration>,
    pub min_content_score: Option<u32>,
    pub crawl_concurrency: Option<usize>,
    pub allow_private_hosts: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let browserless_url = env::var("BROWSERLESS_URL").ok().filter(|v| !v.is_empty());
        let renderer = match env::var("RENDERER") {
            Ok(value) => RendererKind::parse(&value)?,
            Err(_) if browserless_url.is_some() => RendererKind::Browserless,
            Err(_) => RendererKind::Chrome,
        };
        if renderer == RendererKind::Browserless && browserless_url.is_none() {
            bail!("BROWSERLESS_URL must be set when RENDERER=browserless");
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            renderer,
            browserless_url,
            browserless_token: env::var("BROWSERLESS_TOKEN").ok().filter(|v| !v.is_empty()),
            chrome_bin: env::var("CHROME_BIN").unwrap_or_else(|_| "chromium".to_string()),
            render_sessions: env::var("RENDER_SESSIONS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("RENDER_SESSIONS must be a valid number")?,
            request_timeout: optional_number::<u64>("REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            render_threshold_chars: optional_number("RENDER_THRESHOLD_CHARS")?,
            cache_ttl: optional_number::<u64>("CACHE_TTL_SECS")?.map(Duration::from_secs),
            min_content_score: optional_number("MIN_CONTENT_SCORE")?,
            crawl_concurrency: optional_number("CRAWL_CONCURRENCY")?,
            allow_private_hosts: env::var("ALLOW_PRIVATE_HOSTS")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Parse an optional numeric variable; unset or empty means `None`.
fn optional_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{name} must be a valid number")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_kind_parse() {
        assert_eq!(RendererKind::parse("Browserless").unwrap(), RendererKind::Browserless);
        assert_eq!(RendererKind::parse("chromium").unwrap(), RendererKind::Chrome);
        assert_eq!(RendererKind::parse(" none ").unwrap(), RendererKind::None);
        assert!(RendererKind::parse("firefox").is_err());
    }

    #[test]
    fn test_optional_number() {
        std::env::set_var("PROFILER_TEST_NUMBER_OK", " 42 ");
        std::env::set_var("PROFILER_TEST_NUMBER_BAD", "lots");
        std::env::set_var("PROFILER_TEST_NUMBER_EMPTY", "");

        assert_eq!(optional_number::<u32>("PROFILER_TEST_NUMBER_OK").unwrap(), Some(42));
        assert_eq!(optional_number::<u32>("PROFILER_TEST_NUMBER_EMPTY").unwrap(), None);
        assert_eq!(optional_number::<u32>("PROFILER_TEST_NUMBER_UNSET").unwrap(), None);
        let err = optional_number::<u32>("PROFILER_TEST_NUMBER_BAD").unwrap_err();
        assert_eq!(err.to_string(), "PROFILER_TEST_NUMBER_BAD must be a valid number");
    }
}
