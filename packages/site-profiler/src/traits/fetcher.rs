//! Fetcher trait and URL validation for SSRF protection.

use async_trait::async_trait;
use std::collections::HashSet;
use std::net::IpAddr;

use crate::error::{FetchError, FetchResult, SecurityError, SecurityResult};

/// A page as returned by a fetcher, after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// URL the content was finally served from
    pub final_url: String,

    /// HTTP status of the final response
    pub status: u16,

    /// Response body
    pub body: String,
}

impl FetchedPage {
    pub fn new(final_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            status: 200,
            body: body.into(),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.body.len()
    }
}

/// Retrieves raw pages. Implementations own their retry policy.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single URL, following redirects.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// URL validator for SSRF protection.
///
/// Validates URLs before fetching to prevent:
/// - Access to internal services (localhost, 127.0.0.1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x)
/// - Access to cloud metadata services (169.254.x)
/// - Non-HTTP(S) schemes (file://, ftp://)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<ipnet::IpNet>,
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        let blocked_cidrs = [
            "10.0.0.0/8",
            "172.16.0.0/12",
            "192.168.0.0/16",
            "169.254.0.0/16", // Link-local / cloud metadata
            "127.0.0.0/8",
            "0.0.0.0/8",
            "::1/128",
            "fc00::/7",
            "fe80::/10",
        ]
        .iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect();

        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "::1",
                "[::1]",
                "0.0.0.0",
                "metadata.google.internal",
                "metadata.gke.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs,
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses validation).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Validate a URL for safety.
    pub fn validate(&self, url: &str) -> SecurityResult<()> {
        let parsed = url::Url::parse(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            self.check_ip(ip)?;
        }

        Ok(())
    }

    /// Validate a URL and resolve DNS to check the actual IP.
    ///
    /// Catches DNS rebinding where a public hostname resolves to an
    /// internal address.
    pub async fn validate_with_dns(&self, url: &str) -> SecurityResult<()> {
        self.validate(url)?;

        let parsed = url::Url::parse(url)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        let port = parsed.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            self.check_ip(addr.ip()).map_err(|_| {
                SecurityError::BlockedCidr(format!(
                    "DNS for {} resolved to blocked IP {}",
                    host,
                    addr.ip()
                ))
            })?;
        }

        Ok(())
    }

    fn check_ip(&self, ip: IpAddr) -> SecurityResult<()> {
        if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
            return Err(SecurityError::BlockedCidr(ip.to_string()));
        }
        Ok(())
    }
}

/// A fetcher that validates every URL before fetching, and the final URL
/// after redirects.
pub struct ValidatedFetcher<F: PageFetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: PageFetcher> ValidatedFetcher<F> {
    /// Create a new validated fetcher with default security rules.
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: fetcher,
            validator: UrlValidator::new(),
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.validator.validate_with_dns(url).await?;

        let page = self.inner.fetch(url).await?;

        // A redirect may have landed somewhere we would not fetch directly
        if page.final_url != url {
            self.validator.validate(&page.final_url).map_err(FetchError::Blocked)?;
        }

        Ok(page)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[test]
    fn test_blocks_localhost() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://localhost/").is_err());
        assert!(validator.validate("http://127.0.0.1/").is_err());
        assert!(validator.validate("http://[::1]/").is_err());
    }

    #[test]
    fn test_blocks_private_ips() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://10.0.0.1/").is_err());
        assert!(validator.validate("http://172.16.0.1/").is_err());
        assert!(validator.validate("http://192.168.1.1/").is_err());
    }

    #[test]
    fn test_blocks_metadata_services() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://169.254.169.254/").is_err());
        assert!(validator.validate("http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_blocks_non_http() {
        let validator = UrlValidator::new();
        assert!(validator.validate("file:///etc/passwd").is_err());
        assert!(validator.validate("ftp://example.com/").is_err());
    }

    #[test]
    fn test_allows_public_urls() {
        let validator = UrlValidator::new();
        assert!(validator.validate("https://example.com/").is_ok());
        assert!(validator.validate("http://93.184.216.34/").is_ok());
    }

    #[test]
    fn test_allowed_hosts_bypass() {
        let validator = UrlValidator::new().allow_host("localhost");
        assert!(validator.validate("http://localhost/").is_ok());
    }

    #[tokio::test]
    async fn test_validated_fetcher_rejects_before_fetching() {
        let mock = MockFetcher::new().with_page("http://127.0.0.1/", "<p>internal</p>");
        let fetcher = ValidatedFetcher::new(mock.clone());

        let err = fetcher.fetch("http://127.0.0.1/").await.unwrap_err();
        assert!(matches!(err, FetchError::Blocked(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validated_fetcher_rejects_redirect_into_private_range() {
        let mock = MockFetcher::new().with_redirect(
            "http://93.184.216.34/",
            "http://10.0.0.5/admin",
            "<p>admin</p>",
        );
        let fetcher = ValidatedFetcher::new(mock);

        let err = fetcher.fetch("http://93.184.216.34/").await.unwrap_err();
        assert!(matches!(err, FetchError::Blocked(SecurityError::BlockedCidr(_))));
    }
}
