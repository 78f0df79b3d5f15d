//! HTTP fetcher with retries and client identity rotation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, LOCATION, USER_AGENT};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, PageFetcher, UrlValidator};
use crate::types::config::ProfilerConfig;

/// A simulated browser the fetcher presents itself as.
#[derive(Debug, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: &'static str,
    pub accept_language: &'static str,
}

/// Fixed pool of identities. Consecutive attempts always use different
/// entries, as long as attempts do not exceed the pool size.
pub const IDENTITY_POOL: &[ClientIdentity] = &[
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
        accept_language: "en-US,en;q=0.9",
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
        accept_language: "en-US,en;q=0.8",
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:123.0) Gecko/20100101 Firefox/123.0",
        accept_language: "en-GB,en;q=0.7",
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        accept_language: "en;q=0.9",
    },
];

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ProfilerConfig) -> Self {
        Self {
            max_attempts: config.max_fetch_attempts.max(1),
            backoff: config.retry_backoff,
        }
    }
}

/// Run `attempt` until it succeeds, fails terminally, or the policy runs
/// out. Each attempt gets the next identity from the pool, starting at
/// `first_identity`. The last attempt's error is returned.
pub async fn retry_with_identities<T, F, Fut>(
    url: &str,
    policy: RetryPolicy,
    first_identity: usize,
    mut attempt: F,
) -> FetchResult<T>
where
    F: FnMut(&'static ClientIdentity) -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt_no: u32 = 0;

    loop {
        let identity = &IDENTITY_POOL[(first_identity + attempt_no as usize) % IDENTITY_POOL.len()];
        attempt_no += 1;

        match attempt(identity).await {
            Ok(value) => {
                if attempt_no > 1 {
                    info!(url = %url, attempt = attempt_no, "Fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() || attempt_no >= max_attempts => {
                warn!(url = %url, attempt = attempt_no, error = %e, "Fetch failed");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    url = %url,
                    attempt = attempt_no,
                    max_attempts = max_attempts,
                    error = %e,
                    "Fetch attempt failed, backing off"
                );
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}

/// Redirect hops followed before a fetch gives up.
pub const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP, following redirects.
///
/// Redirects are followed here rather than inside reqwest so that an
/// optional guard can vet every hop, DNS included, before it is requested.
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
    rotation: AtomicUsize,
    redirect_guard: Option<UrlValidator>,
}

impl HttpFetcher {
    pub fn new(config: &ProfilerConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            policy: RetryPolicy::from_config(config),
            rotation: AtomicUsize::new(0),
            redirect_guard: None,
        })
    }

    /// Refuse redirect targets `validator` rejects, before requesting them.
    pub fn with_redirect_guard(mut self, validator: UrlValidator) -> Self {
        self.redirect_guard = Some(validator);
        self
    }

    async fn attempt(&self, url: &str, identity: &ClientIdentity) -> FetchResult<FetchedPage> {
        debug!(url = %url, user_agent = identity.user_agent, "HTTP fetch starting");

        let mut current = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        let mut hops = 0;

        let response = loop {
            let response = self
                .client
                .get(current.clone())
                .header(USER_AGENT, identity.user_agent)
                .header(ACCEPT_LANGUAGE, identity.accept_language)
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))?;

            let Some(next) = redirect_target(&current, &response) else {
                break response;
            };

            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(FetchError::Http(
                    format!("more than {MAX_REDIRECTS} redirects from {url}").into(),
                ));
            }
            if let Some(guard) = &self.redirect_guard {
                guard.validate_with_dns(next.as_str()).await?;
            }

            debug!(from = %current, to = %next, "Following redirect");
            current = next;
        };

        let status = response.status();
        let final_url = current.to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        debug!(url = %url, final_url = %final_url, bytes = body.len(), "HTTP fetch complete");

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Where a 3xx response points, resolved against the URL that produced it.
fn redirect_target(current: &Url, response: &reqwest::Response) -> Option<Url> {
    if !response.status().is_redirection() {
        return None;
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        if Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        // Successive requests start at different identities
        let first = self.rotation.fetch_add(1, Ordering::Relaxed);

        retry_with_identities(url, self.policy, first, move |identity| {
            self.attempt(url, identity)
        })
        .await
    }

    fn name(&self) -> &str {
        "http"
    }
}
