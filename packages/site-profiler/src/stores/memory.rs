//! In-memory TTL cache of finished profiles.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::types::profile::SiteProfile;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

struct CacheEntry {
    value: SiteProfile,
    expires_at: Instant,
}

/// Process-local profile cache keyed by a hash of the normalized URL.
///
/// Expired entries are removed lazily when read; there is no background
/// sweep and no capacity bound. Construct one at startup and share it
/// (behind an `Arc`) with every `Profiler`.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, url: &str) -> Option<SiteProfile> {
        self.get_at(url, Instant::now())
    }

    /// Look up `url` as of `now`, evicting the entry if it has expired.
    pub fn get_at(&self, url: &str, now: Instant) -> Option<SiteProfile> {
        let key = cache_key(url);
        let mut entries = self.entries();

        let expired = match entries.get(&key) {
            Some(entry) if now >= entry.expires_at => true,
            Some(entry) => return Some(entry.value.clone()),
            None => return None,
        };

        if expired {
            entries.remove(&key);
            tracing::debug!(url = %url, "Cache entry expired");
        }
        None
    }

    pub fn put(&self, url: &str, value: SiteProfile) {
        self.put_at(url, value, Instant::now());
    }

    /// Store `value` for `url`, expiring exactly one TTL after `now`.
    pub fn put_at(&self, url: &str, value: SiteProfile, now: Instant) {
        let entry = CacheEntry {
            value,
            expires_at: now + self.ttl,
        };
        self.entries().insert(cache_key(url), entry);
    }

    /// Remove one URL's entry, or every entry when `url` is `None`.
    /// Returns how many entries were removed.
    pub fn clear(&self, url: Option<&str>) -> usize {
        match url {
            Some(url) => usize::from(self.entries().remove(&cache_key(url)).is_some()),
            None => self.clear_all(),
        }
    }

    pub fn clear_all(&self) -> usize {
        let mut entries = self.entries();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Number of stored entries, expired ones included until read.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored cache keys in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }
}

/// Lowercase, trim, and drop the trailing slash. Scheme and query are kept.
///
/// A run of trailing slashes is dropped as a whole so that normalizing twice
/// gives the same key.
pub fn normalize_url(url: &str) -> String {
    url.trim()
        .to_lowercase()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

/// SHA-256 hex digest of the normalized URL.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    format!("{:x}", hasher.finalize())
}
