//! Secondary page discovery.
//!
//! Picks at most a handful of same-domain pages likely to describe the
//! organization (about, pricing, team, ...) from a page's navigation.

use std::collections::HashSet;

use url::Url;

use crate::document::{element_text, PageDocument};

pub const MAX_SECONDARY_PAGES: usize = 4;

/// Path or link-text fragments that mark a company-information page.
pub const PRIORITY_KEYWORDS: &[&str] = &[
    "about",
    "product",
    "features",
    "pricing",
    "solution",
    "team",
    "how-it-works",
    "how it works",
    "why",
    "services",
    "platform",
    "company",
    "who-we-are",
    "what-we-do",
    "mission",
    "story",
    "customers",
    "case-studies",
    "portfolio",
    "work",
];

const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Ordered, deduplicated list of secondary pages to visit.
pub type CrawlPlan = Vec<String>;

/// Discover up to `limit` priority links on `doc`, resolved against
/// `base_url`, in first-discovered order.
///
/// `base_url` is where the document was served from and `seed_url` is the
/// URL originally requested; neither one's path is ever planned. Paths are
/// compared case-insensitively and without a trailing slash.
///
/// Navigation and header anchors come first, then the footer. When those
/// regions hold no anchors every anchor on the page is considered.
pub fn discover(doc: &PageDocument, base_url: &str, seed_url: &str, limit: usize) -> CrawlPlan {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let Some(base_host) = base.host_str().map(bare_host) else {
        return Vec::new();
    };

    let mut anchors = doc.select("nav a[href], header a[href]");
    anchors.extend(doc.select("footer a[href]"));
    if anchors.is_empty() {
        anchors = doc.select("a[href]");
    }

    let mut excluded = vec![page_path(&base)];
    if let Ok(seed) = Url::parse(seed_url) {
        excluded.push(page_path(&seed));
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut plan = Vec::new();

    for anchor in anchors {
        if plan.len() >= limit {
            break;
        }

        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty()
            || href.starts_with('#')
            || SKIPPED_SCHEMES
                .iter()
                .any(|s| href.to_lowercase().starts_with(s))
        {
            continue;
        }

        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        resolved.set_fragment(None);

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if resolved.host_str().map(bare_host) != Some(base_host) {
            continue;
        }

        let path = page_path(&resolved);
        if path == "/" || excluded.contains(&path) {
            continue;
        }

        let text = element_text(anchor).to_lowercase();
        let is_priority = PRIORITY_KEYWORDS
            .iter()
            .any(|k| path.contains(k) || text.contains(k));
        if !is_priority {
            continue;
        }

        if seen.insert(path) {
            plan.push(resolved.to_string());
        }
    }

    tracing::debug!(base_url = %base_url, pages = plan.len(), "Discovered secondary pages");
    plan
}

/// Lowercased path with trailing slashes dropped; the root stays `/`.
fn page_path(url: &Url) -> String {
    let path = url.path().to_lowercase();
    match path.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Host with a leading `www.` removed.
fn bare_host(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
