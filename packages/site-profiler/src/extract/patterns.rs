//! Shared regexes for field extraction and classification.

use regex::Regex;
use std::sync::LazyLock;

/// Currency price tokens: `$19`, `€ 1,200.00`, `£9.99`.
pub static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\$€£]\s*\d+(?:,\d{3})*(?:\.\d{2})?").expect("valid regex"));

pub static BILLING_PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(/\s*mo(?:nth)?|per month|monthly|/\s*yr|/\s*year|per year|annually|yearly)")
        .expect("valid regex")
});

pub static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

pub static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?\d{1,4}\)?[-\s.]?\(?\d{2,4}\)?[-\s.]?\d{3,4}[-\s.]?\d{3,4}")
        .expect("valid regex")
});

/// Two capitalised words, e.g. "Jane Doe".
pub static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").expect("valid regex"));

pub static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:©|\(c\)|copyright)[^|\n]{0,80}").expect("valid regex")
});

/// `(metric key, pattern)`; the first capture group is the value.
pub static METRIC_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "users",
            r"(?i)(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:million|M)\+?\s+(?:users|customers)",
        ),
        (
            "valuation",
            r"(?i)(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:billion|B)\s+(?:valuation|revenue)",
        ),
        ("countries", r"(?i)(\d+)\+?\s*(?:countries|nations)"),
        ("growth_rate", r"(?i)(\d+)%\s*(?:growth|increase)"),
        ("funding", r"(?i)\$\s*(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:M|million)"),
        (
            "customers",
            r"(?i)(\d+(?:,\d{3})*\+?)\s+(?:customers|clients|companies|teams)",
        ),
    ]
    .into_iter()
    .map(|(key, pattern)| (key, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// `(platform, pattern)`; the first capture group is the handle.
pub static SOCIAL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("linkedin", r#"(?i)linkedin\.com/(?:company|in)/([^/\s"'?#<]+)"#),
        ("twitter", r"(?i)twitter\.com/([A-Za-z0-9_]{1,15})"),
        ("x", r"(?i)//(?:www\.)?x\.com/([A-Za-z0-9_]{1,15})"),
        ("facebook", r#"(?i)facebook\.com/([^/\s"'?#<]+)"#),
        ("instagram", r#"(?i)instagram\.com/([^/\s"'?#<]+)"#),
        ("github", r#"(?i)github\.com/([^/\s"'?#<]+)"#),
        (
            "youtube",
            r#"(?i)youtube\.com/(?:c/|channel/|user/|@)?([^/\s"'?#<]+)"#,
        ),
    ]
    .into_iter()
    .map(|(key, pattern)| (key, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// Path segments that follow a social domain but are not account handles.
pub const NON_HANDLE_SEGMENTS: &[&str] = &[
    "share", "sharer", "sharer.php", "intent", "home", "watch", "login", "search",
];

/// Button/link wording that asks the visitor to act.
pub const CTA_KEYWORDS: &[&str] = &[
    "get started",
    "sign up",
    "start free",
    "free trial",
    "try it",
    "try for free",
    "book a demo",
    "request a demo",
    "contact us",
    "contact sales",
    "subscribe",
    "join",
    "download",
    "learn more",
    "buy now",
    "shop now",
    "get in touch",
    "schedule",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_tokens() {
        let found: Vec<_> = PRICE_RE
            .find_iter("Starter $9.99, Team € 1,200.00, Pro £49")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["$9.99", "€ 1,200.00", "£49"]);
    }

    #[test]
    fn test_metric_patterns_capture_values() {
        let text = "Trusted by 10 million users in 120 countries, raised $25M";
        let metrics: Vec<_> = METRIC_PATTERNS
            .iter()
            .filter_map(|(key, re)| re.captures(text).map(|c| (*key, c[1].to_string())))
            .collect();
        assert!(metrics.contains(&("users", "10".to_string())));
        assert!(metrics.contains(&("countries", "120".to_string())));
        assert!(metrics.contains(&("funding", "25".to_string())));
    }

    #[test]
    fn test_x_handle_requires_domain_boundary() {
        let (_, re) = SOCIAL_PATTERNS.iter().find(|(k, _)| *k == "x").unwrap();
        assert!(re.captures("https://x.com/acme").is_some());
        assert!(re.captures("https://box.com/acme").is_none());
    }
}
