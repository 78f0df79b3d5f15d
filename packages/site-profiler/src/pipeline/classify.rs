//! Heuristic website classification.
//!
//! Four independent signal scores are summed from weighted heuristics, then
//! the highest wins. Pages with too little signal fall through an override
//! cascade instead.

use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::document::{element_text, PageDocument};
use crate::extract::patterns::{CTA_KEYWORDS, PRICE_RE};
use crate::types::classification::{ClassificationResult, Confidence, WebsiteType};

/// Below this, the winner is decided by the override cascade.
pub const MIN_SIGNAL_SCORE: u32 = 15;

const LONG_PARAGRAPH_CHARS: usize = 100;

/// Marker strings per commerce platform family. A family scores once.
const PLATFORM_FAMILIES: &[&[&str]] = &[
    &["cdn.shopify.com", "shopify.theme", "myshopify.com"],
    &["woocommerce", "wc-block", "wp-content/plugins/woocommerce"],
    &["magento", "mage/cookies", "mage-init"],
    &["bigcommerce", "cdn11.bigcommerce.com"],
    &["squarespace-commerce", "sqs-add-to-cart"],
    &["wixstores", "wix-ecommerce"],
];

/// Cart and checkout wording on word boundaries. Longer phrases are listed
/// first so "add to cart" is one hit, not also a bare "cart".
static CART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:add[\s_-]?to[\s_-]?(?:cart|bag|basket)|shopping[\s_-]?(?:cart|bag)|checkout|basket|cart)\b")
        .expect("valid regex")
});

const PRODUCT_SELECTORS: &[&str] = &[
    r#"[class*="product-card"]"#,
    r#"[class*="product-item"]"#,
    r#"[class*="product-grid"]"#,
    r#"[class*="product-tile"]"#,
    r#"[itemtype*="schema.org/Product"]"#,
    "[data-product-id]",
];

const NAV_TERMS: &[&str] = &[
    "about",
    "team",
    "careers",
    "pricing",
    "product",
    "features",
    "blog",
    "docs",
    "solutions",
    "customers",
    "contact",
    "platform",
    "integrations",
    "resources",
    "company",
    "jobs",
    "press",
    "investors",
    "api",
];

const STARTUP_PHRASES: &[&str] = &[
    "our mission",
    "we help",
    "we're building",
    "we are building",
    "founded in",
    "backed by",
    "our team",
    "join our team",
    "trusted by",
    "our customers",
    "get started",
    "request a demo",
    "book a demo",
    "free trial",
    "sign up",
    "platform",
    "seamlessly",
    "powered by",
    "built for",
];

const FEATURE_HEADING_PHRASES: &[&str] = &[
    "features",
    "how it works",
    "why choose",
    "benefits",
    "what we do",
    "our solution",
];

const LANDING_MARKERS: &[&str] = &[
    "single-page",
    "onepage",
    "one-page",
    "landing-page",
    "scroll-to",
];

const PORTFOLIO_TERMS: &[&str] = &[
    "portfolio",
    "our work",
    "case studies",
    "case study",
    "projects",
    "gallery",
    "showcase",
];

const AGENCY_TERMS: &[&str] = &[
    "agency",
    "studio",
    "creative",
    "design",
    "branding",
    "clients",
    "we craft",
    "consultancy",
    "freelance",
    "photography",
];

/// Lowercased views of a page computed once and shared by the scorers.
struct PageSignals<'a> {
    doc: &'a PageDocument,
    source: String,
    text: String,
    long_paragraphs: usize,
}

impl<'a> PageSignals<'a> {
    fn new(doc: &'a PageDocument) -> Self {
        let long_paragraphs = doc
            .select("p")
            .into_iter()
            .filter(|p| element_text(*p).chars().count() > LONG_PARAGRAPH_CHARS)
            .count();

        Self {
            doc,
            source: doc.source().to_lowercase(),
            text: doc.visible_text(&[]).to_lowercase(),
            long_paragraphs,
        }
    }

    fn has_cart_keyword(&self) -> bool {
        CART_RE.is_match(&self.source)
    }

    /// Distinct cart signals, with separators ignored so `add-to-cart` and
    /// "add to cart" are the same signal.
    fn cart_signals(&self) -> usize {
        CART_RE
            .find_iter(&self.source)
            .map(|m| {
                m.as_str()
                    .chars()
                    .filter(char::is_ascii_alphabetic)
                    .collect::<String>()
            })
            .collect::<HashSet<_>>()
            .len()
    }

    fn price_tokens(&self) -> usize {
        PRICE_RE.find_iter(&self.text).count()
    }
}

/// Classify one page.
pub fn classify(doc: &PageDocument, url: &str) -> ClassificationResult {
    let signals = PageSignals::new(doc);

    let scores_by_type: IndexMap<WebsiteType, u32> = WebsiteType::SCORED
        .iter()
        .map(|website_type| {
            let score = match website_type {
                WebsiteType::Ecommerce => ecommerce_score(&signals),
                WebsiteType::ContentStartup => content_startup_score(&signals),
                WebsiteType::SimpleLanding => simple_landing_score(&signals),
                WebsiteType::PortfolioBrochure => portfolio_score(&signals),
                WebsiteType::Unknown => 0,
            };
            (*website_type, score)
        })
        .collect();

    let result = select_winner(scores_by_type, &signals);
    debug!(
        url = %url,
        website_type = %result.website_type,
        score = result.score,
        confidence = ?result.confidence,
        "Classified page"
    );
    result
}

/// Highest score wins, earlier entries in [`WebsiteType::SCORED`] on ties.
fn select_winner(
    scores_by_type: IndexMap<WebsiteType, u32>,
    signals: &PageSignals<'_>,
) -> ClassificationResult {
    let (mut winner, mut best) = (WebsiteType::Ecommerce, 0);
    for (website_type, score) in &scores_by_type {
        if *score > best {
            winner = *website_type;
            best = *score;
        }
    }

    if best >= MIN_SIGNAL_SCORE {
        return ClassificationResult {
            website_type: winner,
            confidence: Confidence::from_score(best),
            score: best,
            scores_by_type,
        };
    }

    let fallback = if signals.has_cart_keyword() || signals.price_tokens() > 0 {
        WebsiteType::Ecommerce
    } else if signals.long_paragraphs > 3 {
        WebsiteType::ContentStartup
    } else {
        WebsiteType::SimpleLanding
    };

    ClassificationResult {
        website_type: fallback,
        confidence: Confidence::Low,
        score: scores_by_type.get(&fallback).copied().unwrap_or(0),
        scores_by_type,
    }
}

fn ecommerce_score(signals: &PageSignals<'_>) -> u32 {
    let mut score = 0;

    for family in PLATFORM_FAMILIES {
        if family.iter().any(|marker| signals.source.contains(marker)) {
            score += 25;
        }
    }

    score += 10 * signals.cart_signals() as u32;

    let selector_hits = PRODUCT_SELECTORS
        .iter()
        .filter(|css| signals.doc.count(css) > 0)
        .count() as u32;
    score += 8 * selector_hits;

    if signals.doc.count(r#"[class*="product"]"#) > 3 {
        score += 5;
    }

    let prices = signals.price_tokens();
    if prices > 5 {
        score += 15;
    } else if prices > 2 {
        score += 8;
    }

    score
}

fn content_startup_score(signals: &PageSignals<'_>) -> u32 {
    let mut score = 0;

    let nav_text = signals
        .doc
        .select("nav a, header a")
        .into_iter()
        .map(|a| element_text(a).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let nav_words: Vec<&str> = nav_text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let coverage = NAV_TERMS
        .iter()
        .filter(|term| nav_words.contains(term))
        .count();
    if coverage >= 4 {
        score += 25;
    } else if coverage >= 2 {
        score += 15;
    }

    let phrases = STARTUP_PHRASES
        .iter()
        .filter(|p| signals.text.contains(*p))
        .count() as u32;
    score += 5 * phrases;

    let headings: Vec<String> = signals
        .doc
        .select("h1, h2, h3")
        .into_iter()
        .map(|h| element_text(h).to_lowercase())
        .collect();
    let feature_headings = FEATURE_HEADING_PHRASES
        .iter()
        .filter(|phrase| headings.iter().any(|h| h.contains(*phrase)))
        .count() as u32;
    score += 8 * feature_headings;

    if signals.long_paragraphs > 5 {
        score += 15;
    } else if signals.long_paragraphs > 2 {
        score += 8;
    }

    score
}

fn simple_landing_score(signals: &PageSignals<'_>) -> u32 {
    let mut score = 0;

    let markers = LANDING_MARKERS
        .iter()
        .filter(|m| signals.source.contains(*m))
        .count() as u32;
    score += 10 * markers;

    let nav_links = signals.doc.select("nav a, header a");
    let in_page = nav_links
        .iter()
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with('#') && href.len() > 1)
        .count();
    if !nav_links.is_empty() && in_page > 3 && in_page as f64 / nav_links.len() as f64 > 0.5 {
        score += 20;
    }

    let cta_matches = signals
        .doc
        .select("a, button")
        .into_iter()
        .map(|el| element_text(el).to_lowercase())
        .filter(|text| CTA_KEYWORDS.iter().any(|k| text.contains(k)))
        .count();
    if cta_matches > 3 && signals.long_paragraphs < 3 {
        score += 15;
    }

    let sections = signals.doc.count(r#"section, [class*="section"]"#);
    if (2..=5).contains(&sections) && signals.long_paragraphs < 5 {
        score += 10;
    }

    score
}

fn portfolio_score(signals: &PageSignals<'_>) -> u32 {
    let mut score = 0;

    let portfolio_hits = PORTFOLIO_TERMS
        .iter()
        .filter(|t| signals.text.contains(*t))
        .count() as u32;
    score += 15 * portfolio_hits;

    if signals.doc.count("img") > 10 && signals.text.chars().count() < 3000 {
        score += 12;
    }

    let agency_hits = AGENCY_TERMS
        .iter()
        .filter(|t| signals.text.contains(*t))
        .count() as u32;
    score += 5 * agency_hits;

    score
}
