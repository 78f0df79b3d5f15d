//! Organization field extraction from a single page.

use indexmap::IndexMap;
use serde_json::Value;

use super::patterns::{
    BILLING_PERIOD_RE, COPYRIGHT_RE, CTA_KEYWORDS, EMAIL_RE, METRIC_PATTERNS,
    NON_HANDLE_SEGMENTS, PERSON_NAME_RE, PHONE_RE, PRICE_RE, SOCIAL_PATTERNS,
};
use super::push_unique;
use crate::document::{
    class_or_id_contains, element_text, has_ancestor, select_within, truncate_chars, PageDocument,
};
use crate::types::record::{
    ContactInfo, ExtractionRecord, FooterInfo, HeroContent, PricingEntry, PricingPlan,
};

pub const MAX_RAW_TEXT_CHARS: usize = 5000;
const MAX_NAV_LABELS: usize = 20;
const MAX_HEADINGS: usize = 25;
const MAX_CTAS: usize = 10;
const MAX_PRICING: usize = 10;
const MAX_FEATURES: usize = 20;
const MAX_TEAM: usize = 10;
const MAX_IMAGE_ALTS: usize = 20;
const MAX_PRODUCT_NAMES: usize = 20;

const TITLE_SEPARATORS: &[&str] = &["|", " - ", " – ", " — ", ": "];
const ORGANIZATION_TYPES: &[&str] = &["Organization", "Corporation", "LocalBusiness", "Store"];
const TEAM_MARKERS: &[&str] = &["team", "founder", "leadership", "people"];
/// Capitalised pairs that look like names but are section chrome.
const NAME_STOPWORDS: &[&str] = &[
    "Our", "The", "Meet", "About", "Join", "Read", "Learn", "Get", "Contact", "Privacy", "Terms",
    "All", "View", "See", "Sign", "Book",
];

/// Extract every organization field from `doc`.
pub fn extract_record(doc: &PageDocument, url: &str) -> ExtractionRecord {
    ExtractionRecord {
        company_name: company_name(doc, url),
        title: doc.first_text("title").unwrap_or_default(),
        description: description(doc),
        hero_content: hero_content(doc),
        navigation_labels: navigation_labels(doc),
        headings: headings(doc),
        ctas: ctas(doc),
        pricing: pricing(doc),
        features: features(doc),
        team: team(doc),
        metrics: metrics(doc),
        contact: contact(doc),
        social_links: social_links(doc),
        footer_info: footer_info(doc),
        image_alts: image_alts(doc),
        product_names: product_names(doc),
        raw_text: truncate_chars(
            &doc.visible_text(&["nav", "footer", "header"]),
            MAX_RAW_TEXT_CHARS,
        ),
    }
}

/// JSON-LD organization name, then `og:site_name`, then the title's first
/// segment, then the domain.
pub fn company_name(doc: &PageDocument, url: &str) -> String {
    json_ld_name(doc)
        .or_else(|| doc.meta_content("property", "og:site_name"))
        .or_else(|| doc.first_text("title").and_then(|t| name_from_title(&t)))
        .unwrap_or_else(|| name_from_domain(url))
}

fn json_ld_name(doc: &PageDocument) -> Option<String> {
    let mut website_name = None;

    for script in doc.select(r#"script[type="application/ld+json"]"#) {
        let raw: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };

        for item in json_ld_items(&value) {
            let Some(name) = item.get("name").and_then(Value::as_str).map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            if json_ld_type_is(item, ORGANIZATION_TYPES) {
                return Some(name.to_string());
            }
            if website_name.is_none() && json_ld_type_is(item, &["WebSite"]) {
                website_name = Some(name.to_string());
            }
        }
    }

    website_name
}

fn json_ld_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(json_ld_items).collect(),
        Value::Object(map) => {
            let mut items = vec![value];
            if let Some(graph) = map.get("@graph") {
                items.extend(json_ld_items(graph));
            }
            items
        }
        _ => Vec::new(),
    }
}

fn json_ld_type_is(item: &Value, types: &[&str]) -> bool {
    match item.get("@type") {
        Some(Value::String(t)) => types.contains(&t.as_str()),
        Some(Value::Array(ts)) => ts
            .iter()
            .filter_map(Value::as_str)
            .any(|t| types.contains(&t)),
        _ => false,
    }
}

fn name_from_title(title: &str) -> Option<String> {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    let name = title[..cut].trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn name_from_domain(url: &str) -> String {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    let label = host
        .trim_start_matches("www.")
        .split('.')
        .next()
        .unwrap_or_default();

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn description(doc: &PageDocument) -> String {
    doc.meta_content("name", "description")
        .or_else(|| doc.meta_content("property", "og:description"))
        .unwrap_or_default()
}

fn hero_content(doc: &PageDocument) -> HeroContent {
    let container = doc
        .select(r#"[class*="hero"], [id*="hero"]"#)
        .into_iter()
        .next();

    let (headline, subheadline) = match container {
        Some(hero) => (
            first_text_within(hero, "h1, h2"),
            first_text_within(hero, "p"),
        ),
        None => (None, None),
    };

    HeroContent {
        headline: headline.or_else(|| doc.first_text("h1")),
        subheadline: subheadline.or_else(|| doc.first_text("h1 + p, h1 ~ p")),
    }
}

fn first_text_within(element: scraper::ElementRef<'_>, css: &str) -> Option<String> {
    select_within(element, css)
        .into_iter()
        .map(element_text)
        .find(|t| !t.is_empty())
}

fn navigation_labels(doc: &PageDocument) -> Vec<String> {
    let mut labels = Vec::new();
    for el in doc.select("nav a, header a") {
        let text = element_text(el);
        if (1..=40).contains(&text.chars().count()) {
            push_unique(&mut labels, text, MAX_NAV_LABELS);
        }
    }
    labels
}

fn headings(doc: &PageDocument) -> Vec<String> {
    let mut headings = Vec::new();
    for el in doc.select("h1, h2, h3") {
        let text = element_text(el);
        if !text.is_empty() && text.chars().count() <= 200 {
            push_unique(&mut headings, text, MAX_HEADINGS);
        }
    }
    headings
}

fn ctas(doc: &PageDocument) -> Vec<String> {
    let mut ctas = Vec::new();
    for el in doc.select("a, button") {
        let text = element_text(el);
        if !(2..=40).contains(&text.chars().count()) {
            continue;
        }
        let lower = text.to_lowercase();
        let is_cta = CTA_KEYWORDS.iter().any(|k| lower.contains(k))
            || ["btn", "button", "cta"]
                .iter()
                .any(|marker| class_or_id_contains(el, marker));
        if is_cta {
            push_unique(&mut ctas, text, MAX_CTAS);
        }
    }
    ctas
}

fn pricing(doc: &PageDocument) -> Vec<PricingEntry> {
    let cards = doc.select(
        r#"[class*="pricing-card"], [class*="price-card"], [class*="pricing-plan"], [class*="plan-card"], [class*="pricing-tier"]"#,
    );

    let mut plans: Vec<PricingEntry> = Vec::new();
    for card in cards {
        let Some(name) = first_text_within(card, "h2, h3, h4") else {
            continue;
        };
        let text = element_text(card);
        let plan = PricingEntry::Plan(PricingPlan {
            name,
            price: PRICE_RE.find(&text).map(|m| m.as_str().to_string()),
            period: BILLING_PERIOD_RE
                .find(&text)
                .map(|m| m.as_str().trim().to_string()),
        });
        let duplicate = plans.iter().any(|p| match (p, &plan) {
            (PricingEntry::Plan(a), PricingEntry::Plan(b)) => a.name == b.name,
            _ => false,
        });
        if !duplicate && plans.len() < MAX_PRICING {
            plans.push(plan);
        }
    }

    if !plans.is_empty() {
        return plans;
    }

    let text = doc.visible_text(&[]);
    let mut prices = Vec::new();
    for m in PRICE_RE.find_iter(&text) {
        push_unique(&mut prices, m.as_str().to_string(), MAX_PRICING);
    }
    prices.into_iter().map(PricingEntry::Text).collect()
}

fn features(doc: &PageDocument) -> Vec<String> {
    let mut features = Vec::new();

    let lists = doc
        .select("ul, ol")
        .into_iter()
        .filter(|list| !has_ancestor(*list, &["nav", "header", "footer"]))
        .take(5);

    for list in lists {
        for item in select_within(list, "li").into_iter().take(10) {
            let text = element_text(item);
            let len = text.chars().count();
            if len > 20 && len < 200 {
                push_unique(&mut features, text, MAX_FEATURES);
            }
        }
    }

    for el in doc.select(r#"[class*="feature"] h3, [class*="feature"] h4"#) {
        let text = element_text(el);
        if (3..=100).contains(&text.chars().count()) {
            push_unique(&mut features, text, MAX_FEATURES);
        }
    }

    features
}

fn team(doc: &PageDocument) -> Vec<String> {
    let containers = doc
        .select("section, div")
        .into_iter()
        .filter(|el| TEAM_MARKERS.iter().any(|m| class_or_id_contains(*el, m)))
        .take(3);

    let mut team = Vec::new();
    for container in containers {
        let text = element_text(container);
        let names = PERSON_NAME_RE
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .filter(|name| {
                let first = name.split_whitespace().next().unwrap_or_default();
                !NAME_STOPWORDS.contains(&first)
            })
            .take(5);
        for name in names {
            push_unique(&mut team, name, MAX_TEAM);
        }
    }
    team
}

fn metrics(doc: &PageDocument) -> IndexMap<String, String> {
    let text = doc.visible_text(&[]);
    METRIC_PATTERNS
        .iter()
        .filter_map(|(key, re)| {
            re.captures(&text)
                .and_then(|c| c.get(1))
                .map(|m| (key.to_string(), m.as_str().to_string()))
        })
        .collect()
}

fn contact(doc: &PageDocument) -> ContactInfo {
    let email = link_target(doc, "mailto:").or_else(|| {
        EMAIL_RE
            .find(&doc.visible_text(&[]))
            .map(|m| m.as_str().to_string())
    });

    let phone = link_target(doc, "tel:").or_else(|| {
        let text = doc.visible_text(&[]);
        PHONE_RE
            .find_iter(&text)
            .map(|m| m.as_str().trim().to_string())
            .find(|p| p.chars().filter(char::is_ascii_digit).count() >= 7)
    });

    ContactInfo { email, phone }
}

/// Target of the first `<a href="{scheme}…">`, minus scheme and query.
fn link_target(doc: &PageDocument, scheme: &str) -> Option<String> {
    doc.select(&format!(r#"a[href^="{scheme}"]"#))
        .into_iter()
        .filter_map(|el| el.value().attr("href"))
        .map(|href| {
            let target = &href[scheme.len()..];
            target.split('?').next().unwrap_or_default().trim().to_string()
        })
        .find(|t| !t.is_empty())
}

fn social_links(doc: &PageDocument) -> IndexMap<String, String> {
    let html = doc.source();
    SOCIAL_PATTERNS
        .iter()
        .filter_map(|(platform, re)| {
            re.captures_iter(html)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .find(|handle| !NON_HANDLE_SEGMENTS.contains(&handle.to_lowercase().as_str()))
                .map(|handle| (platform.to_string(), handle))
        })
        .collect()
}

fn footer_info(doc: &PageDocument) -> FooterInfo {
    let Some(footer) = doc.select("footer").into_iter().next() else {
        return FooterInfo::default();
    };

    let text = element_text(footer);
    let copyright = COPYRIGHT_RE
        .find(&text)
        .map(|m| m.as_str().trim().to_string());

    let mut links = Vec::new();
    for a in select_within(footer, "a") {
        let label = element_text(a);
        if !label.is_empty() {
            push_unique(&mut links, label, 15);
        }
    }

    FooterInfo { copyright, links }
}

fn image_alts(doc: &PageDocument) -> Vec<String> {
    let mut alts = Vec::new();
    for img in doc.select("img[alt]") {
        if let Some(alt) = img.value().attr("alt").map(str::trim) {
            if !alt.is_empty() {
                push_unique(&mut alts, alt.to_string(), MAX_IMAGE_ALTS);
            }
        }
    }
    alts
}

fn product_names(doc: &PageDocument) -> Vec<String> {
    let mut names = Vec::new();
    for el in doc.select(
        r#"[class*="product-title"], [class*="product-name"], [class*="product__title"]"#,
    ) {
        let text = element_text(el);
        if (2..=120).contains(&text.chars().count()) {
            push_unique(&mut names, text, MAX_PRODUCT_NAMES);
        }
    }
    names
}
