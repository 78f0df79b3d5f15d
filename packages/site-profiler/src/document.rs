//! Parsed page documents.
//!
//! `PageDocument` wraps a `scraper::Html` tree together with the raw source.
//! The tree is not `Send`, so documents are built and consumed inside
//! synchronous steps and never held across an `.await`.

use scraper::{ElementRef, Html, Selector};

/// Tags whose text never counts as visible page content.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// An immutable parsed page.
pub struct PageDocument {
    html: Html,
    source: String,
}

impl PageDocument {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            html: Html::parse_document(&source),
            source,
        }
    }

    /// Size of the fetched source in bytes.
    pub fn byte_len(&self) -> usize {
        self.source.len()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All elements matching a CSS selector. Invalid selectors match nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => {
                tracing::debug!(selector = css, "Invalid CSS selector");
                Vec::new()
            }
        }
    }

    pub fn count(&self, css: &str) -> usize {
        self.select(css).len()
    }

    /// Normalized text of the first element matching `css`, if non-empty.
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .map(element_text)
            .find(|t| !t.is_empty())
    }

    /// Trimmed `content` of the first `<meta>` whose `attr` equals `value`.
    pub fn meta_content(&self, attr: &str, value: &str) -> Option<String> {
        self.select(&format!(r#"meta[{attr}="{value}"]"#))
            .into_iter()
            .filter_map(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
    }

    /// Visible body text with whitespace collapsed, skipping non-content tags
    /// and any extra tags in `skip`.
    pub fn visible_text(&self, skip: &[&str]) -> String {
        let root = self
            .select("body")
            .into_iter()
            .next()
            .unwrap_or_else(|| self.html.root_element());

        let mut out = String::new();
        collect_text(root, skip, &mut out);
        normalize_whitespace(&out)
    }
}

fn collect_text(element: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if NON_CONTENT_TAGS.contains(&name) || skip.contains(&name) {
                continue;
            }
            collect_text(child_el, skip, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

/// Text content of one element with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &[], &mut out);
    normalize_whitespace(&out)
}

/// Descendants of `element` matching a CSS selector.
pub fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Whether any ancestor of `element` is one of `tags`.
pub fn has_ancestor(element: ElementRef<'_>, tags: &[&str]) -> bool {
    let mut current = element.parent();
    while let Some(node) = current {
        if let Some(el) = ElementRef::wrap(node) {
            if tags.contains(&el.value().name()) {
                return true;
            }
        }
        current = node.parent();
    }
    false
}

/// Whether an element's `class` or `id` contains `needle` (case-insensitive).
pub fn class_or_id_contains(element: ElementRef<'_>, needle: &str) -> bool {
    let value = element.value();
    let needle = needle.to_lowercase();
    value
        .attr("class")
        .is_some_and(|c| c.to_lowercase().contains(&needle))
        || value
            .attr("id")
            .is_some_and(|i| i.to_lowercase().contains(&needle))
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
