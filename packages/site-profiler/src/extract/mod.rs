//! Default HTML field extraction.
//!
//! [`HtmlFieldExtractor`] pulls organization fields out of a parsed page with
//! CSS selectors and the regexes in [`patterns`]. Every list it produces is
//! deduplicated in first-seen order and capped.

pub mod ecommerce;
pub mod fields;
pub mod patterns;

use crate::document::PageDocument;
use crate::traits::extractor::FieldExtractor;
use crate::types::record::{EcommerceData, ExtractionRecord};

pub use ecommerce::{extract_ecommerce, parse_price};
pub use fields::{company_name, extract_record, MAX_RAW_TEXT_CHARS};

/// Selector and regex based extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFieldExtractor;

impl HtmlFieldExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for HtmlFieldExtractor {
    fn extract(&self, doc: &PageDocument, url: &str) -> ExtractionRecord {
        extract_record(doc, url)
    }

    fn extract_ecommerce(&self, doc: &PageDocument, _url: &str) -> EcommerceData {
        extract_ecommerce(doc)
    }
}

/// Push `value` unless already present or `items` is full.
pub(crate) fn push_unique(items: &mut Vec<String>, value: String, max: usize) {
    if items.len() < max && !items.contains(&value) {
        items.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_caps_and_dedups() {
        let mut items = Vec::new();
        for value in ["a", "b", "a", "c", "d"] {
            push_unique(&mut items, value.to_string(), 3);
        }
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extractor_trait_object() {
        let extractor: &dyn FieldExtractor = &HtmlFieldExtractor::new();
        let doc = PageDocument::parse(r#"<title>Acme | Rockets</title><h1>Go up</h1>"#);
        let record = extractor.extract(&doc, "https://acme.io");
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.hero_content.headline.as_deref(), Some("Go up"));
    }
}
