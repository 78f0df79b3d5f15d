//! Extraction records - what one page (or a merged set of pages) says about
//! the organization behind it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Above-the-fold headline block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroContent {
    pub headline: Option<String>,
    pub subheadline: Option<String>,
}

impl HeroContent {
    pub fn is_present(&self) -> bool {
        self.headline.as_deref().is_some_and(|h| !h.is_empty())
            || self.subheadline.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_headline(&self) -> bool {
        self.headline.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// A named pricing tier lifted from a pricing card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    pub price: Option<String>,
    pub period: Option<String>,
}

/// One pricing observation: either a structured plan or a bare price token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PricingEntry {
    Plan(PricingPlan),
    Text(String),
}

impl PricingEntry {
    pub fn text(value: impl Into<String>) -> Self {
        PricingEntry::Text(value.into())
    }

    pub fn plan(name: impl Into<String>, price: Option<String>) -> Self {
        PricingEntry::Plan(PricingPlan {
            name: name.into(),
            price,
            period: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn is_present(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterInfo {
    pub copyright: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Structured fields extracted from a single page. Built once, never mutated
/// afterwards except by the merger folding secondary pages into a copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub hero_content: HeroContent,
    #[serde(default)]
    pub navigation_labels: Vec<String>,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub ctas: Vec<String>,
    #[serde(default)]
    pub pricing: Vec<PricingEntry>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub metrics: IndexMap<String, String>,
    pub contact: ContactInfo,
    #[serde(default)]
    pub social_links: IndexMap<String, String>,
    pub footer_info: FooterInfo,
    #[serde(default)]
    pub image_alts: Vec<String>,
    #[serde(default)]
    pub product_names: Vec<String>,
    pub raw_text: String,
}

/// A primary record with zero or more secondary pages folded in.
///
/// `pages_scraped == 1 + additional_pages.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(flatten)]
    pub record: ExtractionRecord,
    pub pages_scraped: usize,
    pub additional_pages: Vec<String>,
}

impl MergedRecord {
    /// Wrap a record that had no secondary pages.
    pub fn single(record: ExtractionRecord) -> Self {
        Self {
            record,
            pages_scraped: 1,
            additional_pages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFeatures {
    pub has_cart: bool,
    pub has_search: bool,
    pub has_wishlist: bool,
    pub has_reviews: bool,
    pub free_shipping: bool,
}

impl StoreFeatures {
    pub fn any(&self) -> bool {
        self.has_cart || self.has_search || self.has_wishlist || self.has_reviews || self.free_shipping
    }
}

/// Store-specific fields, only present when a page classifies as e-commerce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcommerceData {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub price_range: Option<PriceRange>,
    pub store_features: StoreFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_entries_serialize_untagged() {
        let entries = vec![
            PricingEntry::plan("Pro", Some("$29".into())),
            PricingEntry::text("$9.99"),
        ];
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["name"], "Pro");
        assert_eq!(json[1], "$9.99");
    }

    #[test]
    fn test_merged_record_flattens_fields() {
        let mut record = ExtractionRecord::default();
        record.company_name = "Acme".into();
        let merged = MergedRecord::single(record);
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["company_name"], "Acme");
        assert_eq!(json["pages_scraped"], 1);
        assert!(json["additional_pages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_hero_presence() {
        assert!(!HeroContent::default().is_present());
        let hero = HeroContent {
            headline: None,
            subheadline: Some("Ship faster".into()),
        };
        assert!(hero.is_present());
        assert!(!hero.has_headline());
    }
}
