//! Website classification types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The kind of site a page belongs to. Steers extraction depth and whether
/// secondary pages are crawled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    Ecommerce,
    ContentStartup,
    SimpleLanding,
    PortfolioBrochure,
    Unknown,
}

impl WebsiteType {
    /// Scored types in tie-break priority order: on equal scores the earlier
    /// entry wins.
    pub const SCORED: [WebsiteType; 4] = [
        WebsiteType::Ecommerce,
        WebsiteType::ContentStartup,
        WebsiteType::SimpleLanding,
        WebsiteType::PortfolioBrochure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebsiteType::Ecommerce => "ecommerce",
            WebsiteType::ContentStartup => "content_startup",
            WebsiteType::SimpleLanding => "simple_landing",
            WebsiteType::PortfolioBrochure => "portfolio_brochure",
            WebsiteType::Unknown => "unknown",
        }
    }

    /// Types whose company information is spread across several pages.
    pub fn crawls_secondary_pages(&self) -> bool {
        matches!(
            self,
            WebsiteType::ContentStartup
                | WebsiteType::SimpleLanding
                | WebsiteType::PortfolioBrochure
        )
    }
}

impl std::fmt::Display for WebsiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the classifier is about the winning type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_score(score: u32) -> Self {
        if score >= 40 {
            Confidence::High
        } else if score >= 25 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Outcome of classifying one page.
///
/// `score` always equals `scores_by_type[website_type]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub website_type: WebsiteType,
    pub confidence: Confidence,
    pub score: u32,
    pub scores_by_type: IndexMap<WebsiteType, u32>,
}

impl ClassificationResult {
    /// Residual result used when no page could be classified.
    pub fn unknown() -> Self {
        Self {
            website_type: WebsiteType::Unknown,
            confidence: Confidence::Low,
            score: 0,
            scores_by_type: WebsiteType::SCORED.iter().map(|t| (*t, 0)).collect(),
        }
    }
}
