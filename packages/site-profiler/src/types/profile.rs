//! Final profile and request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{ClassificationResult, WebsiteType};
use super::record::{EcommerceData, MergedRecord};

/// 0-100 estimate of how much structured signal was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessScore {
    pub score: u32,
    pub needs_enrichment: bool,
}

/// Everything the pipeline learned about one URL. This is the cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub url: String,
    pub final_url: String,
    #[serde(flatten)]
    pub merged: MergedRecord,
    pub website_type: WebsiteType,
    pub classification: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecommerce: Option<EcommerceData>,
    pub js_rendered: bool,
    pub completeness_score: u32,
    pub needs_enrichment: bool,
    pub scraped_at: DateTime<Utc>,
}

/// Input of the primary operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "skipCache")]
    pub skip_cache: bool,
}

/// A profile plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct ProfileOutcome {
    pub profile: SiteProfile,
    pub cached: bool,
}

/// Successful response of the primary operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: SiteProfile,
    pub cached: bool,
    pub timing_ms: u64,
}

impl ScrapeResponse {
    pub fn new(outcome: ProfileOutcome, timing_ms: u64) -> Self {
        Self {
            success: true,
            data: outcome.profile,
            cached: outcome.cached,
            timing_ms,
        }
    }
}

/// Failure response of the primary operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
