//! Completeness scoring.

use crate::types::classification::WebsiteType;
use crate::types::profile::CompletenessScore;
use crate::types::record::{EcommerceData, ExtractionRecord};

pub const MAX_SCORE: u32 = 100;

/// Score how much structured signal `record` carries, on a 0-100 scale.
///
/// `needs_enrichment` is set when the score is below `min_content_score`.
pub fn score_completeness(
    record: &ExtractionRecord,
    website_type: WebsiteType,
    ecommerce: Option<&EcommerceData>,
    min_content_score: u32,
) -> CompletenessScore {
    let mut score = 0;

    if !record.company_name.is_empty() {
        score += 10;
    }
    if record.description.chars().count() > 30 {
        score += 10;
    }
    if record.hero_content.is_present() {
        score += 5;
    }
    if record.raw_text.chars().count() > 500 {
        score += 10;
    }

    score += match website_type {
        WebsiteType::Ecommerce => ecommerce_rubric(record, ecommerce),
        WebsiteType::ContentStartup => content_startup_rubric(record),
        WebsiteType::SimpleLanding => simple_landing_rubric(record),
        WebsiteType::PortfolioBrochure => portfolio_rubric(record),
        WebsiteType::Unknown => unknown_rubric(record),
    };

    let score = score.min(MAX_SCORE);
    CompletenessScore {
        score,
        needs_enrichment: score < min_content_score,
    }
}

fn ecommerce_rubric(record: &ExtractionRecord, ecommerce: Option<&EcommerceData>) -> u32 {
    let mut score = 0;
    if let Some(data) = ecommerce {
        if !data.products.is_empty() {
            score += 20;
        }
        if data.products.len() > 5 {
            score += 10;
        }
        if !data.categories.is_empty() {
            score += 15;
        }
        if data.store_features.any() {
            score += 10;
        }
    }
    if !record.pricing.is_empty() {
        score += 10;
    }
    score
}

fn content_startup_rubric(record: &ExtractionRecord) -> u32 {
    let mut score = 0;
    if !record.features.is_empty() {
        score += 15;
    }
    if record.features.len() > 3 {
        score += 10;
    }
    if !record.team.is_empty() {
        score += 15;
    }
    if !record.metrics.is_empty() {
        score += 15;
    }
    if !record.pricing.is_empty() {
        score += 10;
    }
    score
}

fn simple_landing_rubric(record: &ExtractionRecord) -> u32 {
    let mut score = 20;
    if !record.ctas.is_empty() {
        score += 15;
    }
    if record.hero_content.has_headline() {
        score += 15;
    }
    if !record.features.is_empty() {
        score += 10;
    }
    score
}

fn portfolio_rubric(record: &ExtractionRecord) -> u32 {
    let mut score = 15;
    if !record.features.is_empty() {
        score += 15;
    }
    if record.contact.is_present() {
        score += 15;
    }
    if record.image_alts.len() > 3 {
        score += 10;
    }
    score
}

fn unknown_rubric(record: &ExtractionRecord) -> u32 {
    let mut score = 0;
    if !record.features.is_empty() {
        score += 15;
    }
    if !record.pricing.is_empty() {
        score += 10;
    }
    if !record.team.is_empty() {
        score += 10;
    }
    if !record.metrics.is_empty() {
        score += 10;
    }
    score
}
