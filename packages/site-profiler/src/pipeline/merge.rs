//! Folding secondary page records into the primary record.

use crate::document::truncate_chars;
use crate::types::record::{ExtractionRecord, MergedRecord, PricingEntry};

pub const MAX_MERGED_FEATURES: usize = 30;
pub const MAX_MERGED_TEAM: usize = 15;
pub const MAX_MERGED_HEADINGS: usize = 25;
pub const MAX_MERGED_TEXT_CHARS: usize = 8000;
pub const SECONDARY_TEXT_CHARS: usize = 2000;

/// Company names this short are treated as placeholders a secondary page may
/// upgrade.
const PLACEHOLDER_NAME_CHARS: usize = 3;

/// One successfully extracted secondary page.
#[derive(Debug, Clone)]
pub struct SecondaryPage {
    pub url: String,
    pub record: ExtractionRecord,
}

/// Fold `secondaries` into `primary` in the order given.
///
/// With no secondaries the primary record is returned untouched.
pub fn merge(
    primary: ExtractionRecord,
    secondaries: Vec<SecondaryPage>,
    secondary_text_chars: usize,
) -> MergedRecord {
    if secondaries.is_empty() {
        return MergedRecord::single(primary);
    }

    let mut merged = primary;
    let mut additional_pages = Vec::with_capacity(secondaries.len());

    for SecondaryPage { url, record } in secondaries {
        let current_len = merged.company_name.chars().count();
        if current_len > 0
            && current_len <= PLACEHOLDER_NAME_CHARS
            && record.company_name.chars().count() > current_len
        {
            merged.company_name = record.company_name;
        }

        union_case_insensitive(&mut merged.features, record.features);
        union_case_insensitive(&mut merged.team, record.team);
        union_exact(&mut merged.headings, record.headings);
        union_pricing(&mut merged.pricing, record.pricing);

        for (key, value) in record.metrics {
            merged.metrics.entry(key).or_insert(value);
        }

        if !record.raw_text.is_empty() {
            merged.raw_text.push_str(&format!("\n\n--- Page: {url} ---\n"));
            merged
                .raw_text
                .push_str(&truncate_chars(&record.raw_text, secondary_text_chars));
        }

        additional_pages.push(url);
    }

    merged.features.truncate(MAX_MERGED_FEATURES);
    merged.team.truncate(MAX_MERGED_TEAM);
    merged.headings.truncate(MAX_MERGED_HEADINGS);
    merged.raw_text = truncate_chars(&merged.raw_text, MAX_MERGED_TEXT_CHARS);

    MergedRecord {
        record: merged,
        pages_scraped: 1 + additional_pages.len(),
        additional_pages,
    }
}

fn union_exact(into: &mut Vec<String>, from: Vec<String>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

fn union_case_insensitive(into: &mut Vec<String>, from: Vec<String>) {
    for item in from {
        let lower = item.to_lowercase();
        if !into.iter().any(|existing| existing.to_lowercase() == lower) {
            into.push(item);
        }
    }
}

/// Plans dedup by name, bare tokens by exact value.
fn union_pricing(into: &mut Vec<PricingEntry>, from: Vec<PricingEntry>) {
    for entry in from {
        let duplicate = into.iter().any(|existing| match (existing, &entry) {
            (PricingEntry::Plan(a), PricingEntry::Plan(b)) => a.name == b.name,
            (PricingEntry::Text(a), PricingEntry::Text(b)) => a == b,
            _ => false,
        });
        if !duplicate {
            into.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::PricingPlan;

    fn record(name: &str) -> ExtractionRecord {
        ExtractionRecord {
            company_name: name.into(),
            ..Default::default()
        }
    }

    fn page(url: &str, record: ExtractionRecord) -> SecondaryPage {
        SecondaryPage {
            url: url.into(),
            record,
        }
    }

    #[test]
    fn test_no_secondaries_returns_primary() {
        let mut primary = record("Acme");
        primary.features = (0..40).map(|i| format!("feature {i}")).collect();
        let merged = merge(primary.clone(), Vec::new(), SECONDARY_TEXT_CHARS);

        assert_eq!(merged.record, primary);
        assert_eq!(merged.pages_scraped, 1);
        assert!(merged.additional_pages.is_empty());
    }

    #[test]
    fn test_short_name_upgraded_by_first_longer_secondary() {
        let merged = merge(
            record("AC"),
            vec![
                page("https://acme.io/about", record("Acme Corp")),
                page("https://acme.io/team", record("Acme Corporation Inc")),
            ],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(merged.record.company_name, "Acme Corp");
        assert_eq!(merged.pages_scraped, 3);
        assert_eq!(
            merged.additional_pages,
            vec!["https://acme.io/about", "https://acme.io/team"]
        );
    }

    #[test]
    fn test_long_or_empty_name_never_replaced() {
        let merged = merge(
            record("Acme"),
            vec![page("https://acme.io/about", record("Acme Corporation"))],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(merged.record.company_name, "Acme");

        let merged = merge(
            record(""),
            vec![page("https://acme.io/about", record("Acme Corporation"))],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(merged.record.company_name, "");
    }

    #[test]
    fn test_list_unions() {
        let mut primary = record("Acme");
        primary.features = vec!["Fast sync".into()];
        primary.team = vec!["Jane Doe".into()];
        primary.headings = vec!["About".into()];

        let mut secondary = record("Acme");
        secondary.features = vec!["fast SYNC".into(), "Offline mode".into()];
        secondary.team = vec!["JANE DOE".into(), "John Smith".into()];
        secondary.headings = vec!["about".into(), "About".into()];

        let merged = merge(
            primary,
            vec![page("https://acme.io/about", secondary)],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(merged.record.features, vec!["Fast sync", "Offline mode"]);
        assert_eq!(merged.record.team, vec!["Jane Doe", "John Smith"]);
        assert_eq!(merged.record.headings, vec!["About", "about"]);
    }

    #[test]
    fn test_pricing_dedup_by_plan_name_and_token() {
        let mut primary = record("Acme");
        primary.pricing = vec![
            PricingEntry::plan("Pro", Some("$29".into())),
            PricingEntry::text("$9"),
        ];
        let mut secondary = record("Acme");
        secondary.pricing = vec![
            PricingEntry::Plan(PricingPlan {
                name: "Pro".into(),
                price: Some("$290".into()),
                period: Some("per year".into()),
            }),
            PricingEntry::plan("Team", None),
            PricingEntry::text("$9"),
            PricingEntry::text("$19"),
        ];

        let merged = merge(
            primary,
            vec![page("https://acme.io/pricing", secondary)],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(
            merged.record.pricing,
            vec![
                PricingEntry::plan("Pro", Some("$29".into())),
                PricingEntry::text("$9"),
                PricingEntry::plan("Team", None),
                PricingEntry::text("$19"),
            ]
        );
    }

    #[test]
    fn test_metrics_never_overwrite_primary() {
        let mut primary = record("Acme");
        primary.metrics.insert("users".into(), "10".into());
        let mut secondary = record("Acme");
        secondary.metrics.insert("users".into(), "99".into());
        secondary.metrics.insert("countries".into(), "40".into());

        let merged = merge(
            primary,
            vec![page("https://acme.io/about", secondary)],
            SECONDARY_TEXT_CHARS,
        );
        assert_eq!(merged.record.metrics["users"], "10");
        assert_eq!(merged.record.metrics["countries"], "40");
    }

    #[test]
    fn test_text_appended_with_marker_and_capped() {
        let mut primary = record("Acme");
        primary.raw_text = "Home".into();
        let mut secondary = record("Acme");
        secondary.raw_text = "x".repeat(5000);

        let merged = merge(
            primary,
            vec![page("https://acme.io/about", secondary)],
            SECONDARY_TEXT_CHARS,
        );
        let expected_prefix = "Home\n\n--- Page: https://acme.io/about ---\n";
        assert!(merged.record.raw_text.starts_with(expected_prefix));
        assert_eq!(
            merged.record.raw_text.chars().count(),
            expected_prefix.chars().count() + SECONDARY_TEXT_CHARS
        );
    }

    #[test]
    fn test_final_caps_apply() {
        let primary = record("Acme");
        let secondaries = (0..4)
            .map(|p| {
                let mut rec = record("Acme");
                rec.features = (0..10).map(|i| format!("feature {p}-{i}")).collect();
                rec.team = (0..5).map(|i| format!("Person {p}{i}")).collect();
                rec.headings = (0..10).map(|i| format!("Heading {p}-{i}")).collect();
                rec.raw_text = "y".repeat(SECONDARY_TEXT_CHARS * 2);
                page(&format!("https://acme.io/p{p}"), rec)
            })
            .collect();

        let merged = merge(primary, secondaries, SECONDARY_TEXT_CHARS);
        assert_eq!(merged.record.features.len(), MAX_MERGED_FEATURES);
        assert_eq!(merged.record.team.len(), MAX_MERGED_TEAM);
        assert_eq!(merged.record.headings.len(), MAX_MERGED_HEADINGS);
        assert_eq!(merged.record.raw_text.chars().count(), MAX_MERGED_TEXT_CHARS);
        assert_eq!(merged.pages_scraped, 5);
    }
}
