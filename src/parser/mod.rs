pub mod rules;

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use rules::{CompiledRule, COMPILED, EMD_FIELD};

/// Value reported for a field whose label or value is absent.
pub const NOT_FOUND: &str = "Not found";

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*\r?\n\s*").unwrap());

/// Fields pulled out of one tender document, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    fields: Vec<(&'static str, Option<String>)>,
}

impl ExtractedFields {
    /// Value for `field`, or the sentinel when nothing matched.
    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_deref().unwrap_or(NOT_FOUND))
    }

    pub fn found(&self) -> usize {
        self.fields.iter().filter(|(_, v)| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (*name, value.as_deref().unwrap_or(NOT_FOUND)))
    }
}

impl Serialize for ExtractedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Runs every rule against the document.
pub fn extract_details(text: &str) -> ExtractedFields {
    let fields = COMPILED
        .iter()
        .map(|rule| (rule.rule.field, apply(rule, text)))
        .collect();
    ExtractedFields { fields }
}

/// Runs only the EMD rule.
pub fn extract_emd(text: &str) -> Option<String> {
    rules::compiled(EMD_FIELD).and_then(|rule| apply(rule, text))
}

fn apply(rule: &CompiledRule, text: &str) -> Option<String> {
    let caps = rule.regex.captures(text)?;
    let value = collapse_lines(caps.get(1)?.as_str());
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Trims and folds every line break (with its surrounding blanks) into a
/// single space.
pub fn collapse_lines(raw: &str) -> String {
    LINE_BREAKS.replace_all(raw.trim(), " ").into_owned()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn emd_amount_inline() {
        let fields = extract_details("Some header\nEMD Amount: 123,456\nmore");
        assert_eq!(fields.get("emd_amount"), Some("123,456"));
    }

    #[test]
    fn emd_shortcut_matches_full_run() {
        assert_eq!(extract_emd("EMD Amount: 123,456").as_deref(), Some("123,456"));
        assert_eq!(extract_emd("Earnest Money Deposit\n 40,000"), Some("40,000".into()));
        assert_eq!(extract_emd("nothing to see"), None);
    }

    #[test]
    fn empty_document_is_all_sentinels() {
        let fields = extract_details("");
        assert_eq!(fields.iter().count(), 17);
        assert_eq!(fields.found(), 0);
        assert!(fields.iter().all(|(_, v)| v == NOT_FOUND));
    }

    #[test]
    fn missing_label_only_affects_its_field() {
        let fields = extract_details("Bid to RA enabled\nYes\nType of Bid\nSingle Packet Bid");
        assert_eq!(fields.get("bid_to_ra_enabled"), Some("Yes"));
        assert_eq!(fields.get("type_of_bid"), Some("Single Packet Bid"));
        assert_eq!(fields.get("evaluation_method"), Some(NOT_FOUND));
        assert_eq!(fields.get("emd_amount"), Some(NOT_FOUND));
    }

    #[test]
    fn gem_style_document() {
        let f = extract_details(&fixture("gem_bid"));
        assert_eq!(f.get("min_bids_for_extension"), Some("3"));
        assert_eq!(f.get("bid_to_ra_enabled"), Some("No"));
        assert_eq!(f.get("type_of_bid"), Some("Two Packet Bid"));
        assert_eq!(f.get("evaluation_method"), Some("Total value wise evaluation"));
        assert_eq!(f.get("tech_clarification_time"), Some("during technical evaluation"));
        assert_eq!(f.get("past_experience_years"), Some("3 Year (s)"));
        assert_eq!(f.get("mse_exemption"), Some("Yes"));
        assert_eq!(f.get("startup_exemption"), Some("No"));
        assert_eq!(
            f.get("documents_required"),
            Some("Experience Criteria,Bidder Turnover")
        );
        assert_eq!(f.get("past_performance"), Some("30 %"));
        assert_eq!(f.get("emd_amount"), Some("1,50,000"));
        assert_eq!(f.get("show_docs_to_bidders"), Some("Yes"));
        assert_eq!(f.get("epbg_details"), Some("ICICI Bank"));
        assert_eq!(f.get("beneficiary"), Some("Director General, Defence Estates"));
        assert_eq!(f.get("mse_purchase_preference"), Some("Yes"));
        assert_eq!(f.get("mii_purchase_preference"), Some("Yes"));
        assert_eq!(
            f.get("ra_qualification_rule"),
            Some("H1-Highest Priced Bid Elimination")
        );
        assert_eq!(f.found(), 17);
    }

    #[test]
    fn inline_label_translation_is_not_a_value() {
        let f = extract_details(
            "Type of Bid/बिड का प्रकार Two Packet Bid\nEvaluation Method/मूल्यांकन पद्धति Item wise",
        );
        assert_eq!(f.get("type_of_bid"), Some("Two Packet Bid"));
        assert_eq!(f.get("evaluation_method"), Some("Item wise"));
    }

    #[test]
    fn case_insensitive_labels() {
        let f = extract_details("mii purchase preference\nyes");
        assert_eq!(f.get("mii_purchase_preference"), Some("yes"));
    }

    #[test]
    fn collapse_folds_line_breaks() {
        assert_eq!(collapse_lines("  a\n  b \r\n\nc  "), "a b c");
        assert_eq!(collapse_lines("single"), "single");
    }

    #[test]
    fn serializes_in_rule_order() {
        let json = serde_json::to_string(&extract_details("")).unwrap();
        assert!(json.starts_with(r#"{"emd_amount":"Not found","past_experience_years""#));
        assert!(json.ends_with(r#""mii_purchase_preference":"Not found"}"#));
    }
}
