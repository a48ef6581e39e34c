use std::sync::LazyLock;

use regex::Regex;

/// What the text after a label has to look like for a rule to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// First run of digits and commas anywhere after the label.
    Amount,
    /// Word characters, spaces and parentheses, on one line.
    Phrase,
    /// A standalone `Yes` or `No` token anywhere after the label.
    YesNo,
    /// First integer anywhere after the label.
    Integer,
    /// Digits followed by a percent sign.
    Percent,
    /// Remainder of the line, skipping separators (and line breaks) first.
    /// A `/`-glued translation of the label (`Type of Bid/बिड का प्रकार`) is
    /// skipped too.
    RestOfLine,
    /// The line N lines below the one holding the label.
    LineBelow(usize),
}

/// One named field and the labels that announce it in a tender document.
///
/// Spaces inside a label match any whitespace run, so labels wrapped over
/// two lines still hit. `...` inside a label matches arbitrary text.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub field: &'static str,
    pub labels: &'static [&'static str],
    pub shape: ValueShape,
}

pub const EMD_FIELD: &str = "emd_amount";

pub const RULES: &[ExtractionRule] = &[
    ExtractionRule {
        field: EMD_FIELD,
        labels: &["EMD Amount", "Earnest Money Deposit", "EMD"],
        shape: ValueShape::Amount,
    },
    ExtractionRule {
        field: "past_experience_years",
        labels: &["Years of Past Experience Required"],
        shape: ValueShape::Phrase,
    },
    ExtractionRule {
        field: "mse_exemption",
        labels: &["MSE Exemption for ... Turnover"],
        shape: ValueShape::YesNo,
    },
    ExtractionRule {
        field: "startup_exemption",
        labels: &["Startup Exemption for ... Turnover"],
        shape: ValueShape::YesNo,
    },
    ExtractionRule {
        field: "documents_required",
        labels: &["Document required from seller"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "show_docs_to_bidders",
        labels: &["show documents uploaded by bidders to all bidders"],
        shape: ValueShape::YesNo,
    },
    ExtractionRule {
        field: "min_bids_for_extension",
        labels: &["Minimum number of bids required"],
        shape: ValueShape::Integer,
    },
    ExtractionRule {
        field: "past_performance",
        labels: &["Past Performance"],
        shape: ValueShape::Percent,
    },
    ExtractionRule {
        field: "bid_to_ra_enabled",
        labels: &["Bid to RA enabled"],
        shape: ValueShape::YesNo,
    },
    ExtractionRule {
        field: "ra_qualification_rule",
        labels: &["RA Qualification Rule"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "type_of_bid",
        labels: &["Type of Bid"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "tech_clarification_time",
        labels: &["Time allowed for Technical Clarifications"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "evaluation_method",
        labels: &["Evaluation Method"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "epbg_details",
        labels: &["ePBG Detail", "Advisory Bank"],
        shape: ValueShape::LineBelow(2),
    },
    ExtractionRule {
        field: "beneficiary",
        labels: &["Beneficiary :"],
        shape: ValueShape::RestOfLine,
    },
    ExtractionRule {
        field: "mse_purchase_preference",
        labels: &["MSE Purchase Preference"],
        shape: ValueShape::YesNo,
    },
    ExtractionRule {
        field: "mii_purchase_preference",
        labels: &["MII Purchase Preference"],
        shape: ValueShape::YesNo,
    },
];

/// Non-ASCII words on one line, as in the Hindi label translations.
const GLOSS: &str = r"(?:[^\x00-\x7F\s]+(?:[ \t]+[^\x00-\x7F\s]+)*)?";

pub struct CompiledRule {
    pub rule: &'static ExtractionRule,
    pub regex: Regex,
}

pub static COMPILED: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| CompiledRule {
            rule,
            regex: Regex::new(&rule_pattern(rule)).expect("extraction rule pattern"),
        })
        .collect()
});

pub fn compiled(field: &str) -> Option<&'static CompiledRule> {
    COMPILED.iter().find(|c| c.rule.field == field)
}

/// Builds the full case-insensitive pattern for a rule. Capture group 1 is
/// always the value.
pub fn rule_pattern(rule: &ExtractionRule) -> String {
    let labels: Vec<String> = rule.labels.iter().map(|l| label_pattern(l)).collect();
    let label = format!("(?:{})", labels.join("|"));
    let value = match rule.shape {
        ValueShape::Amount => r"[\s\S]*?(\d[\d,]*)".to_string(),
        ValueShape::Phrase => r"[\s\S]*?([\w(][\w ()]*)".to_string(),
        ValueShape::YesNo => r"[\s\S]*?\b(Yes|No)\b".to_string(),
        ValueShape::Integer => r"[\s\S]*?(\d+)".to_string(),
        ValueShape::Percent => r"[\s\S]*?(\d+(?:\.\d+)?\s*%)".to_string(),
        ValueShape::RestOfLine => format!(r"[ \t]*(?:/[ \t]*{GLOSS})?[\s:\-/]*([^\n]+)"),
        ValueShape::LineBelow(n) => {
            let skipped = n.saturating_sub(1);
            format!(r"[^\n]*(?:\n[^\n]*){{{skipped}}}\n[ \t]*([^\n]+)")
        }
    };
    format!("(?i){label}{value}")
}

fn label_pattern(label: &str) -> String {
    label
        .split("...")
        .map(|piece| {
            let mut out = String::new();
            for word in piece.split_whitespace() {
                if !out.is_empty() {
                    // Punctuation may hug the previous word ("Beneficiary:").
                    if word.chars().all(|c| c.is_ascii_punctuation()) {
                        out.push_str(r"\s*");
                    } else {
                        out.push_str(r"\s+");
                    }
                }
                out.push_str(&regex::escape(word));
            }
            out
        })
        .collect::<Vec<_>>()
        .join(r"[\s\S]*?")
}
