//! Display helpers for tender rows. Neither helper fails: malformed input
//! comes back as it was stored.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Renders a closing timestamp as `DD Mon YYYY`.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%d %b %Y").to_string();
    }
    let naive = trimmed.trim_end_matches('Z');
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return dt.format("%d %b %Y").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        return d.format("%d %b %Y").to_string();
    }
    raw.to_string()
}

/// Renders a tender amount in crore / lakh / plain rupees.
///
/// Returns `None` for null, empty or zero amounts, and the original text for
/// strings that are not numbers.
pub fn format_amount(raw: &Value) -> Option<String> {
    let amount = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => return Some(s.to_string()),
            }
        }
        _ => return None,
    };
    if amount == 0.0 {
        return None;
    }
    Some(rupees(amount))
}

fn rupees(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.2} L", amount / LAKH)
    } else {
        format!("₹{}", group_thousands(&format!("{amount:.2}")))
    }
}

fn group_thousands(fixed: &str) -> String {
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac) = digits.split_once('.').unwrap_or((digits, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn crore_lakh_and_plain() {
        assert_eq!(format_amount(&json!(150_000_000)).as_deref(), Some("₹15.00 Cr"));
        assert_eq!(format_amount(&json!(250_000)).as_deref(), Some("₹2.50 L"));
        assert_eq!(format_amount(&json!(500)).as_deref(), Some("₹500.00"));
        assert_eq!(format_amount(&json!(99_999.5)).as_deref(), Some("₹99,999.50"));
        assert_eq!(format_amount(&json!("1234.5")).as_deref(), Some("₹1,234.50"));
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(format_amount(&json!(10_000_000)).as_deref(), Some("₹1.00 Cr"));
        assert_eq!(format_amount(&json!(100_000)).as_deref(), Some("₹1.00 L"));
    }

    #[test]
    fn empty_and_zero_amounts_have_no_display() {
        assert_eq!(format_amount(&Value::Null), None);
        assert_eq!(format_amount(&json!(0)), None);
        assert_eq!(format_amount(&json!("")), None);
        assert_eq!(format_amount(&json!(true)), None);
    }

    #[test]
    fn non_numeric_amount_passes_through() {
        assert_eq!(format_amount(&json!("N/A")).as_deref(), Some("N/A"));
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("1234567.00"), "1,234,567.00");
        assert_eq!(group_thousands("123.40"), "123.40");
        assert_eq!(group_thousands("-4500.00"), "-4,500.00");
    }

    #[test]
    fn dates() {
        assert_eq!(format_date("2024-03-05T10:00:00Z"), "05 Mar 2024");
        assert_eq!(format_date("2024-03-05T10:00:00+05:30"), "05 Mar 2024");
        assert_eq!(format_date("2024-12-31T18:30:00.123"), "31 Dec 2024");
        assert_eq!(format_date("2024-01-09 08:00:00"), "09 Jan 2024");
        assert_eq!(format_date("2024-07-01"), "01 Jul 2024");
    }

    #[test]
    fn malformed_date_is_unchanged() {
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_date(""), "");
    }
}
