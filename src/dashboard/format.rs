//! Display formatting for dashboard values

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Thousands separator style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 12,34,567
    #[default]
    Indian,
    /// 1,234,567
    Western,
}

impl std::str::FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indian" | "en-in" => Ok(Grouping::Indian),
            "western" | "en-us" => Ok(Grouping::Western),
            other => Err(format!("unknown grouping: {}", other)),
        }
    }
}

/// How money is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub grouping: Grouping,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            grouping: Grouping::Indian,
        }
    }
}

impl DisplayOptions {
    /// Currency symbol followed by the value rounded to a whole number
    pub fn currency(&self, value: f64) -> String {
        format!("{}{}", self.currency_symbol, group_digits(round_half_up(value), self.grouping))
    }
}

/// Round to the nearest integer, halves toward positive infinity
pub fn round_half_up(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

/// Whole-number count without separators
pub fn format_count(value: f64) -> String {
    round_half_up(value).to_string()
}

/// Insert thousands separators
pub fn group_digits(value: i64, grouping: Grouping) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, last3) = digits.split_at(digits.len() - 3);
    let group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut parts: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        parts.push(&head[start..end]);
        end = start;
    }
    parts.reverse();

    format!("{}{},{}", sign, parts.join(","), last3)
}

/// Short label for a day key: "Sun, Aug 10", or the key itself when it is
/// not an ISO date.
pub fn day_label(key: &str) -> String {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map(|d| d.format("%a, %b %d").to_string())
        .unwrap_or_else(|_| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits_indian() {
        assert_eq!(group_digits(0, Grouping::Indian), "0");
        assert_eq!(group_digits(999, Grouping::Indian), "999");
        assert_eq!(group_digits(15150, Grouping::Indian), "15,150");
        assert_eq!(group_digits(1234567, Grouping::Indian), "12,34,567");
        assert_eq!(group_digits(-123456, Grouping::Indian), "-1,23,456");
    }

    #[test]
    fn test_group_digits_western() {
        assert_eq!(group_digits(1234567, Grouping::Western), "1,234,567");
        assert_eq!(group_digits(1000, Grouping::Western), "1,000");
    }

    #[test]
    fn test_currency() {
        let inr = DisplayOptions::default();
        assert_eq!(inr.currency(15150.0), "₹15,150");
        assert_eq!(inr.currency(3787.5), "₹3,788");
        assert_eq!(inr.currency(1234567.4), "₹12,34,567");

        let usd = DisplayOptions {
            currency_symbol: "$".to_string(),
            grouping: Grouping::Western,
        };
        assert_eq!(usd.currency(1234567.0), "$1,234,567");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(f64::NAN), 0);
        assert_eq!(format_count(66.6), "67");
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label("2025-08-10"), "Sun, Aug 10");
        assert_eq!(day_label("Week 3"), "Week 3");
    }

    #[test]
    fn test_grouping_from_str() {
        assert_eq!("Indian".parse::<Grouping>().unwrap(), Grouping::Indian);
        assert_eq!("en-US".parse::<Grouping>().unwrap(), Grouping::Western);
        assert!("roman".parse::<Grouping>().is_err());
    }
}
