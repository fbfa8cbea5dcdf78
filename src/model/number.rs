//! Lenient parsing of the numeric columns found in exported sales sheets, and yen formatting.
//!
//! The export writes figures as plain text with comma thousands separators, e.g. `1,234,567`.
//! Parsing never fails: a value that does not start with a number is treated as zero, and a
//! value that merely starts with one keeps its numeric prefix (`"12pcs"` is `12`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Parses a comma-grouped decimal such as `"1,234.50"`. Returns zero when nothing numeric leads
/// the string.
pub fn parse_decimal(s: &str) -> Decimal {
    match NumericPrefix::scan(s, true).normalized() {
        Some(n) => Decimal::from_str(&n).unwrap_or_default(),
        None => Decimal::ZERO,
    }
}

/// Parses a comma-grouped whole number such as `"1,234"`. Any fractional part is dropped
/// (`"2.9"` is `2`). Returns zero when nothing numeric leads the string or it overflows.
pub fn parse_count(s: &str) -> i64 {
    match NumericPrefix::scan(s, false).normalized() {
        Some(n) => n.parse().unwrap_or_default(),
        None => 0,
    }
}

/// Formats a count with comma thousands separators, e.g. `1,234`.
pub fn format_count(value: i64) -> String {
    let digits = format_num::format_num!(",.0f", value.unsigned_abs() as f64);
    if value < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// The leading number of a string once commas are removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct NumericPrefix {
    negative: bool,
    whole: String,
    fraction: String,
}

impl NumericPrefix {
    fn scan(s: &str, allow_fraction: bool) -> Self {
        let mut prefix = NumericPrefix::default();
        let mut chars = s.trim().chars().filter(|&c| c != ',').peekable();
        match chars.peek() {
            Some('-') => {
                prefix.negative = true;
                chars.next();
            }
            Some('+') => {
                chars.next();
            }
            _ => {}
        }

        let mut in_fraction = false;
        for c in chars {
            if c.is_ascii_digit() {
                if in_fraction {
                    prefix.fraction.push(c);
                } else {
                    prefix.whole.push(c);
                }
            } else if c == '.' && !in_fraction {
                if !allow_fraction {
                    break;
                }
                in_fraction = true;
            } else {
                break;
            }
        }
        prefix
    }

    /// Renders the prefix as a plain number string, `None` when there are no digits at all.
    fn normalized(&self) -> Option<String> {
        if self.whole.is_empty() && self.fraction.is_empty() {
            return None;
        }
        let sign = if self.negative { "-" } else { "" };
        let whole = if self.whole.is_empty() {
            "0"
        } else {
            self.whole.as_str()
        };
        if self.fraction.is_empty() {
            Some(format!("{sign}{whole}"))
        } else {
            Some(format!("{sign}{whole}.{}", self.fraction))
        }
    }
}

/// A yen amount for display.
///
/// Yen have no minor unit, so the value is rounded half away from zero when it is displayed.
///
/// ```
/// # use sales_rollup::model::Yen;
/// # use rust_decimal::Decimal;
/// assert_eq!(Yen::new(Decimal::from(1234567)).to_string(), "￥1,234,567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Yen(Decimal);

impl Yen {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Decimal> for Yen {
    fn from(value: Decimal) -> Self {
        Yen::new(value)
    }
}

impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format_num::format_num!(",.0f", rounded.abs().to_f64().unwrap_or_default());
        write!(f, "{sign}￥{digits}")
    }
}

impl Serialize for Yen {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_count_with_commas() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count("1,234,567"), 1234567);
    }

    #[test]
    fn test_parse_count_empty_or_garbage_is_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("   "), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("-"), 0);
    }

    #[test]
    fn test_parse_count_keeps_leading_digits() {
        assert_eq!(parse_count("12pcs"), 12);
        assert_eq!(parse_count("2.9"), 2);
        assert_eq!(parse_count(" 7 "), 7);
    }

    #[test]
    fn test_parse_count_negative() {
        assert_eq!(parse_count("-1,000"), -1000);
        assert_eq!(parse_count("+5"), 5);
    }

    #[test]
    fn test_parse_count_overflow_is_zero() {
        assert_eq!(parse_count("99999999999999999999999"), 0);
    }

    #[test]
    fn test_parse_decimal_with_commas() {
        assert_eq!(parse_decimal("1,000"), dec("1000"));
        assert_eq!(parse_decimal("1,234.56"), dec("1234.56"));
    }

    #[test]
    fn test_parse_decimal_partial_forms() {
        assert_eq!(parse_decimal(".5"), dec("0.5"));
        assert_eq!(parse_decimal("5."), dec("5"));
        assert_eq!(parse_decimal("12.5円"), dec("12.5"));
        assert_eq!(parse_decimal("-3,000.25"), dec("-3000.25"));
    }

    #[test]
    fn test_parse_decimal_garbage_is_zero() {
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("."), Decimal::ZERO);
        assert_eq!(parse_decimal("￥1,000"), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(-1234567), "-1,234,567");
    }

    #[test]
    fn test_yen_display() {
        assert_eq!(Yen::new(dec("0")).to_string(), "￥0");
        assert_eq!(Yen::new(dec("1000")).to_string(), "￥1,000");
        assert_eq!(Yen::new(dec("-2500")).to_string(), "-￥2,500");
    }

    #[test]
    fn test_yen_display_rounds() {
        assert_eq!(Yen::new(dec("1234.5")).to_string(), "￥1,235");
        assert_eq!(Yen::new(dec("1234.49")).to_string(), "￥1,234");
        assert_eq!(Yen::new(dec("-0.4")).to_string(), "￥0");
    }

    #[test]
    fn test_yen_serializes_as_display_string() {
        let json = serde_json::to_string(&Yen::new(dec("1500"))).unwrap();
        assert_eq!(json, "\"￥1,500\"");
    }
}
