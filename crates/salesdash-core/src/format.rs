//! Display formatting for metric values

use std::fmt;

use serde::Serialize;

/// Currency symbol for sales amounts
pub const CURRENCY_SYMBOL: &str = "₹";

/// A metric value tagged with how it should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Metric {
    /// Sales amount, shown as `₹1,234.50`
    Currency(f64),
    /// Record count, shown as `1,234`
    Count(usize),
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Currency(amount) => write!(f, "{}", currency(*amount)),
            Self::Count(n) => write!(f, "{}", group_thousands(&n.to_string())),
        }
    }
}

/// Format an amount as currency with two decimals and thousands separators
pub fn currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!(
        "{}{}{}.{}",
        sign,
        CURRENCY_SYMBOL,
        group_thousands(whole),
        fraction
    )
}

/// Insert `,` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_format() {
        assert_eq!(Metric::Currency(150.0).to_string(), "₹150.00");
        assert_eq!(Metric::Currency(0.0).to_string(), "₹0.00");
        assert_eq!(Metric::Currency(1234567.891).to_string(), "₹1,234,567.89");
        assert_eq!(Metric::Currency(999.999).to_string(), "₹1,000.00");
        assert_eq!(currency(-12.5), "-₹12.50");
    }

    #[test]
    fn test_count_format() {
        assert_eq!(Metric::Count(0).to_string(), "0");
        assert_eq!(Metric::Count(999).to_string(), "999");
        assert_eq!(Metric::Count(1000).to_string(), "1,000");
        assert_eq!(Metric::Count(128975).to_string(), "128,975");
    }
}
