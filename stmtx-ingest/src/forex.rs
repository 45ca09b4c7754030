//! Trailing foreign-currency token: `... MERCHANT USD 12.50`

use regex::Regex;
use std::sync::OnceLock;

use stmtx_core::BASE_CURRENCY;

use crate::amount::normalize_amount;

fn forex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u:\b)(?P<currency>[A-Z]{3})(?-u:\b)\s+(?P<amount>[0-9,]+(?:\.[0-9]{1,2})?)\s*$")
            .expect("forex regex")
    })
}

/// A description with its forex token split off
#[derive(Debug, Clone, PartialEq)]
pub struct ForexSplit<'a> {
    pub description: &'a str,
    pub currency: &'a str,
    pub forex_amount: Option<f64>,
}

/// Split a trailing `XXX 1,234.56` token off `fragment`.
///
/// Without a match the fragment comes back untouched with the base currency.
pub fn extract_forex(fragment: &str) -> ForexSplit<'_> {
    match forex_re().captures(fragment) {
        Some(caps) => {
            let start = caps.get(0).map_or(fragment.len(), |m| m.start());
            ForexSplit {
                description: fragment[..start].trim(),
                currency: caps.name("currency").map_or(BASE_CURRENCY, |m| m.as_str()),
                forex_amount: caps.name("amount").and_then(|m| normalize_amount(m.as_str())),
            }
        }
        None => ForexSplit {
            description: fragment,
            currency: BASE_CURRENCY,
            forex_amount: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_trailing_token() {
        let split = extract_forex("NETFLIX.COM LOS GATOS USD 15.49  ");
        assert_eq!(split.description, "NETFLIX.COM LOS GATOS");
        assert_eq!(split.currency, "USD");
        assert_eq!(split.forex_amount, Some(15.49));
    }

    #[test]
    fn test_grouped_forex_amount() {
        let split = extract_forex("HOTEL BOOKING EUR 1,250.00");
        assert_eq!(split.currency, "EUR");
        assert_eq!(split.forex_amount, Some(1250.0));
    }

    #[test]
    fn test_no_match_keeps_fragment() {
        let split = extract_forex("SWIGGY BANGALORE");
        assert_eq!(split.description, "SWIGGY BANGALORE");
        assert_eq!(split.currency, "INR");
        assert_eq!(split.forex_amount, None);
    }

    #[test]
    fn test_code_must_be_a_standalone_word() {
        // "XUSD" is not a three-letter code
        let split = extract_forex("PAYMENT XUSD 10.00");
        assert_eq!(split.currency, "INR");
        assert_eq!(split.description, "PAYMENT XUSD 10.00");
    }

    #[test]
    fn test_lowercase_code_is_ignored() {
        assert_eq!(extract_forex("refund usd 10.00").forex_amount, None);
    }

    #[test]
    fn test_ascii_word_boundaries_and_digits() {
        let split = extract_forex("CAFÉUSD 4.20");
        assert_eq!(split.description, "CAFÉ");
        assert_eq!(split.currency, "USD");
        assert_eq!(split.forex_amount, Some(4.2));

        let split = extract_forex("SHOP USD १०.००");
        assert_eq!(split.description, "SHOP USD १०.००");
        assert_eq!(split.forex_amount, None);
    }
}
