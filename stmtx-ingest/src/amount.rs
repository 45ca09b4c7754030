//! Amount normalization for statement tokens such as `1,23,456.50 Cr` or `C 2,499.00`

use regex::Regex;
use std::sync::OnceLock;

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9,]+(?:\.[0-9]{1,2})?").expect("amount regex"))
}

/// First grouped number in `token`, with grouping commas removed.
///
/// Indian (`1,23,456`) and western (`123,456`) grouping both work because commas
/// are stripped rather than validated. Returns `None` when the token holds no
/// digits or the match is only separators.
pub fn normalize_amount(token: &str) -> Option<f64> {
    let m = amount_re().find(token)?;
    m.as_str().replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping_with_marker() {
        assert_eq!(normalize_amount("1,23,456.50 Cr"), Some(123456.50));
    }

    #[test]
    fn test_currency_prefix_and_plain_numbers() {
        assert_eq!(normalize_amount("C 2,499.00"), Some(2499.0));
        assert_eq!(normalize_amount("750"), Some(750.0));
        assert_eq!(normalize_amount("12.5"), Some(12.5));
    }

    #[test]
    fn test_takes_first_number_only() {
        assert_eq!(normalize_amount("1,000.00 (500.00)"), Some(1000.0));
    }

    #[test]
    fn test_fraction_capped_at_two_digits() {
        assert_eq!(normalize_amount("12.345"), Some(12.34));
    }

    #[test]
    fn test_missing_or_unparseable() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("Cr"), None);
        assert_eq!(normalize_amount(", ,"), None);
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(normalize_amount("१२५०"), None);
        assert_eq!(normalize_amount("१२ 75.00"), Some(75.0));
    }
}
