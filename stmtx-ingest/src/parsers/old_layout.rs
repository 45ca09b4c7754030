//! Old (sectioned) statement layout
//!
//! Expected extracted-text section:
//!   Domestic Transactions
//!   02/01/2024 SWIGGY BANGALORE 1,250.00
//!   05/01/2024 PAYMENT RECEIVED - THANK YOU 20,000.00 Cr
//!   International Transactions
//!   07/01/2024 SPOTIFY STOCKHOLM USD 10.99 915.42

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

use stmtx_core::{Layout, Section, Transaction, TxnType, forex_rate};

use super::LayoutGrammar;
use crate::amount::normalize_amount;
use crate::forex::extract_forex;

/// Digits kept on the computed forex rate. Differs from the new layout's four.
pub const RATE_PRECISION: usize = 2;

fn dated_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<date>[0-9]{2}/[0-9]{2}/[0-9]{4})\s+(?P<rest>.*)$").expect("dated line regex")
    })
}

fn trailing_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<amount>[0-9,]+(?:\.[0-9]{1,2})?)\s*(?P<credit>(?i:cr))?\s*$")
            .expect("trailing amount regex")
    })
}

/// Split the trailing `1,234.56 [Cr]` off `rest`: (description, amount token, type).
pub fn split_trailing_amount(rest: &str) -> Option<(&str, &str, TxnType)> {
    let caps = trailing_amount_re().captures(rest)?;
    let start = caps.get(0)?.start();
    let txn_type = if caps.name("credit").is_some() {
        TxnType::Cr
    } else {
        TxnType::Dr
    };
    Some((rest[..start].trim(), caps.name("amount")?.as_str(), txn_type))
}

/// Parse a transaction row inside a known section.
pub fn parse_line(line: &str, section: Section) -> Option<Transaction> {
    let caps = dated_line_re().captures(line)?;
    let date = caps.name("date")?.as_str();
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();

    let (remainder, amount_token, txn_type) = split_trailing_amount(rest)?;
    let amount = normalize_amount(amount_token);

    let mut txn = Transaction::new(date, remainder);
    txn.amount = amount;
    txn.txn_type = txn_type;

    if section.allows_forex() {
        let forex = extract_forex(remainder);
        txn.description = forex.description.to_string();
        txn.currency = forex.currency.to_string();
        txn.forex_amount = forex.forex_amount;
        txn.forex_rate = forex_rate(amount, forex.forex_amount, RATE_PRECISION);
    }

    Some(txn)
}

/// One fold step: header lines switch the section, rows before any header are dropped.
pub fn step(section: Section, line: &str) -> (Section, Option<Transaction>) {
    if let Some(next) = Section::from_header(line) {
        trace!(?next, "section header");
        return (next, None);
    }
    if section == Section::None {
        return (section, None);
    }
    (section, parse_line(line, section))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OldLayout;

impl LayoutGrammar for OldLayout {
    fn layout(&self) -> Layout {
        Layout::Old
    }

    fn parse(&self, lines: &[String]) -> Vec<Transaction> {
        let (_, rows) = lines.iter().fold(
            (Section::None, Vec::new()),
            |(section, mut rows), line| {
                let (next, row) = step(section, line);
                rows.extend(row);
                (next, rows)
            },
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.trim().to_string()).collect()
    }

    #[test]
    fn test_trailing_amount_with_credit_marker() {
        let (desc, token, txn_type) = split_trailing_amount("1,23,456.50 Cr").unwrap();
        assert_eq!(desc, "");
        assert_eq!(normalize_amount(token), Some(123456.50));
        assert_eq!(txn_type, TxnType::Cr);
    }

    #[test]
    fn test_credit_marker_any_case() {
        let (desc, _, txn_type) = split_trailing_amount("NEFT SALARY 85,000.00 CR").unwrap();
        assert_eq!(desc, "NEFT SALARY");
        assert_eq!(txn_type, TxnType::Cr);
    }

    #[test]
    fn test_parse_sections() {
        let text = r#"
Statement for card ending 4321
02/01/2024 IGNORED BEFORE HEADER 99.00
Domestic Transactions
02/01/2024 SWIGGY BANGALORE 1,250.00
05/01/2024 PAYMENT RECEIVED - THANK YOU 20,000.00 Cr
International Transactions
07/01/2024 SPOTIFY STOCKHOLM USD 10.99 915.42
"#;

        let txns = OldLayout.parse(&lines(text));
        assert_eq!(txns.len(), 3);

        assert_eq!(txns[0].date, "02/01/2024");
        assert_eq!(txns[0].description, "SWIGGY BANGALORE");
        assert_eq!(txns[0].amount, Some(1250.0));
        assert_eq!(txns[0].txn_type, TxnType::Dr);
        assert_eq!(txns[0].time, "");

        assert_eq!(txns[1].amount, Some(20000.0));
        assert_eq!(txns[1].txn_type, TxnType::Cr);

        assert_eq!(txns[2].description, "SPOTIFY STOCKHOLM");
        assert_eq!(txns[2].currency, "USD");
        assert_eq!(txns[2].forex_amount, Some(10.99));
        assert_eq!(txns[2].forex_rate.as_deref(), Some("83.30"));
    }

    #[test]
    fn test_domestic_section_never_extracts_forex() {
        let txn = parse_line("07/01/2024 TRANSFER REF ABC 10.99 915.42", Section::Domestic).unwrap();
        assert_eq!(txn.description, "TRANSFER REF ABC 10.99");
        assert_eq!(txn.currency, "INR");
        assert_eq!(txn.forex_amount, None);
        assert_eq!(txn.forex_rate, None);
    }

    #[test]
    fn test_nothing_before_first_header() {
        let text = r#"
02/01/2024 SWIGGY BANGALORE 1,250.00
05/01/2024 PAYMENT RECEIVED 20,000.00 Cr
"#;
        assert!(OldLayout.parse(&lines(text)).is_empty());
        assert_eq!(step(Section::None, "02/01/2024 SWIGGY 1,250.00"), (Section::None, None));
    }

    #[test]
    fn test_header_line_yields_no_row() {
        let (next, row) = step(Section::Domestic, "01/01/2024 International Transactions 100.00");
        assert_eq!(next, Section::International);
        assert_eq!(row, None);
    }

    #[test]
    fn test_lines_without_amount_or_date_are_skipped() {
        assert_eq!(parse_line("02/01/2024 OPENING BALANCE", Section::Domestic), None);
        assert_eq!(parse_line("SWIGGY BANGALORE 1,250.00", Section::Domestic), None);
        assert_eq!(parse_line("", Section::International), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_dates_or_amounts() {
        assert_eq!(parse_line("०२/०१/२०२४ SWIGGY १२५०", Section::Domestic), None);
        assert_eq!(parse_line("02/01/2024 SWIGGY १२५०", Section::Domestic), None);
    }
}
