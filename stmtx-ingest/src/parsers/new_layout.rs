//! New (pipe-delimited) statement layout
//!
//! Expected text rows after extraction:
//!   12/03/2024 | 14:05 AMAZON PAY INDIA C 1,299.00
//!   13/03/2024 | 09:12 REFUND FLIPKART + C 450.00
//!   15/03/2024 | 22:40 STEAM GAMES USD 19.99 C 1,702.35

use regex::Regex;
use std::sync::OnceLock;

use stmtx_core::{Layout, Transaction, TxnType, forex_rate};

use super::LayoutGrammar;
use crate::amount::normalize_amount;
use crate::forex::extract_forex;

/// Digits kept on the computed forex rate
pub const RATE_PRECISION: usize = 4;

fn date_time_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<date>[0-9]{2}/[0-9]{2}/[0-9]{4})\s*\|\s*(?P<time>[0-9]{2}:[0-9]{2})\s*(?P<rest>.*)$")
            .expect("date/time prefix regex")
    })
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{2}/[0-9]{2}/[0-9]{4}").expect("date regex"))
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{2}:[0-9]{2}").expect("time regex"))
}

/// Date, time and the text after them
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineHead<'a> {
    date: &'a str,
    time: &'a str,
    rest: &'a str,
}

type HeadMatcher = for<'a> fn(&'a str) -> Option<LineHead<'a>>;

/// Tried in order; the first hit wins.
const HEAD_MATCHERS: &[HeadMatcher] = &[match_date_time_prefix, match_date_anywhere];

/// `dd/mm/yyyy | hh:mm rest`
fn match_date_time_prefix(line: &str) -> Option<LineHead<'_>> {
    let caps = date_time_prefix_re().captures(line)?;
    Some(LineHead {
        date: caps.name("date")?.as_str(),
        time: caps.name("time")?.as_str(),
        rest: caps.name("rest").map_or("", |m| m.as_str()),
    })
}

/// A date somewhere in the line; the time, if any, may be anywhere too.
fn match_date_anywhere(line: &str) -> Option<LineHead<'_>> {
    let date = date_re().find(line)?;
    Some(LineHead {
        date: date.as_str(),
        time: time_re().find(line).map_or("", |m| m.as_str()),
        rest: line[date.end()..].trim(),
    })
}

/// Amount markers, searched from the end of the remainder. `+ C` is a credit.
const AMOUNT_MARKERS: &[(&str, TxnType)] = &[("+ C", TxnType::Cr), (" C", TxnType::Dr)];

/// Split `rest` into description, amount token and credit/debit.
fn split_amount(rest: &str) -> (&str, &str, TxnType) {
    AMOUNT_MARKERS
        .iter()
        .find_map(|(marker, txn_type)| {
            rest.rfind(marker).map(|idx| {
                (
                    rest[..idx].trim(),
                    rest[idx + marker.len()..].trim(),
                    *txn_type,
                )
            })
        })
        .unwrap_or((rest.trim(), "", TxnType::Dr))
}

/// Parse one line; blank or undated lines yield `None`.
pub fn parse_line(line: &str) -> Option<Transaction> {
    if line.trim().is_empty() {
        return None;
    }
    let head = HEAD_MATCHERS.iter().find_map(|m| m(line))?;

    let (remainder, amount_token, txn_type) = split_amount(head.rest);
    let amount = normalize_amount(amount_token);
    let forex = extract_forex(remainder);

    Some(Transaction {
        date: head.date.to_string(),
        time: head.time.to_string(),
        description: forex.description.to_string(),
        amount,
        currency: forex.currency.to_string(),
        forex_amount: forex.forex_amount,
        forex_rate: forex_rate(amount, forex.forex_amount, RATE_PRECISION),
        txn_type,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NewLayout;

impl LayoutGrammar for NewLayout {
    fn layout(&self) -> Layout {
        Layout::New
    }

    fn parse(&self, lines: &[String]) -> Vec<Transaction> {
        lines.iter().filter_map(|line| parse_line(line)).collect()
    }
}
