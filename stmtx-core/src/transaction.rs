//! Transaction record produced by the statement line parsers

use serde::{Deserialize, Serialize};

use crate::layout::Column;

/// Currency assumed when a line carries no foreign-currency token.
pub const BASE_CURRENCY: &str = "INR";

/// Credit/debit marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnType {
    #[serde(rename = "Cr")]
    Cr,
    #[default]
    #[serde(rename = "Dr")]
    Dr,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Cr => "Cr",
            TxnType::Dr => "Dr",
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statement row.
///
/// `None` is the empty sentinel: it renders as an empty cell, never as `0` or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// `dd/mm/yyyy`, exactly as printed on the statement
    pub date: String,
    /// `hh:mm` or empty (old layout never has one)
    pub time: String,
    pub description: String,
    /// Amount in the base currency
    pub amount: Option<f64>,
    /// Three-letter code, `INR` unless a forex token was found
    pub currency: String,
    /// Amount in the original currency
    pub forex_amount: Option<f64>,
    /// `amount / forex_amount`, already rounded for display
    pub forex_rate: Option<String>,
    #[serde(rename = "type")]
    pub txn_type: TxnType,
}

impl Transaction {
    /// A debit in the base currency with no amount; parsers fill in the rest.
    pub fn new(date: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: String::new(),
            description: description.into(),
            amount: None,
            currency: BASE_CURRENCY.to_string(),
            forex_amount: None,
            forex_rate: None,
            txn_type: TxnType::Dr,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.txn_type == TxnType::Cr
    }

    pub fn is_forex(&self) -> bool {
        self.forex_amount.is_some()
    }

    /// Text of a single cell, empty for missing values
    pub fn field(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.clone(),
            Column::Time => self.time.clone(),
            Column::Currency => self.currency.clone(),
            Column::Description => self.description.clone(),
            Column::ForexAmount => format_number(self.forex_amount),
            Column::ForexRate => self.forex_rate.clone().unwrap_or_default(),
            Column::Amount => format_number(self.amount),
            Column::Type => self.txn_type.to_string(),
        }
    }
}

/// Shortest round-trip rendering: `123456.5`, `1000`, empty for `None`.
pub fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// `amount / forex_amount` to `precision` digits, or `None` when either side is
/// missing or zero, or the quotient is not finite.
pub fn forex_rate(amount: Option<f64>, forex_amount: Option<f64>, precision: usize) -> Option<String> {
    let (amount, forex_amount) = (amount?, forex_amount?);
    if amount == 0.0 || forex_amount == 0.0 {
        return None;
    }
    let rate = amount / forex_amount;
    if !rate.is_finite() {
        return None;
    }
    if is_decimal_tie(rate, precision) {
        Some(round_tie_up(rate, precision))
    } else {
        Some(format!("{rate:.precision$}"))
    }
}

/// True when `value` sits exactly halfway between two `precision`-digit decimals.
///
/// With `value = m * 2^e` and `m` odd, `value * 10^p = m * 5^p * 2^(e + p)`, which
/// is an integer plus one half exactly when `e + p == -1`.
fn is_decimal_tie(value: f64, precision: usize) -> bool {
    let bits = value.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exp += i64::from(zeros);
    mantissa & 1 == 1 && exp + precision as i64 == -1
}

/// Round a tie away from zero. The value has exactly `precision + 1` decimals,
/// the last one a `5`, so formatting it to that width is exact.
fn round_tie_up(value: f64, precision: usize) -> String {
    let exact = format!("{:.*}", precision + 1, value.abs());
    let mut digits: Vec<u8> = exact.as_bytes()[..exact.len() - 1].to_vec();
    if digits.last() == Some(&b'.') {
        digits.pop();
    }
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        match *d {
            b'.' => continue,
            b'9' => *d = b'0',
            _ => {
                *d += 1;
                carry = false;
                break;
            }
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}", String::from_utf8_lossy(&digits))
}
