//! stmtx-core: transaction record and layout types shared by the parsers, the encoder and the CLI

pub mod layout;
pub mod transaction;

pub use layout::{Column, Layout, Section};
pub use transaction::{BASE_CURRENCY, Transaction, TxnType, forex_rate, format_number};
