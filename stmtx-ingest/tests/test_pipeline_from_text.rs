use std::io::Write;

use stmtx_core::{Layout, TxnType};
use stmtx_ingest::{Document, ParseOutcome, PlainTextExtractor, process_document};

fn write_statement(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

/// Two pages of an old-layout card statement, international rows on page 2.
#[tokio::test]
async fn test_old_layout_statement_across_pages() {
    let file = write_statement(
        "CARD STATEMENT\nDomestic Transactions\n02/01/2024 SWIGGY BANGALORE 1,250.00\n\
05/01/2024 PAYMENT RECEIVED - THANK YOU 20,000.00 Cr\n\u{c}\
International Transactions\n07/01/2024 SPOTIFY STOCKHOLM USD 10.99 915.42\nEnd of statement\n",
    );

    let conversion = process_document(&PlainTextExtractor, Document::from_path(file.path()), None, None)
        .await
        .unwrap();

    assert_eq!(conversion.outcome.layout(), Some(Layout::Old));
    let txns = conversion.outcome.transactions();
    assert_eq!(txns.len(), 3);
    assert_eq!(txns[1].txn_type, TxnType::Cr);
    assert_eq!(txns[2].currency, "USD");
    assert_eq!(txns[2].forex_rate.as_deref(), Some("83.30"));
}

#[tokio::test]
async fn test_new_layout_statement_is_detected() {
    let file = write_statement(
        "Date | Time Description Amount\n\
12/03/2024 | 14:05 AMAZON PAY INDIA C 1,299.00\n\
15/03/2024 | 22:40 STEAM GAMES USD 19.99 C 1,702.35\n",
    );

    let conversion = process_document(&PlainTextExtractor, Document::from_path(file.path()), None, None)
        .await
        .unwrap();

    assert_eq!(conversion.outcome.layout(), Some(Layout::New));
    let txns = conversion.outcome.transactions();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[1].forex_rate.as_deref(), Some("85.1601"));
}

#[tokio::test]
async fn test_unknown_layout_reports_no_transactions() {
    let file = write_statement("Welcome to your e-statement\nNothing to see here\n");

    let conversion = process_document(&PlainTextExtractor, Document::from_path(file.path()), None, None)
        .await
        .unwrap();

    assert_eq!(conversion.outcome, ParseOutcome::NoTransactions);
}

#[tokio::test]
async fn test_missing_file_is_an_open_error() {
    let err = process_document(
        &PlainTextExtractor,
        Document::from_path("/nonexistent/statement.txt"),
        None,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, stmtx_ingest::ExtractError::Open { .. }));
}
