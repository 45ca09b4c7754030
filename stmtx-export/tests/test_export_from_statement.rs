use stmtx_core::Layout;
use stmtx_export::{Paginator, encode_csv};
use stmtx_ingest::FormatDispatcher;

fn lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim().to_string()).collect()
}

/// Old-layout statement through detection and into CSV: no time column, forex split out.
#[test]
fn test_old_layout_statement_to_csv() {
    let text = r#"
Domestic Transactions
02/01/2024 SWIGGY "INSTAMART" BANGALORE 1,250.00
05/01/2024 PAYMENT RECEIVED - THANK YOU 20,000.00 Cr
International Transactions
07/01/2024 SPOTIFY STOCKHOLM USD 10.99 915.42
"#;

    let outcome = FormatDispatcher::default().dispatch(&lines(text));
    let layout = outcome.layout().unwrap();
    assert_eq!(layout, Layout::Old);

    let csv = encode_csv(outcome.transactions(), layout).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[1],
        r#""02/01/2024","INR","SWIGGY ""INSTAMART"" BANGALORE","","","1250","Dr""#
    );
    assert_eq!(
        rows[2],
        r#""05/01/2024","INR","PAYMENT RECEIVED - THANK YOU","","","20000","Cr""#
    );
    assert_eq!(
        rows[3],
        r#""07/01/2024","USD","SPOTIFY STOCKHOLM","10.99","83.30","915.42","Dr""#
    );
}

#[test]
fn test_new_layout_statement_to_csv() {
    let text = r#"
12/03/2024 | 14:05 AMAZON PAY INDIA C 1,299.00
13/03/2024 | 09:12 REFUND FLIPKART + C 450.00
"#;

    let outcome = FormatDispatcher::default().dispatch(&lines(text));
    let layout = outcome.layout().unwrap();
    assert_eq!(layout, Layout::New);

    let csv = encode_csv(outcome.transactions(), layout).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0].split(',').nth(1), Some("\"time\""));
    assert_eq!(
        rows[2],
        r#""13/03/2024","09:12","INR","REFUND FLIPKART","","","450","Cr""#
    );
}

/// 45 parsed rows preview as three pages; the last holds rows 41-45.
#[test]
fn test_preview_pages_over_parsed_rows() {
    let text: String = (1..=45)
        .map(|i| format!("{:02}/03/2024 | 10:00 ROW{i} C {i}.00\n", (i % 28) + 1))
        .collect();

    let outcome = FormatDispatcher::default().dispatch(&lines(&text));
    assert_eq!(outcome.len(), 45);

    let pager = Paginator::new(20).unwrap();
    let page = pager.page(outcome.transactions(), 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!((page.first_row, page.last_row), (41, 45));
    assert_eq!(page.rows[0].description, "ROW41");
    assert_eq!(pager.page(outcome.transactions(), 4).number, 3);
}
