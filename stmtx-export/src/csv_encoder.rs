//! Quoted CSV rendering of parsed statement rows.
//!
//! Header then one record per row, every cell quoted:
//!   "date","time","currency","description","forex_amount","forex_rate","amount","type"
//!   "12/03/2024","14:05","INR","AMAZON PAY INDIA","","","1299","Dr"

use anyhow::{Context, Result};
use std::path::Path;

use stmtx_core::{Layout, Transaction};

/// Render `rows` with the column set of `layout`.
pub fn encode_csv(rows: &[Transaction], layout: Layout) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let columns = layout.columns();
    wtr.write_record(columns.iter().map(|c| c.name()))?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| row.field(*c)))?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).context("csv output is not UTF-8")
}

/// Write the encoded rows to `path`.
pub fn write_csv(path: impl AsRef<Path>, rows: &[Transaction], layout: Layout) -> Result<()> {
    let path = path.as_ref();
    let csv = encode_csv(rows, layout)?;
    std::fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Download name for a source file: `statement.pdf` becomes `statement.csv`.
pub fn csv_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "statement".to_string());
    format!("{stem}.csv")
}
