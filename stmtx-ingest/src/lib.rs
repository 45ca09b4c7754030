//! stmtx-ingest: statement text extraction, line grammars and layout detection.

pub mod amount;
pub mod dispatch;
pub mod extract;
pub mod forex;
pub mod lines;
pub mod parsers;
pub mod pipeline;

pub use amount::normalize_amount;
pub use dispatch::{FormatDispatcher, ParseOutcome};
pub use extract::{Document, ExtractError, Extractor, PdfToTextExtractor, PlainTextExtractor, TextExtractor};
pub use forex::{ForexSplit, extract_forex};
pub use lines::{PageText, TextFragment, assemble_lines};
pub use parsers::{LayoutGrammar, NewLayout, OldLayout};
pub use pipeline::{Conversion, process_document};
