//! One document in, one parse outcome out.

use tracing::debug;

use stmtx_core::Layout;

use crate::dispatch::{FormatDispatcher, ParseOutcome};
use crate::extract::{Document, ExtractError, TextExtractor};
use crate::lines::assemble_lines;

/// A parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: Document,
    pub outcome: ParseOutcome,
}

/// Extract, assemble lines, then detect the layout (or use `layout` when forced).
pub async fn process_document<E: TextExtractor>(
    extractor: &E,
    document: Document,
    password: Option<&str>,
    layout: Option<Layout>,
) -> Result<Conversion, ExtractError> {
    let pages = extractor.extract(&document, password).await?;
    let lines = assemble_lines(&pages);
    debug!(
        document = %document.name,
        pages = pages.len(),
        lines = lines.len(),
        "extracted statement text"
    );

    let outcome = FormatDispatcher::for_layout(layout).dispatch(&lines);
    Ok(Conversion { document, outcome })
}
