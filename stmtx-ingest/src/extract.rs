//! Document text extraction boundary.
//!
//! PDFs go through poppler's `pdftotext` in layout mode. We shell out instead of
//! linking a PDF library so encrypted statements behave exactly as they do in
//! poppler, including its password handling.

use regex::Regex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use thiserror::Error;

use crate::lines::{PageText, TextFragment};

/// Page separator in `pdftotext` output
const FORM_FEED: char = '\u{c}';

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Missing or wrong password; the caller may retry with another one.
    #[error("password required to open {0}")]
    PasswordRequired(String),

    #[error("failed to open {name}: {message}")]
    Open { name: String, message: String },

    #[error("`{0}` not found on PATH (install poppler-utils or set extract.pdftotext_command)")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A statement file handed to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name shown to the user and used to name the output
    pub name: String,
    pub path: PathBuf,
}

impl Document {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path: path.to_path_buf(),
        }
    }

    /// Same document under a different display name (shared files keep their original name).
    pub fn named(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        has_extension(&self.name, "pdf")
    }

    pub fn is_text(&self) -> bool {
        has_extension(&self.name, "txt")
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Produces page text for a document.
pub trait TextExtractor {
    fn extract(
        &self,
        doc: &Document,
        password: Option<&str>,
    ) -> impl Future<Output = Result<Vec<PageText>, ExtractError>> + Send;
}

fn column_gap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("column gap regex"))
}

/// Split `pdftotext -layout` output into pages of fragments.
///
/// Layout mode pads columns with runs of spaces; each padded column becomes one
/// fragment and only the last column of a line carries the end-of-line flag.
pub fn layout_text_pages(text: &str) -> Vec<PageText> {
    let mut pages: Vec<&str> = text.split(FORM_FEED).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    pages
        .into_iter()
        .map(|page| {
            let mut fragments = Vec::new();
            for line in page.lines() {
                let columns: Vec<&str> = column_gap_re()
                    .split(line.trim())
                    .filter(|c| !c.is_empty())
                    .collect();
                if columns.is_empty() {
                    fragments.push(TextFragment::new("", true));
                    continue;
                }
                let last = columns.len() - 1;
                for (i, column) in columns.into_iter().enumerate() {
                    fragments.push(TextFragment::new(column, i == last));
                }
            }
            PageText::new(fragments)
        })
        .collect()
}

/// Runs `pdftotext -layout <file> -`
#[derive(Debug, Clone)]
pub struct PdfToTextExtractor {
    command: String,
}

impl Default for PdfToTextExtractor {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl PdfToTextExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf, ExtractError> {
        which::which(&self.command).map_err(|_| ExtractError::Unavailable(self.command.clone()))
    }
}

impl TextExtractor for PdfToTextExtractor {
    async fn extract(&self, doc: &Document, password: Option<&str>) -> Result<Vec<PageText>, ExtractError> {
        let bin = self.resolve()?;

        let mut cmd = tokio::process::Command::new(bin);
        cmd.args(["-layout", "-enc", "UTF-8"]);
        if let Some(pw) = password {
            cmd.arg("-upw").arg(pw);
        }
        cmd.arg(&doc.path).arg("-");

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("Incorrect password") {
                return Err(ExtractError::PasswordRequired(doc.name.clone()));
            }
            return Err(ExtractError::Open {
                name: doc.name.clone(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(layout_text_pages(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Reads text that was already extracted, one line per fragment, pages split on form feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, doc: &Document, _password: Option<&str>) -> Result<Vec<PageText>, ExtractError> {
        let text = tokio::fs::read_to_string(&doc.path)
            .await
            .map_err(|e| ExtractError::Open {
                name: doc.name.clone(),
                message: e.to_string(),
            })?;

        Ok(text
            .split(FORM_FEED)
            .map(|page| {
                PageText::new(page.lines().map(|l| TextFragment::new(l, true)).collect())
            })
            .collect())
    }
}

/// Extractor picked from the document's file name
#[derive(Debug, Clone)]
pub enum Extractor {
    PdfToText(PdfToTextExtractor),
    PlainText(PlainTextExtractor),
}

impl Extractor {
    /// `.txt` files are read as-is, everything else goes through `pdftotext_command`.
    pub fn for_document(doc: &Document, pdftotext_command: &str) -> Self {
        if doc.is_text() {
            Extractor::PlainText(PlainTextExtractor)
        } else {
            Extractor::PdfToText(PdfToTextExtractor::new(pdftotext_command))
        }
    }
}

impl TextExtractor for Extractor {
    async fn extract(&self, doc: &Document, password: Option<&str>) -> Result<Vec<PageText>, ExtractError> {
        match self {
            Extractor::PdfToText(e) => e.extract(doc, password).await,
            Extractor::PlainText(e) => e.extract(doc, password).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::assemble_lines;

    #[test]
    fn test_layout_columns_become_fragments() {
        let text = "  12/03/2024 | 14:05     AMAZON PAY INDIA        C 1,299.00\n\nPage 1\u{c}Domestic Transactions\n\u{c}";
        let pages = layout_text_pages(text);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].fragments[0], TextFragment::new("12/03/2024 | 14:05", false));
        assert_eq!(pages[0].fragments[2], TextFragment::new("C 1,299.00", true));
        assert_eq!(
            assemble_lines(&pages),
            vec![
                "12/03/2024 | 14:05 AMAZON PAY INDIA C 1,299.00",
                "",
                "Page 1",
                "Domestic Transactions",
            ]
        );
    }

    #[test]
    fn test_document_kind_from_name() {
        let doc = Document::from_path("/tmp/Statement.PDF");
        assert_eq!(doc.name, "Statement.PDF");
        assert!(doc.is_pdf());
        assert!(!doc.is_text());
        assert!(Document::from_path("dump.txt").is_text());
    }

    #[test]
    fn test_extractor_choice() {
        let pdf = Extractor::for_document(&Document::from_path("a.pdf"), "pdftotext");
        let txt = Extractor::for_document(&Document::from_path("a.txt"), "pdftotext");
        assert!(matches!(pdf, Extractor::PdfToText(_)));
        assert!(matches!(txt, Extractor::PlainText(_)));
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let extractor = PdfToTextExtractor::new("stmtx-no-such-pdftotext");
        let err = extractor
            .extract(&Document::from_path("a.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unavailable(_)));
    }
}
