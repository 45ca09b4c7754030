//! Turning extracted text fragments into ordered statement lines

/// One run of text as reported by the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    /// The extractor saw a line break after this fragment
    pub has_eol: bool,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, has_eol: bool) -> Self {
        Self {
            text: text.into(),
            has_eol,
        }
    }
}

/// Fragments of one page, in reading order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub fragments: Vec<TextFragment>,
}

impl PageText {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }
}

/// Join fragments into lines, page by page.
///
/// Fragments without an end-of-line flag are joined with one space. Each emitted
/// line is trimmed; whatever is left in the buffer at the end of a page is
/// flushed as a final line unless it is blank.
pub fn assemble_lines(pages: &[PageText]) -> Vec<String> {
    let mut lines = Vec::new();
    for page in pages {
        let mut buffer = String::new();
        for fragment in &page.fragments {
            buffer.push_str(&fragment.text);
            if fragment.has_eol {
                lines.push(buffer.trim().to_string());
                buffer.clear();
            } else {
                buffer.push(' ');
            }
        }
        if !buffer.trim().is_empty() {
            lines.push(buffer.trim().to_string());
        }
    }
    lines
}
