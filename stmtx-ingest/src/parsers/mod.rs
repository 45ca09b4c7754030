//! Line grammars for the two known statement layouts

pub mod new_layout;
pub mod old_layout;

use stmtx_core::{Layout, Transaction};

pub use new_layout::NewLayout;
pub use old_layout::OldLayout;

/// A whole-document pass with one grammar.
///
/// Lines that do not match contribute nothing; a grammar never fails.
pub trait LayoutGrammar: Send + Sync {
    fn layout(&self) -> Layout;

    fn parse(&self, lines: &[String]) -> Vec<Transaction>;
}

/// Grammar for a layout tag
pub fn grammar_for(layout: Layout) -> Box<dyn LayoutGrammar> {
    match layout {
        Layout::Old => Box::new(OldLayout),
        Layout::New => Box::new(NewLayout),
    }
}
