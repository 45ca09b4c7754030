//! Layout detection by trial parse: old grammar first, new grammar if that finds nothing.

use tracing::debug;

use stmtx_core::{Layout, Transaction};

use crate::parsers::{LayoutGrammar, NewLayout, OldLayout, grammar_for};

/// Result of running the dispatcher over one document
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed {
        layout: Layout,
        transactions: Vec<Transaction>,
    },
    /// Every grammar came back empty; the statement may use another layout.
    NoTransactions,
}

impl ParseOutcome {
    pub fn layout(&self) -> Option<Layout> {
        match self {
            ParseOutcome::Parsed { layout, .. } => Some(*layout),
            ParseOutcome::NoTransactions => None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match self {
            ParseOutcome::Parsed { transactions, .. } => transactions,
            ParseOutcome::NoTransactions => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.transactions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions().is_empty()
    }
}

/// Ordered grammar stages. Each stage re-parses the full line sequence from scratch.
pub struct FormatDispatcher {
    stages: Vec<Box<dyn LayoutGrammar>>,
}

impl Default for FormatDispatcher {
    fn default() -> Self {
        Self {
            stages: vec![Box::new(OldLayout), Box::new(NewLayout)],
        }
    }
}

impl FormatDispatcher {
    /// Skip detection and use a single grammar.
    pub fn forced(layout: Layout) -> Self {
        Self {
            stages: vec![grammar_for(layout)],
        }
    }

    /// Pick `forced(layout)` when a layout is given, detection otherwise.
    pub fn for_layout(layout: Option<Layout>) -> Self {
        layout.map(Self::forced).unwrap_or_default()
    }

    pub fn dispatch(&self, lines: &[String]) -> ParseOutcome {
        for stage in &self.stages {
            let transactions = stage.parse(lines);
            debug!(
                layout = %stage.layout(),
                rows = transactions.len(),
                lines = lines.len(),
                "layout stage finished"
            );
            if !transactions.is_empty() {
                return ParseOutcome::Parsed {
                    layout: stage.layout(),
                    transactions,
                };
            }
        }
        ParseOutcome::NoTransactions
    }
}
