//! Statement layouts, their column schemas, and the old layout's section state

use serde::{Deserialize, Serialize};

/// Which grammar produced a set of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `dd/mm/yyyy description ... amount [Cr]`, grouped under section headers
    Old,
    /// `dd/mm/yyyy | hh:mm description ... [+] C amount`
    New,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Old => "old",
            Layout::New => "new",
        }
    }

    /// Output columns, in order. Only the new layout carries a time column.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Layout::New => &[
                Column::Date,
                Column::Time,
                Column::Currency,
                Column::Description,
                Column::ForexAmount,
                Column::ForexRate,
                Column::Amount,
                Column::Type,
            ],
            Layout::Old => &[
                Column::Date,
                Column::Currency,
                Column::Description,
                Column::ForexAmount,
                Column::ForexRate,
                Column::Amount,
                Column::Type,
            ],
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Ok(Layout::Old),
            "new" => Ok(Layout::New),
            other => Err(format!("unknown layout: {other} (expected old or new)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Time,
    Currency,
    Description,
    ForexAmount,
    ForexRate,
    Amount,
    Type,
}

impl Column {
    /// Header text
    pub fn name(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Time => "time",
            Column::Currency => "currency",
            Column::Description => "description",
            Column::ForexAmount => "forex_amount",
            Column::ForexRate => "forex_rate",
            Column::Amount => "amount",
            Column::Type => "type",
        }
    }
}

/// Old-layout section state. Forex tokens are only honoured inside `International`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    None,
    Domestic,
    International,
}

impl Section {
    /// Section announced by a header line, if `line` is one.
    pub fn from_header(line: &str) -> Option<Section> {
        let lower = line.to_lowercase();
        if lower.contains("domestic transactions") {
            Some(Section::Domestic)
        } else if lower.contains("international transactions") {
            Some(Section::International)
        } else {
            None
        }
    }

    pub fn allows_forex(&self) -> bool {
        *self == Section::International
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layout_has_time_column() {
        let new: Vec<_> = Layout::New.columns().iter().map(|c| c.name()).collect();
        let old: Vec<_> = Layout::Old.columns().iter().map(|c| c.name()).collect();
        assert_eq!(new[1], "time");
        assert!(!old.contains(&"time"));
        assert_eq!(
            old,
            vec!["date", "currency", "description", "forex_amount", "forex_rate", "amount", "type"]
        );
    }

    #[test]
    fn test_section_headers_are_case_insensitive() {
        assert_eq!(Section::from_header("DOMESTIC TRANSACTIONS"), Some(Section::Domestic));
        assert_eq!(
            Section::from_header("  International Transactions (USD)"),
            Some(Section::International)
        );
        assert_eq!(Section::from_header("01/02/2024 SWIGGY 250.00"), None);
        assert!(Section::International.allows_forex());
        assert!(!Section::Domestic.allows_forex());
        assert!(!Section::None.allows_forex());
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("OLD".parse::<Layout>(), Ok(Layout::Old));
        assert_eq!("new".parse::<Layout>(), Ok(Layout::New));
        assert!("pipe".parse::<Layout>().is_err());
    }
}
