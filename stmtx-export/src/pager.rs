//! Fixed-size pages over a row sequence, for previews.
//!
//! The pager holds no cursor: callers keep the current page number and ask
//! again with `Page::previous` / `Page::next`.

use anyhow::{Result, bail};

/// Rows per preview page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One window of rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    /// 1-based, already clamped
    pub number: usize,
    pub total_pages: usize,
    /// 1-based inclusive range; an empty sequence reports 1..=0
    pub first_row: usize,
    pub last_row: usize,
    pub total_rows: usize,
    pub rows: &'a [T],
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn previous(&self) -> usize {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> usize {
        (self.number + 1).min(self.total_pages)
    }

    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} (rows {}-{} of {})",
            self.number, self.total_pages, self.first_row, self.last_row, self.total_rows
        )
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            bail!("page size must be at least 1");
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `max(1, ceil(total_rows / page_size))`
    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    /// Page `requested`, clamped into `1..=total_pages`.
    pub fn page<'a, T>(&self, rows: &'a [T], requested: usize) -> Page<'a, T> {
        let total_pages = self.total_pages(rows.len());
        let number = requested.clamp(1, total_pages);
        let start = (number - 1) * self.page_size;
        let end = (start + self.page_size).min(rows.len());

        Page {
            number,
            total_pages,
            first_row: start + 1,
            last_row: end,
            total_rows: rows.len(),
            rows: &rows[start..end],
        }
    }
}
