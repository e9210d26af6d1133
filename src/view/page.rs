//! Fixed-size pagination.

use crate::types::Row;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// One page of a filtered sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<Row>,
    pub page_count: usize,
    pub page: usize,
}

/// Slices filtered sequences into pages of `page_size` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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

impl Paginator {
    /// Create a paginator. A size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `len` rows.
    pub fn page_count_for(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Rows of the 1-based `page`.
    ///
    /// Pages past the end (and page 0) yield no rows rather than an error.
    pub fn slice<'a>(&self, rows: &'a [Row], page: usize) -> &'a [Row] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size).min(rows.len());
        let end = start.saturating_add(self.page_size).min(rows.len());
        &rows[start..end]
    }

    /// Build the page view for `page`.
    pub fn paginate(&self, rows: &[Row], page: usize) -> Page {
        Page {
            rows: self.slice(rows, page).to_vec(),
            page_count: self.page_count_for(rows.len()),
            page,
        }
    }

    /// Page to show after a delete.
    ///
    /// Steps back exactly one page when the current page no longer exists,
    /// without clamping all the way to the last page.
    pub fn page_after_delete(&self, current_page: usize, remaining: usize) -> usize {
        if current_page > self.page_count_for(remaining) && current_page > 1 {
            current_page - 1
        } else {
            current_page
        }
    }
}
