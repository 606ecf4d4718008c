use serde::{Deserialize, Serialize};

use crate::filter::UNLIMITED_ROWS;

/// Pagination bookkeeping echoed with every collection response.
///
/// `all` is the total available, `filtered` the total matching the filter,
/// `length` the number returned in this page, `rows` the page size
/// (`-1` = unlimited). Invariants: `filtered <= all`, and `length <= rows`
/// unless rows is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub first: u64,
    pub all: u64,
    pub filtered: u64,
    pub length: u64,
    pub rows: i64,
}

impl CollectionCounts {
    pub fn is_unlimited(&self) -> bool {
        self.rows == UNLIMITED_ROWS
    }

    /// 1-based page index of this window.
    pub fn current_page(&self) -> u64 {
        if self.rows <= 0 {
            return 1;
        }
        (self.first.saturating_sub(1)) / self.rows as u64 + 1
    }

    pub fn page_count(&self) -> u64 {
        if self.rows <= 0 {
            return 1;
        }
        self.filtered.div_ceil(self.rows as u64).max(1)
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page() > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page() < self.page_count()
    }
}
