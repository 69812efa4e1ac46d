use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("page {page}, row {row}: expected at least 6 cells, found {cells}")]
    MalformedRow { page: u32, row: usize, cells: usize },

    #[error("page {page} unavailable: {reason}")]
    MissingPage { page: u32, reason: String },

    #[error("invalid page range {start_page}..={end_page}")]
    InvalidRange { start_page: u32, end_page: u32 },
}

/// Non-fatal: an explicit index jumped past `previous + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexGap {
    pub page: u32,
    pub row: usize,
    pub previous: u32,
    pub next: u32,
}

impl IndexGap {
    /// Number of indices skipped by the jump.
    pub fn missing(&self) -> u32 {
        self.next.saturating_sub(self.previous).saturating_sub(1)
    }
}

impl fmt::Display for IndexGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing indices between {} and {}, jumping to {}",
            self.previous, self.next, self.next
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_counts_skipped_indices() {
        let gap = IndexGap { page: 4, row: 7, previous: 2, next: 5 };
        assert_eq!(gap.missing(), 2);
        assert_eq!(
            gap.to_string(),
            "missing indices between 2 and 5, jumping to 5"
        );
    }

    #[test]
    fn malformed_row_message() {
        let err = ParseError::MalformedRow { page: 8, row: 3, cells: 4 };
        assert_eq!(
            err.to_string(),
            "page 8, row 3: expected at least 6 cells, found 4"
        );
    }
}
