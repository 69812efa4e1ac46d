use crate::error::ParseError;
use crate::sheet::{Cell, Row};

use super::normalize::{normalize_text, read_index};

/// Five text columns plus the trailing index column.
pub const MIN_ROW_CELLS: usize = 6;

/// Where a row sits in the scan of one department's page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    pub first_page: bool,
    pub first_row: bool,
    pub has_open_draft: bool,
    pub current_index: u32,
    /// Index carried by the next row on the same page.
    pub lookahead_index: Option<u32>,
}

impl RowContext {
    /// Table header: skipped before the row is even looked at.
    pub fn is_header(&self) -> bool {
        self.first_page && self.first_row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    Skip,
    Continue,
    StartRecord {
        index: u32,
        /// Index reconstructed from the following row rather than read.
        inferred: bool,
        /// Explicit index jumped past `current_index + 1`.
        gap: bool,
    },
}

/// Shape-checked view over a row.
#[derive(Debug, Clone, Copy)]
pub struct RowCells<'a> {
    fields: &'a [Cell],
    marker: &'a Cell,
}

impl<'a> RowCells<'a> {
    pub fn from_row(row: &'a Row, page: u32, position: usize) -> Result<Self, ParseError> {
        let cells = row.cells();
        match cells.last() {
            Some(marker) if cells.len() >= MIN_ROW_CELLS => Ok(RowCells {
                fields: &cells[..5],
                marker,
            }),
            _ => Err(ParseError::MalformedRow {
                page,
                row: position,
                cells: cells.len(),
            }),
        }
    }

    pub fn index(&self) -> Option<u32> {
        read_index(self.marker)
    }

    /// Normalized text of columns 0-4, in column order.
    pub fn fragments(&self) -> [Option<String>; 5] {
        std::array::from_fn(|i| normalize_text(&self.fields[i]))
    }
}

/// Decide what a row means for record reconstruction, given its own index.
pub fn classify(own_index: Option<u32>, ctx: &RowContext) -> RowDecision {
    if ctx.first_page {
        if ctx.first_row {
            return RowDecision::Skip;
        }
        if !ctx.has_open_draft && own_index.is_none() {
            return RowDecision::Skip;
        }
    } else if own_index.is_none() && ctx.lookahead_index.is_some() {
        // Continuation pages sometimes drop the marker on a record's first row.
        return RowDecision::StartRecord {
            index: ctx.current_index.saturating_add(1),
            inferred: true,
            gap: false,
        };
    }

    match own_index {
        Some(index) => RowDecision::StartRecord {
            index,
            inferred: false,
            gap: index > ctx.current_index.saturating_add(1),
        },
        None => RowDecision::Continue,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::mirrored;

    fn ctx(first_page: bool, first_row: bool, has_open_draft: bool) -> RowContext {
        RowContext {
            first_page,
            first_row,
            has_open_draft,
            current_index: 2,
            lookahead_index: None,
        }
    }

    #[test]
    fn header_row_skipped_even_with_index() {
        let c = ctx(true, true, false);
        assert!(c.is_header());
        assert_eq!(classify(Some(1), &c), RowDecision::Skip);
    }

    #[test]
    fn preamble_without_index_skipped() {
        assert_eq!(classify(None, &ctx(true, false, false)), RowDecision::Skip);
    }

    #[test]
    fn first_page_continuation_once_open() {
        assert_eq!(classify(None, &ctx(true, false, true)), RowDecision::Continue);
    }

    #[test]
    fn explicit_index_starts_record() {
        assert_eq!(
            classify(Some(3), &ctx(true, false, true)),
            RowDecision::StartRecord { index: 3, inferred: false, gap: false }
        );
    }

    #[test]
    fn jump_is_flagged_as_gap() {
        assert_eq!(
            classify(Some(5), &ctx(false, false, true)),
            RowDecision::StartRecord { index: 5, inferred: false, gap: true }
        );
    }

    #[test]
    fn lookahead_infers_boundary_on_continuation_page() {
        let c = RowContext {
            lookahead_index: Some(4),
            ..ctx(false, false, true)
        };
        assert_eq!(
            classify(None, &c),
            RowDecision::StartRecord { index: 3, inferred: true, gap: false }
        );
    }

    #[test]
    fn lookahead_ignored_on_first_page() {
        let c = RowContext {
            lookahead_index: Some(4),
            ..ctx(true, false, true)
        };
        assert_eq!(classify(None, &c), RowDecision::Continue);
    }

    #[test]
    fn continuation_page_first_row_is_not_a_header() {
        assert_eq!(classify(None, &ctx(false, true, true)), RowDecision::Continue);
        assert_eq!(
            classify(Some(3), &ctx(false, true, true)),
            RowDecision::StartRecord { index: 3, inferred: false, gap: false }
        );
    }

    #[test]
    fn short_row_is_malformed() {
        let row = Row(vec![mirrored("a"), Cell::Empty, Cell::Number(1.0)]);
        let err = RowCells::from_row(&row, 5, 2).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow { page: 5, row: 2, cells: 3 }));
        assert!(RowCells::from_row(&Row::default(), 5, 3).is_err());
    }

    #[test]
    fn marker_is_last_cell_of_wide_row() {
        let row = Row(vec![
            mirrored("activities"),
            mirrored("superior"),
            Cell::Empty,
            mirrored("manager"),
            mirrored("unit"),
            Cell::Empty,
            Cell::Number(9.0),
        ]);
        let cells = RowCells::from_row(&row, 4, 1).unwrap();
        assert_eq!(cells.index(), Some(9));
        let fragments = cells.fragments();
        assert_eq!(fragments[0].as_deref(), Some("activities"));
        assert_eq!(fragments[2], None);
        assert_eq!(fragments[4].as_deref(), Some("unit"));
    }
}
