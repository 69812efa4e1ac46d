use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use regex::Regex;

use super::{Cell, Document, Page, Row};
use crate::error::ParseError;

static PAGE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Page (\d+)$").unwrap());

pub fn page_sheet_name(number: u32) -> String {
    format!("Page {}", number)
}

/// Page number encoded in a sheet name such as `Page 12`.
pub fn page_number(sheet_name: &str) -> Option<u32> {
    PAGE_NAME_RE.captures(sheet_name.trim())?[1].parse().ok()
}

/// Workbook whose sheets are the pages of the source document.
pub struct XlsxDocument {
    workbook: Sheets<BufReader<File>>,
}

impl XlsxDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook {:?}", path))?;
        Ok(XlsxDocument { workbook })
    }
}

impl Document for XlsxDocument {
    fn page(&mut self, number: u32) -> Result<Page, ParseError> {
        let name = page_sheet_name(number);
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| ParseError::MissingPage {
                page: number,
                reason: e.to_string(),
            })?;
        Ok(Page {
            number,
            rows: range_rows(&range),
        })
    }

    fn page_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .workbook
            .sheet_names()
            .iter()
            .filter_map(|name| page_number(name))
            .collect();
        numbers.sort_unstable();
        numbers
    }
}

/// Materialize rows anchored at A1, padding whatever the used range leaves out.
fn range_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let lead = start_col as usize;
    let mut rows: Vec<Row> = (0..start_row)
        .map(|_| Row(vec![Cell::Empty; lead + range.width()]))
        .collect();
    for cells in range.rows() {
        let mut row = vec![Cell::Empty; lead];
        row.extend(cells.iter().map(to_cell));
        rows.push(Row(row));
    }
    rows
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::DateTime(dt) => Cell::Date(dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Date(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_round_trip() {
        assert_eq!(page_sheet_name(12), "Page 12");
        assert_eq!(page_number("Page 12"), Some(12));
        assert_eq!(page_number(" Page 4 "), Some(4));
        assert_eq!(page_number("Page"), None);
        assert_eq!(page_number("Summary"), None);
        assert_eq!(page_number("Pages 3"), None);
    }

    #[test]
    fn cells_map_to_kinds() {
        assert_eq!(to_cell(&Data::String("ba".into())), Cell::Text("ba".into()));
        assert_eq!(to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(to_cell(&Data::Float(4.0)), Cell::Number(4.0));
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Boolean(true));
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn rows_are_anchored_at_a1() {
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("x".into()));
        range.set_value((2, 2), Data::Float(1.0));

        let rows = range_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.cells().len() == 3));
        assert_eq!(rows[0].cells()[1], Cell::Empty);
        assert_eq!(rows[1].cells()[1], Cell::Text("x".into()));
        assert_eq!(rows[2].last(), Some(&Cell::Number(1.0)));
    }

    #[test]
    fn empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        assert!(range_rows(&range).is_empty());
    }
}
