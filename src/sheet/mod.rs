pub mod xlsx;

use crate::error::ParseError;

/// One tabular unit as handed over by the document reader: type tag and raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Raw date-like value; never interpreted by the extractor.
    Date(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Vec<Cell>);

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Trailing cell, which carries the record boundary marker.
    pub fn last(&self) -> Option<&Cell> {
        self.0.last()
    }
}

/// A single `Page N` sheet, rows in physical order.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub number: u32,
    pub rows: Vec<Row>,
}

impl Page {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Randomly addressable paginated table.
pub trait Document {
    fn page(&mut self, number: u32) -> Result<Page, ParseError>;

    /// Page numbers present in the document, ascending.
    fn page_numbers(&self) -> Vec<u32>;
}

#[cfg(test)]
pub use memory::{mirrored, MemoryDocument};
