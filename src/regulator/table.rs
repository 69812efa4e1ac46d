use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::department::{Department, DepartmentRange};
use crate::error::{IndexGap, ParseError};
use crate::sheet::{Document, Row};

use super::classify::{classify, RowCells, RowContext, RowDecision};
use super::draft::RegulatorDraft;
use super::normalize::read_index;
use super::Regulator;

/// What to do with a row too narrow to hold a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub page: u32,
    pub row: usize,
}

/// Records of one department plus everything the scan tolerated on the way.
#[derive(Debug, Clone)]
pub struct DepartmentTable {
    pub department: Department,
    pub regulators: Vec<Regulator>,
    pub gaps: Vec<IndexGap>,
    pub malformed: Vec<RowRef>,
    /// Continuation rows met while no record was open.
    pub orphans: Vec<RowRef>,
}

impl DepartmentTable {
    fn new(department: Department) -> Self {
        DepartmentTable {
            department,
            regulators: Vec::new(),
            gaps: Vec::new(),
            malformed: Vec::new(),
            orphans: Vec::new(),
        }
    }
}

/// Rebuild the regulators listed on `range`'s pages, in discovery order.
pub fn parse_department_table<D: Document + ?Sized>(
    doc: &mut D,
    range: &DepartmentRange,
    policy: MalformedRowPolicy,
) -> Result<DepartmentTable, ParseError> {
    range.validate()?;
    let department = range.department;
    let mut table = DepartmentTable::new(department);
    let mut draft: Option<RegulatorDraft> = None;
    let mut current_index = 0u32;

    for page_number in range.pages() {
        let page = doc.page(page_number)?;
        let rows = page.rows();

        for (position, row) in rows.iter().enumerate() {
            let ctx = RowContext {
                first_page: page_number == range.start_page,
                first_row: position == 0,
                has_open_draft: draft.is_some(),
                current_index,
                lookahead_index: rows
                    .get(position + 1)
                    .and_then(Row::last)
                    .and_then(read_index),
            };
            if ctx.is_header() {
                continue;
            }

            let cells = match RowCells::from_row(row, page_number, position) {
                Ok(cells) => cells,
                Err(err) => match policy {
                    MalformedRowPolicy::Skip => {
                        warn!("{}: {}, skipping row", department, err);
                        table.malformed.push(RowRef { page: page_number, row: position });
                        continue;
                    }
                    MalformedRowPolicy::Abort => return Err(err),
                },
            };

            match classify(cells.index(), &ctx) {
                RowDecision::Skip => {
                    debug!("{}: page {} row {} skipped", department, page.number, position);
                    continue;
                }
                RowDecision::StartRecord { index, inferred, gap } => {
                    if gap {
                        let jump = IndexGap {
                            page: page_number,
                            row: position,
                            previous: current_index,
                            next: index,
                        };
                        warn!("{}: page {} row {}: {}", department, jump.page, jump.row, jump);
                        table.gaps.push(jump);
                    }
                    if inferred {
                        debug!(
                            "{}: page {} row {} has no index, inferred {}",
                            department, page_number, position, index
                        );
                    }
                    if let Some(done) = draft.take() {
                        table.regulators.push(done.finalize(department));
                    }
                    current_index = index;
                    draft = Some(RegulatorDraft::new(index));
                }
                RowDecision::Continue => {}
            }

            match draft.as_mut() {
                Some(open) => open.append_row(&cells.fragments()),
                None => {
                    warn!(
                        "{}: page {} row {} continues no open record, dropping",
                        department, page_number, position
                    );
                    table.orphans.push(RowRef { page: page_number, row: position });
                }
            }
        }
    }

    if let Some(done) = draft.take() {
        table.regulators.push(done.finalize(department));
    }

    info!(
        "{}: {} regulators on pages {}-{}",
        department,
        table.regulators.len(),
        range.start_page,
        range.end_page
    );
    Ok(table)
}

/// Parse every configured range in order. `on_table` sees each department as it completes.
pub fn parse_departments<D, F>(
    doc: &mut D,
    ranges: &[DepartmentRange],
    policy: MalformedRowPolicy,
    mut on_table: F,
) -> Result<Vec<DepartmentTable>, ParseError>
where
    D: Document + ?Sized,
    F: FnMut(&DepartmentTable),
{
    let mut tables = Vec::with_capacity(ranges.len());
    for range in ranges {
        let table = parse_department_table(doc, range, policy)?;
        on_table(&table);
        tables.push(table);
    }
    Ok(tables)
}

/// Concatenate department results in configuration order.
pub fn collect_regulators(tables: Vec<DepartmentTable>) -> Vec<Regulator> {
    tables.into_iter().flat_map(|t| t.regulators).collect()
}

// ── Tests ──
