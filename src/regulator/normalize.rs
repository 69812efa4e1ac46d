use crate::sheet::Cell;

/// Undo the source's character mirroring. Only text cells carry field text.
///
/// Must be applied once per cell: reversing again re-mirrors the value.
pub fn normalize_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(raw) => Some(raw.chars().rev().collect()),
        _ => None,
    }
}

/// Record-boundary marker of a row, if the cell holds one.
pub fn read_index(cell: &Cell) -> Option<u32> {
    match *cell {
        Cell::Number(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
            Some(n as u32)
        }
        _ => None,
    }
}
