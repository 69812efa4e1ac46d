use crate::department::Department;

use super::Regulator;

/// Text columns in sheet order (positions 0-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MainActivities,
    Superior,
    SubjectTo,
    Manager,
    Unit,
}

impl Field {
    pub const COLUMNS: [Field; 5] = [
        Field::MainActivities,
        Field::Superior,
        Field::SubjectTo,
        Field::Manager,
        Field::Unit,
    ];
}

/// In-progress record. The index is fixed at creation; text only grows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegulatorDraft {
    index: u32,
    main_activities: Option<String>,
    superior: Option<String>,
    subject_to: Option<String>,
    manager: Option<String>,
    unit: Option<String>,
}

impl RegulatorDraft {
    pub fn new(index: u32) -> Self {
        RegulatorDraft {
            index,
            main_activities: None,
            superior: None,
            subject_to: None,
            manager: None,
            unit: None,
        }
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::MainActivities => self.main_activities.as_deref(),
            Field::Superior => self.superior.as_deref(),
            Field::SubjectTo => self.subject_to.as_deref(),
            Field::Manager => self.manager.as_deref(),
            Field::Unit => self.unit.as_deref(),
        }
    }

    pub fn append(&mut self, field: Field, fragment: Option<&str>) {
        let Some(fragment) = fragment else {
            return;
        };
        let slot = match field {
            Field::MainActivities => &mut self.main_activities,
            Field::Superior => &mut self.superior,
            Field::SubjectTo => &mut self.subject_to,
            Field::Manager => &mut self.manager,
            Field::Unit => &mut self.unit,
        };
        slot.get_or_insert_with(String::new).push_str(fragment);
    }

    /// Append one row's five normalized fragments in column order.
    pub fn append_row(&mut self, fragments: &[Option<String>; 5]) {
        for (field, fragment) in Field::COLUMNS.iter().zip(fragments) {
            self.append(*field, fragment.as_deref());
        }
    }

    pub fn finalize(self, department: Department) -> Regulator {
        Regulator {
            index: self.index,
            unit: self.unit.as_deref().map(reverse_lines),
            manager: self.manager.as_deref().map(reverse_lines),
            subject_to: self.subject_to.as_deref().map(reverse_lines),
            superior: self.superior.as_deref().map(reverse_lines),
            main_activities: self.main_activities.as_deref().map(reverse_lines),
            department,
        }
    }
}

/// Restore top-to-bottom line order of a mirrored multi-line text, space-joined.
pub fn reverse_lines(text: &str) -> String {
    text.split('\n').rev().collect::<Vec<_>>().join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_concatenates_in_visit_order() {
        let mut draft = RegulatorDraft::new(1);
        draft.append(Field::Unit, Some("AB"));
        draft.append(Field::Unit, None);
        draft.append(Field::Unit, Some("CD"));
        assert_eq!(draft.field(Field::Unit), Some("ABCD"));
        assert_eq!(draft.field(Field::Manager), None);
    }

    #[test]
    fn append_row_follows_column_order() {
        let mut draft = RegulatorDraft::new(4);
        draft.append_row(&[
            Some("activities".into()),
            Some("superior".into()),
            None,
            Some("manager".into()),
            Some("unit".into()),
        ]);
        assert_eq!(draft.field(Field::MainActivities), Some("activities"));
        assert_eq!(draft.field(Field::Superior), Some("superior"));
        assert_eq!(draft.field(Field::SubjectTo), None);
        assert_eq!(draft.field(Field::Manager), Some("manager"));
        assert_eq!(draft.field(Field::Unit), Some("unit"));
    }

    #[test]
    fn reverse_lines_restores_reading_order() {
        assert_eq!(reverse_lines("3\n2\n1"), "1 2 3");
        assert_eq!(reverse_lines("single"), "single");
        assert_eq!(reverse_lines(""), "");
    }

    #[test]
    fn finalize_corrects_multi_row_composite() {
        let mut draft = RegulatorDraft::new(7);
        // Two rows, each already character-reversed: lines come out bottom-up.
        draft.append(Field::MainActivities, Some("3\n2\n"));
        draft.append(Field::MainActivities, Some("1"));
        draft.append(Field::Manager, Some("Cohen"));
        let regulator = draft.finalize(Department::Health);

        assert_eq!(regulator.index, 7);
        assert_eq!(regulator.main_activities.as_deref(), Some("1 2 3"));
        assert_eq!(regulator.manager.as_deref(), Some("Cohen"));
        assert_eq!(regulator.unit, None);
        assert_eq!(regulator.department, Department::Health);
    }
}
