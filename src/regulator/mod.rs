pub mod classify;
pub mod draft;
pub mod normalize;
pub mod table;

use serde::{Serialize, Serializer};

use crate::department::Department;

/// A finalized regulator record, serialized as a flat entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Regulator {
    pub index: u32,
    pub unit: Option<String>,
    pub manager: Option<String>,
    pub subject_to: Option<String>,
    pub superior: Option<String>,
    pub main_activities: Option<String>,
    #[serde(serialize_with = "department_code")]
    pub department: Department,
}

fn department_code<S: Serializer>(department: &Department, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(department.code())
}
