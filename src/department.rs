use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ParseError;

/// Governmental domain a regulator belongs to. Discriminants are the output codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Economics = 1,
    Health = 2,
    Agriculture = 3,
    Education = 4,
    Environment = 5,
    Law = 6,
    Transportation = 7,
    Energy = 8,
    Religion = 9,
    Communication = 10,
    Interior = 11,
    Welfare = 12,
    #[serde(alias = "treasure")]
    Treasury = 13,
    Construction = 14,
    PublicSecurity = 15,
    Tourism = 16,
    Culture = 17,
    Defence = 18,
    PrimeMinister = 19,
    SeniorCitizens = 20,
}

impl Department {
    pub const ALL: [Department; 20] = [
        Department::Economics,
        Department::Health,
        Department::Agriculture,
        Department::Education,
        Department::Environment,
        Department::Law,
        Department::Transportation,
        Department::Energy,
        Department::Religion,
        Department::Communication,
        Department::Interior,
        Department::Welfare,
        Department::Treasury,
        Department::Construction,
        Department::PublicSecurity,
        Department::Tourism,
        Department::Culture,
        Department::Defence,
        Department::PrimeMinister,
        Department::SeniorCitizens,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Department> {
        Department::ALL.into_iter().find(|d| d.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Department::Economics => "economics",
            Department::Health => "health",
            Department::Agriculture => "agriculture",
            Department::Education => "education",
            Department::Environment => "environment",
            Department::Law => "law",
            Department::Transportation => "transportation",
            Department::Energy => "energy",
            Department::Religion => "religion",
            Department::Communication => "communication",
            Department::Interior => "interior",
            Department::Welfare => "welfare",
            Department::Treasury => "treasury",
            Department::Construction => "construction",
            Department::PublicSecurity => "public_security",
            Department::Tourism => "tourism",
            Department::Culture => "culture",
            Department::Defence => "defence",
            Department::PrimeMinister => "prime_minister",
            Department::SeniorCitizens => "senior_citizens",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        if wanted == "treasure" {
            return Ok(Department::Treasury);
        }
        Department::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| format!("unknown department: {}", s))
    }
}

/// One entry of the page-range table: pages `start_page..=end_page` hold `department`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DepartmentRange {
    pub start_page: u32,
    pub end_page: u32,
    pub department: Department,
}

impl DepartmentRange {
    pub const fn new(start_page: u32, end_page: u32, department: Department) -> Self {
        DepartmentRange {
            start_page,
            end_page,
            department,
        }
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.start_page == 0 || self.start_page > self.end_page {
            return Err(ParseError::InvalidRange {
                start_page: self.start_page,
                end_page: self.end_page,
            });
        }
        Ok(())
    }
}

/// Layout of the published regulators workbook.
pub const DEFAULT_RANGES: [DepartmentRange; 20] = [
    DepartmentRange::new(4, 6, Department::Economics),
    DepartmentRange::new(8, 9, Department::Health),
    DepartmentRange::new(11, 12, Department::Agriculture),
    DepartmentRange::new(14, 15, Department::Education),
    DepartmentRange::new(17, 17, Department::Environment),
    DepartmentRange::new(19, 20, Department::Law),
    DepartmentRange::new(22, 23, Department::Transportation),
    DepartmentRange::new(25, 26, Department::Energy),
    DepartmentRange::new(28, 28, Department::Religion),
    DepartmentRange::new(30, 31, Department::Communication),
    DepartmentRange::new(33, 33, Department::Interior),
    DepartmentRange::new(35, 35, Department::Welfare),
    DepartmentRange::new(37, 37, Department::Treasury),
    DepartmentRange::new(39, 39, Department::Construction),
    DepartmentRange::new(41, 41, Department::PublicSecurity),
    DepartmentRange::new(43, 43, Department::Tourism),
    DepartmentRange::new(45, 45, Department::Culture),
    DepartmentRange::new(47, 47, Department::Defence),
    DepartmentRange::new(49, 49, Department::PrimeMinister),
    DepartmentRange::new(51, 51, Department::SeniorCitizens),
];

// ── Tests ──
