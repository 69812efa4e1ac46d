use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::department::{DepartmentRange, DEFAULT_RANGES};
use crate::regulator::table::MalformedRowPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_file: PathBuf,
    pub log_path: Option<PathBuf>,
    pub verbose: bool,
    pub malformed_rows: MalformedRowPolicy,
    pub departments: Vec<DepartmentRange>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_file: PathBuf::from("regulators.json"),
            log_path: None,
            verbose: false,
            malformed_rows: MalformedRowPolicy::Skip,
            departments: DEFAULT_RANGES.to_vec(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional settings file, then `REGULATORS_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(Environment::with_prefix("REGULATORS").try_parsing(true))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for range in &self.departments {
            range
                .validate()
                .with_context(|| format!("department {}", range.department))?;
        }
        Ok(())
    }
}
