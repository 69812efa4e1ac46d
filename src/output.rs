use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::regulator::Regulator;

/// Write regulators as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, regulators: &[Regulator]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, regulators)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn save_json(path: &Path, regulators: &[Regulator]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_json(BufWriter::new(file), regulators)
}
