//! Experiment filename parsing.
//!
//! Storage-ring measurement files are named
//! `<description>_<energy>MeVu_<current>uA_<anything>`, for example
//! `58Ni26+_374MeVu_250uA_pos_0_0.tiq`.

use std::path::Path;

use crate::error::{IqError, Result};

/// Beam parameters encoded in a measurement filename.
#[derive(Debug, Clone, PartialEq)]
pub struct FilenameInfo {
    /// Ion species / free text before the first underscore.
    pub description: String,
    /// Energy per nucleon in eV.
    pub energy: f64,
    /// Beam current in A.
    pub current: f64,
}

/// Parse the final path component of `filename`.
pub fn parse_filename(filename: &str) -> Result<FilenameInfo> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mut parts = name.split('_');
    let description = parts.next().filter(|d| !d.is_empty()).ok_or_else(|| {
        IqError::Parse(format!("'{name}': missing description before first '_'"))
    })?;
    let energy = parts
        .next()
        .ok_or_else(|| IqError::Parse(format!("'{name}': missing energy field")))?;
    let current = parts
        .next()
        .ok_or_else(|| IqError::Parse(format!("'{name}': missing current field")))?;

    Ok(FilenameInfo {
        description: description.to_string(),
        energy: scaled_value(name, energy, "MeVu", "e6")?,
        current: scaled_value(name, current, "uA", "e-6")?,
    })
}

/// `"374MeVu"` with suffix `MeVu` and exponent `e6` becomes `374e6`.
fn scaled_value(name: &str, field: &str, suffix: &str, exponent: &str) -> Result<f64> {
    let digits = field.strip_suffix(suffix).ok_or_else(|| {
        IqError::Parse(format!("'{name}': field '{field}' does not end in {suffix}"))
    })?;
    // Parsing the joined literal keeps the value identical to writing it out.
    format!("{digits}{exponent}")
        .parse::<f64>()
        .map_err(|_| IqError::Parse(format!("'{name}': '{digits}' is not a number")))
}
