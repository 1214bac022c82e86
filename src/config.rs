//! Reader configuration
//!
//! Header layouts of the instrument text formats. The defaults match the
//! files written by the Tektronix RSA5000/RSA5100 series; a [`ReaderConfig`]
//! can be loaded from TOML when an instrument firmware shifts its header.
//!
//! ```toml
//! [result_csv]
//! header_lines = 63
//!
//! [result_csv.center]
//! key = "Frequency"
//! field_count = 3
//! value_index = 1
//!
//! [data_csv]
//! header_lines = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::schema::{FieldSpec, MetadataSchema};
use crate::error::{IqError, Result, ResultExt};

/// Header lines in front of the power values of an RSA5000 result CSV.
pub const RESULT_CSV_HEADER_LINES: usize = 63;

/// Header lines in front of the IQ pairs of an RSA5100 data CSV.
pub const DATA_CSV_HEADER_LINES: usize = 10;

/// Layout of a power-trace CSV with a keyed metadata header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCsvLayout {
    /// Lines skipped before the numeric body starts.
    pub header_lines: usize,
    pub center: FieldSpec,
    pub start: FieldSpec,
    pub stop: FieldSpec,
}

impl Default for ResultCsvLayout {
    fn default() -> Self {
        Self {
            header_lines: RESULT_CSV_HEADER_LINES,
            center: FieldSpec::new("Frequency"),
            start: FieldSpec::new("XStart"),
            stop: FieldSpec::new("XStop"),
        }
    }
}

impl ResultCsvLayout {
    /// Schema covering the center, start and stop fields.
    pub fn schema(&self) -> MetadataSchema {
        MetadataSchema::new(vec![
            self.center.clone(),
            self.start.clone(),
            self.stop.clone(),
        ])
    }
}

/// Layout of a complex-sample CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCsvLayout {
    pub header_lines: usize,
}

impl Default for DataCsvLayout {
    fn default() -> Self {
        Self {
            header_lines: DATA_CSV_HEADER_LINES,
        }
    }
}

/// All reader layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub result_csv: ResultCsvLayout,
    pub data_csv: DataCsvLayout,
}

impl ReaderConfig {
    /// Parse a configuration from TOML text. Missing tables keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ReaderConfig =
            toml::from_str(text).map_err(|e| IqError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config =
            Self::from_toml_str(&text).with_context(|| format!("loading {}", path.display()))?;
        log::debug!("Loaded reader config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| IqError::Serialization(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let layout = &self.result_csv;
        for spec in [&layout.center, &layout.start, &layout.stop] {
            if spec.key.is_empty() {
                return Err(IqError::Config("metadata key must not be empty".into()));
            }
            if spec.value_index >= spec.field_count {
                return Err(IqError::Config(format!(
                    "'{}': value_index {} is outside {} fields",
                    spec.key, spec.value_index, spec.field_count
                )));
            }
        }
        Ok(())
    }
}
