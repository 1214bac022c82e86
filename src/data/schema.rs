use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IqError, Result};

// ---------------------------------------------------------------------------
// FieldSpec – one keyed metadata line
// ---------------------------------------------------------------------------

/// Describes a metadata line in an instrument header block.
///
/// A line matches when its first comma-separated field equals `key` and it
/// has exactly `field_count` fields; the value is read from field
/// `value_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub field_count: usize,
    pub value_index: usize,
}

impl FieldSpec {
    /// The `key,value,unit` shape used by Tektronix result files.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_count: 3,
            value_index: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// HeaderMetadata – evaluated key/value scalars
// ---------------------------------------------------------------------------

/// Numeric header values extracted from a file, keyed by [`FieldSpec::key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMetadata {
    values: BTreeMap<String, f64>,
}

impl HeaderMetadata {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Like [`get`](Self::get) but a missing key is a parse error.
    pub fn require(&self, key: &str) -> Result<f64> {
        self.get(key)
            .ok_or_else(|| IqError::Parse(format!("header field '{key}' not found")))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MetadataSchema – evaluated once per file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataSchema {
    fields: Vec<FieldSpec>,
}

impl MetadataSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Scan `text` line by line and collect every declared field.
    ///
    /// When a key occurs on several matching lines the last one wins. Every
    /// declared key must be found, otherwise a parse error is returned.
    pub fn evaluate(&self, text: &str) -> Result<HeaderMetadata> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let mut values = BTreeMap::new();
        for (line_no, result) in reader.records().enumerate() {
            let record = result?;
            let Some(first) = record.get(0) else {
                continue;
            };
            let first = first.trim();

            for spec in &self.fields {
                if record.len() != spec.field_count || first != spec.key {
                    continue;
                }
                let raw = record.get(spec.value_index).unwrap_or("").trim();
                let value = raw.parse::<f64>().map_err(|_| {
                    IqError::Parse(format!(
                        "line {}: value '{raw}' for '{}' is not a number",
                        line_no + 1,
                        spec.key
                    ))
                })?;
                values.insert(spec.key.clone(), value);
            }
        }

        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|spec| !values.contains_key(&spec.key))
            .map(|spec| spec.key.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(IqError::Parse(format!(
                "missing header field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(HeaderMetadata { values })
    }
}
