use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::TimeData;
use super::writer::with_suffix;
use crate::error::{IqError, Result};

// ---------------------------------------------------------------------------
// Histogram1D – spectrum as a fixed-width histogram
// ---------------------------------------------------------------------------

/// One-dimensional histogram with underflow and overflow bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram1D {
    pub title: String,
    pub x_min: f64,
    pub x_max: f64,
    /// `nbins + 2` values: underflow, the bins, overflow.
    pub contents: Vec<f64>,
}

impl Histogram1D {
    /// Histogram of a center-relative spectrum, spanning
    /// `center + ff[0] ..= center + ff[last]`.
    pub fn from_spectrum(ff: &[f64], pp: &[f64], center: f64, title: &str) -> Result<Self> {
        let (Some(first), Some(last)) = (ff.first(), ff.last()) else {
            return Err(IqError::InvalidInput("empty frequency axis".into()));
        };
        if ff.len() != pp.len() {
            return Err(IqError::InvalidInput(format!(
                "frequency axis has {} points but power has {}",
                ff.len(),
                pp.len()
            )));
        }

        let mut contents = Vec::with_capacity(pp.len() + 2);
        contents.push(0.0);
        contents.extend_from_slice(pp);
        contents.push(0.0);

        Ok(Self {
            title: title.to_string(),
            x_min: center + first,
            x_max: center + last,
            contents,
        })
    }

    pub fn nbins(&self) -> usize {
        self.contents.len().saturating_sub(2)
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        let metadata = HashMap::from([
            ("title".to_string(), self.title.clone()),
            ("x_min".to_string(), self.x_min.to_string()),
            ("x_max".to_string(), self.x_max.to_string()),
            ("nbins".to_string(), self.nbins().to_string()),
        ]);
        let schema = Arc::new(Schema::new_with_metadata(
            vec![
                Field::new("bin", DataType::Int64, false),
                Field::new("content", DataType::Float64, false),
            ],
            metadata,
        ));

        let bins = Int64Array::from_iter_values(0..self.contents.len() as i64);
        let contents = Float64Array::from(self.contents.clone());
        Ok(RecordBatch::try_new(
            schema,
            vec![Arc::new(bins), Arc::new(contents)],
        )?)
    }
}

// ---------------------------------------------------------------------------
// Histogram2D – e.g. a spectrogram over a time/frequency mesh
// ---------------------------------------------------------------------------

/// Two-dimensional histogram over regularly spaced axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2D {
    pub title: String,
    pub x_bins: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_bins: usize,
    pub y_min: f64,
    pub y_max: f64,
    /// `y_bins x x_bins`, row-major.
    pub contents: Vec<f64>,
}

impl Histogram2D {
    /// Build from axis vectors and row-major `z` of shape `len(y) x len(x)`.
    pub fn from_axes(x: &[f64], y: &[f64], z: &[f64], title: &str) -> Result<Self> {
        let (Some(&x_min), Some(&x_max)) = (x.first(), x.last()) else {
            return Err(IqError::InvalidInput("empty x axis".into()));
        };
        let (Some(&y_min), Some(&y_max)) = (y.first(), y.last()) else {
            return Err(IqError::InvalidInput("empty y axis".into()));
        };
        if z.len() != x.len() * y.len() {
            return Err(IqError::Shape {
                len: z.len(),
                nframes: y.len(),
                lframes: x.len(),
            });
        }

        Ok(Self {
            title: title.to_string(),
            x_bins: x.len(),
            x_min,
            x_max,
            y_bins: y.len(),
            y_min,
            y_max,
            contents: z.to_vec(),
        })
    }

    /// Content of bin (`ix`, `iy`).
    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.x_bins || iy >= self.y_bins {
            return None;
        }
        Some(self.contents[iy * self.x_bins + ix])
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        let metadata = HashMap::from([
            ("title".to_string(), self.title.clone()),
            ("x_bins".to_string(), self.x_bins.to_string()),
            ("x_min".to_string(), self.x_min.to_string()),
            ("x_max".to_string(), self.x_max.to_string()),
            ("y_bins".to_string(), self.y_bins.to_string()),
            ("y_min".to_string(), self.y_min.to_string()),
            ("y_max".to_string(), self.y_max.to_string()),
        ]);
        let schema = Arc::new(Schema::new_with_metadata(
            vec![
                Field::new("x_bin", DataType::Int64, false),
                Field::new("y_bin", DataType::Int64, false),
                Field::new("content", DataType::Float64, false),
            ],
            metadata,
        ));

        let n = self.contents.len();
        let x_bin = Int64Array::from_iter_values((0..n).map(|i| (i % self.x_bins) as i64));
        let y_bin = Int64Array::from_iter_values((0..n).map(|i| (i / self.x_bins) as i64));
        let contents = Float64Array::from(self.contents.clone());
        Ok(RecordBatch::try_new(
            schema,
            vec![Arc::new(x_bin), Arc::new(y_bin), Arc::new(contents)],
        )?)
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write a spectrum histogram to `<base>.parquet`.
pub fn write_spectrum_to_parquet(
    base: &Path,
    ff: &[f64],
    pp: &[f64],
    center: f64,
    title: &str,
) -> Result<PathBuf> {
    let hist = Histogram1D::from_spectrum(ff, pp, center, title)?;
    let path = with_suffix(base, "parquet");
    write_batch(&path, &hist.to_record_batch()?)?;
    Ok(path)
}

/// Write a 2-D histogram to `<base>.parquet`.
pub fn write_histogram2d_to_parquet(base: &Path, hist: &Histogram2D) -> Result<PathBuf> {
    let path = with_suffix(base, "parquet");
    write_batch(&path, &hist.to_record_batch()?)?;
    Ok(path)
}

/// Write the instantaneous power of a recording to `<base>.parquet`.
///
/// Sampling and center frequency are stored, truncated to integers, as
/// schema metadata `f_samp` and `f_center`.
pub fn write_timedata_to_parquet(base: &Path, data: &TimeData) -> Result<PathBuf> {
    let metadata = HashMap::from([
        ("f_samp".to_string(), (data.fs as i64).to_string()),
        ("f_center".to_string(), (data.center as i64).to_string()),
    ]);
    let schema = Arc::new(Schema::new_with_metadata(
        vec![Field::new("timedata", DataType::Float64, false)],
        metadata,
    ));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(data.power()))])?;

    let path = with_suffix(base, "parquet");
    write_batch(&path, &batch)?;
    Ok(path)
}

/// Dump the whole recording as JSON to `<base>.json`.
pub fn write_timedata_to_json(base: &Path, data: &TimeData) -> Result<PathBuf> {
    let path = with_suffix(base, "json");
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut writer, data)
        .map_err(|e| IqError::Serialization(e.to_string()))?;
    writer.flush()?;
    log::info!("Wrote time data to {}", path.display());
    Ok(path)
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}
