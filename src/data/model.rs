use num_complex::Complex64;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// `n` evenly spaced values from `start` to `stop`, both ends included.
///
/// The last value is exactly `stop`; `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            axis[n - 1] = stop;
            axis
        }
    }
}

/// Convert power in watts to dBm.
pub fn to_dbm(watts: f64) -> f64 {
    10.0 * (watts / 1e-3).log10()
}

// ---------------------------------------------------------------------------
// Trace – one analyzer sweep
// ---------------------------------------------------------------------------

/// Axis unit labels declared by the instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceUnits {
    pub x: String,
    pub y: String,
}

/// A frequency-vs-power sweep exported by a spectrum analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Frequency axis. Relative to `center` when one is set, absolute otherwise.
    pub frequencies: Vec<f64>,
    /// Power values – same length as `frequencies`.
    pub power: Vec<f64>,
    /// Lower sweep bound, absolute.
    pub start: f64,
    /// Upper sweep bound, absolute.
    pub stop: f64,
    pub center: Option<f64>,
    pub units: Option<TraceUnits>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Frequency axis shifted back to absolute frequencies.
    pub fn absolute_frequencies(&self) -> Vec<f64> {
        let offset = self.center.unwrap_or(0.0);
        self.frequencies.iter().map(|f| f + offset).collect()
    }

    /// Power values converted from watts to dBm.
    pub fn power_dbm(&self) -> Vec<f64> {
        self.power.iter().map(|&p| to_dbm(p)).collect()
    }

    /// Frequency and power of the strongest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.power
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, &p)| (self.frequencies[i], p))
    }
}

// ---------------------------------------------------------------------------
// TimeData – a recording in the time domain
// ---------------------------------------------------------------------------

/// Complex baseband samples with their sampling and center frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeData {
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// Center frequency in Hz.
    pub center: f64,
    pub samples: Vec<Complex64>,
}

impl TimeData {
    pub fn new(fs: f64, center: f64, samples: Vec<Complex64>) -> Self {
        Self {
            fs,
            center,
            samples,
        }
    }

    /// Instantaneous power `|x|²` of every sample.
    pub fn power(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.norm_sqr()).collect()
    }

    /// Recording length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.fs
    }
}
