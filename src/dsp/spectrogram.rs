//! Complex spectrogram
//!
//! A flat sample sequence is reshaped row-major into `nframes` frames of
//! `lframes` samples and every frame is transformed independently. The
//! inverse undoes this exactly (up to floating-point error).

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::{IqError, Result};

/// A `nframes x lframes` matrix of spectra, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    nframes: usize,
    lframes: usize,
    bins: Vec<Complex64>,
}

impl Spectrogram {
    /// Wrap row-major data, checking that it fills the grid exactly.
    pub fn from_vec(bins: Vec<Complex64>, nframes: usize, lframes: usize) -> Result<Self> {
        check_shape(bins.len(), nframes, lframes)?;
        Ok(Self {
            nframes,
            lframes,
            bins,
        })
    }

    pub fn nframes(&self) -> usize {
        self.nframes
    }

    pub fn lframes(&self) -> usize {
        self.lframes
    }

    /// Spectrum of frame `index`.
    pub fn frame(&self, index: usize) -> Option<&[Complex64]> {
        if index >= self.nframes {
            return None;
        }
        let start = index * self.lframes;
        Some(&self.bins[start..start + self.lframes])
    }

    pub fn frames(&self) -> impl Iterator<Item = &[Complex64]> {
        self.bins.chunks_exact(self.lframes)
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.bins
    }

    pub fn into_vec(self) -> Vec<Complex64> {
        self.bins
    }

    /// `|z|²` of every bin, row-major.
    pub fn power(&self) -> Vec<f64> {
        self.bins.iter().map(|z| z.norm_sqr()).collect()
    }
}

/// Reshape `x` into `nframes` frames of `lframes` samples and take the DFT
/// of each frame (forward convention, no normalization).
pub fn get_cplx_spectrogram(x: &[Complex64], nframes: usize, lframes: usize) -> Result<Spectrogram> {
    check_shape(x.len(), nframes, lframes)?;

    let mut bins = x.to_vec();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(lframes);
    // rustfft processes consecutive chunks of the plan length
    fft.process(&mut bins);

    Ok(Spectrogram {
        nframes,
        lframes,
        bins,
    })
}

/// Inverse of [`get_cplx_spectrogram`]: per-frame inverse DFT (scaled by
/// `1/lframes`), flattened back to a single sequence.
pub fn get_inv_cplx_spectrogram(
    zz: &Spectrogram,
    nframes: usize,
    lframes: usize,
) -> Result<Vec<Complex64>> {
    if zz.nframes != nframes || zz.lframes != lframes {
        return Err(IqError::Shape {
            len: zz.bins.len(),
            nframes,
            lframes,
        });
    }

    let mut samples = zz.bins.clone();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(lframes).process(&mut samples);

    let scale = 1.0 / lframes as f64;
    for s in samples.iter_mut() {
        *s *= scale;
    }
    Ok(samples)
}

fn check_shape(len: usize, nframes: usize, lframes: usize) -> Result<()> {
    let fits = nframes > 0
        && lframes > 0
        && nframes.checked_mul(lframes).is_some_and(|total| total == len);
    if fits {
        Ok(())
    } else {
        Err(IqError::Shape {
            len,
            nframes,
            lframes,
        })
    }
}
