//! Signal synthesis and phase manipulation.

use std::f64::consts::PI;

use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::fft::{fft, fft_in_place, ifft_in_place};
use crate::error::{IqError, Result};

/// Sum of harmonics of `f`, sampled at `fs` for `length` seconds.
///
/// Harmonic orders `1..=nharm + 2` are summed with unit amplitude, so
/// `nharm = 0` gives `sin(2πft) + sin(4πft)`. With `noise` set, unit
/// variance Gaussian noise is added. Returns `(t, x)`.
pub fn make_test_signal(
    f: f64,
    fs: f64,
    length: f64,
    nharm: usize,
    noise: bool,
) -> Result<(Vec<f64>, Vec<f64>)> {
    make_test_signal_with_rng(f, fs, length, nharm, noise, &mut rand::thread_rng())
}

/// [`make_test_signal`] with an explicit random source for the noise.
pub fn make_test_signal_with_rng<R: Rng + ?Sized>(
    f: f64,
    fs: f64,
    length: f64,
    nharm: usize,
    noise: bool,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if !(fs.is_finite() && fs > 0.0) {
        return Err(IqError::InvalidInput(format!(
            "sampling frequency must be positive, got {fs}"
        )));
    }
    if !(length.is_finite() && length >= 0.0) {
        return Err(IqError::InvalidInput(format!(
            "signal length must be non-negative, got {length}"
        )));
    }

    let n = (length * fs).ceil() as usize;
    let t: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
    let mut x: Vec<f64> = t
        .iter()
        .map(|&ti| {
            (1..=nharm + 2)
                .map(|k| (2.0 * PI * k as f64 * f * ti).sin())
                .sum()
        })
        .collect();

    if noise {
        for v in x.iter_mut() {
            let z: f64 = StandardNormal.sample(rng);
            *v += z;
        }
    }

    Ok((t, x))
}

/// Remove jumps larger than π between consecutive phase values by adding
/// multiples of 2π.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);

    let mut correction = 0.0;
    for pair in phase.windows(2) {
        let d = pair[1] - pair[0];
        let mut dmod = (d + PI).rem_euclid(2.0 * PI) - PI;
        if dmod == -PI && d > 0.0 {
            dmod = PI;
        }
        if d.abs() >= PI {
            correction += dmod - d;
        }
        out.push(pair[1] + correction);
    }
    out
}

/// Rotate the phase spectrum of `x` by `phase` radians.
///
/// The magnitude spectrum is kept as is; only the (unwrapped) phase of every
/// bin is offset.
pub fn shift_phase(x: &[Complex64], phase: f64) -> Vec<Complex64> {
    let mut spectrum = x.to_vec();
    fft_in_place(&mut spectrum);

    let angles: Vec<f64> = spectrum.iter().map(|z| z.arg()).collect();
    for (bin, angle) in spectrum.iter_mut().zip(unwrap_phase(&angles)) {
        *bin = Complex64::from_polar(bin.norm(), angle + phase);
    }

    ifft_in_place(&mut spectrum);
    spectrum
}

/// Analytic signal of a real sequence and its instantaneous phase in degrees.
///
/// The imaginary part is the Hilbert transform of `x`, computed by zeroing
/// the negative frequencies of the spectrum.
pub fn make_analytical(x: &[f64]) -> Result<(Vec<Complex64>, Vec<f64>)> {
    if x.is_empty() {
        return Err(IqError::InvalidInput(
            "cannot build the analytic signal of an empty sequence".into(),
        ));
    }

    let n = x.len();
    let input: Vec<Complex64> = x.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut spectrum = fft(&input);

    // DC and (for even n) Nyquist stay, positive frequencies double.
    let positive_end = n.div_ceil(2);
    for bin in spectrum.iter_mut().take(positive_end).skip(1) {
        *bin *= 2.0;
    }
    let negative_start = if n % 2 == 0 { n / 2 + 1 } else { positive_end };
    for bin in spectrum.iter_mut().skip(negative_start) {
        *bin = Complex64::new(0.0, 0.0);
    }

    ifft_in_place(&mut spectrum);
    let phase_deg = spectrum.iter().map(|z| z.arg().to_degrees()).collect();
    Ok((spectrum, phase_deg))
}
