//! Thin wrappers around `rustfft` for whole-buffer transforms.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// In-place forward DFT, unnormalized.
pub fn fft_in_place(buffer: &mut [Complex64]) {
    if buffer.is_empty() {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buffer.len()).process(buffer);
}

/// In-place inverse DFT, scaled by `1/N` so that it undoes [`fft_in_place`].
pub fn ifft_in_place(buffer: &mut [Complex64]) {
    if buffer.is_empty() {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(buffer.len()).process(buffer);
    let scale = 1.0 / buffer.len() as f64;
    for v in buffer.iter_mut() {
        *v *= scale;
    }
}

pub fn fft(input: &[Complex64]) -> Vec<Complex64> {
    let mut buffer = input.to_vec();
    fft_in_place(&mut buffer);
    buffer
}

pub fn ifft(input: &[Complex64]) -> Vec<Complex64> {
    let mut buffer = input.to_vec();
    ifft_in_place(&mut buffer);
    buffer
}
