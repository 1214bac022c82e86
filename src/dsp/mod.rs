//! Signal-processing helpers
//!
//! - **fft**: whole-buffer forward/inverse transforms
//! - **spectrogram**: framed complex spectrogram and its inverse
//! - **signal**: test signals, phase shifting, analytic signals

pub mod fft;
pub mod signal;
pub mod spectrogram;

pub use signal::{
    make_analytical, make_test_signal, make_test_signal_with_rng, shift_phase, unwrap_phase,
};
pub use spectrogram::{get_cplx_spectrogram, get_inv_cplx_spectrogram, Spectrogram};
