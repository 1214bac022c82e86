//! # iqtools: helpers for laboratory IQ data
//!
//! Stateless utilities around in-phase/quadrature recordings and the trace
//! files written by spectrum analyzers.
//!
//! - **dsp**: framed complex spectrogram and its inverse, test signals,
//!   phase shifting, analytic signals
//! - **data**: readers for instrument CSV/XML traces, `.bin`/`.csv`/`.wav`
//!   writers, Parquet and JSON export
//! - **format**: file-extension dispatch
//! - **notation** / **filename**: engineering notation and experiment
//!   filename parsing
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use iqtools::{get_cplx_spectrogram, get_inv_cplx_spectrogram, read_specan_xml};
//! use iqtools::Complex64;
//!
//! let trace = read_specan_xml(Path::new("trace.xml"))?;
//! println!("{} points from {} to {}", trace.len(), trace.start, trace.stop);
//!
//! let x = vec![Complex64::new(1.0, 0.0); 1024];
//! let zz = get_cplx_spectrogram(&x, 16, 64)?;
//! let back = get_inv_cplx_spectrogram(&zz, 16, 64)?;
//! assert_eq!(back.len(), x.len());
//! # Ok::<(), iqtools::IqError>(())
//! ```

pub mod config;
pub mod data;
pub mod dsp;
pub mod error;
pub mod filename;
pub mod format;
pub mod notation;

pub use num_complex::{Complex32, Complex64};

pub use config::{DataCsvLayout, ReaderConfig, ResultCsvLayout};
pub use data::export::{
    write_histogram2d_to_parquet, write_spectrum_to_parquet, write_timedata_to_json,
    write_timedata_to_parquet, Histogram1D, Histogram2D,
};
pub use data::loader::{
    read_data_csv, read_data_csv_with, read_result_csv, read_result_csv_with, read_specan_xml,
};
pub use data::model::{linspace, to_dbm, TimeData, Trace, TraceUnits};
pub use data::schema::{FieldSpec, HeaderMetadata, MetadataSchema};
pub use data::writer::{
    read_signal_from_bin, write_signal_to_bin, write_signal_to_csv, write_signal_to_wav,
    write_spectrum_to_csv, BinRecording,
};
pub use dsp::{
    get_cplx_spectrogram, get_inv_cplx_spectrogram, make_analytical, make_test_signal,
    make_test_signal_with_rng, shift_phase, unwrap_phase, Spectrogram,
};
pub use error::{IqError, Result};
pub use filename::{parse_filename, FilenameInfo};
pub use format::{get_iq_source, FormatRegistry, IqFormat, IqSource};
pub use notation::get_eng_notation;
