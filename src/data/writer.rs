use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_complex::Complex64;

use super::model::to_dbm;
use crate::error::{IqError, Result};

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// `base` with `.ext` appended (an existing extension is kept, not replaced).
pub fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// Raw binary
// ---------------------------------------------------------------------------

/// Write `cx` to `<base>.bin` as little-endian complex64 (f32 re, f32 im).
///
/// With `write_header` the first record is `complex(fs, center)`.
pub fn write_signal_to_bin(
    base: &Path,
    cx: &[Complex64],
    fs: f64,
    center: f64,
    write_header: bool,
) -> Result<PathBuf> {
    let path = with_suffix(base, "bin");
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    if write_header {
        writer.write_f32::<LittleEndian>(fs as f32)?;
        writer.write_f32::<LittleEndian>(center as f32)?;
    }
    for sample in cx {
        writer.write_f32::<LittleEndian>(sample.re as f32)?;
        writer.write_f32::<LittleEndian>(sample.im as f32)?;
    }

    writer.flush()?;
    log::info!("Wrote {} samples to {}", cx.len(), path.display());
    Ok(path)
}

/// Contents of a `.bin` recording.
#[derive(Debug, Clone, PartialEq)]
pub struct BinRecording {
    /// Sampling frequency from the header record.
    pub fs: Option<f64>,
    /// Center frequency from the header record.
    pub center: Option<f64>,
    pub samples: Vec<Complex64>,
}

/// Read a file written by [`write_signal_to_bin`].
pub fn read_signal_from_bin(path: &Path, has_header: bool) -> Result<BinRecording> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;

    if bytes.len() % 8 != 0 {
        return Err(IqError::Parse(format!(
            "{}: {} bytes is not a whole number of complex64 samples",
            path.display(),
            bytes.len()
        )));
    }

    let mut reader = bytes.as_slice();
    let mut samples = Vec::with_capacity(bytes.len() / 8);
    while !reader.is_empty() {
        let re = reader.read_f32::<LittleEndian>()? as f64;
        let im = reader.read_f32::<LittleEndian>()? as f64;
        samples.push(Complex64::new(re, im));
    }

    let (fs, center) = if has_header {
        if samples.is_empty() {
            return Err(IqError::Parse(format!(
                "{}: header record missing",
                path.display()
            )));
        }
        let header = samples.remove(0);
        (Some(header.re), Some(header.im))
    } else {
        (None, None)
    };

    Ok(BinRecording {
        fs,
        center,
        samples,
    })
}

// ---------------------------------------------------------------------------
// Pipe-delimited text
// ---------------------------------------------------------------------------

/// Write `cx` to `<base>.csv` as `re|im` lines.
///
/// The first line holds `fs|center`, written like a complex sample.
pub fn write_signal_to_csv(base: &Path, cx: &[Complex64], fs: f64, center: f64) -> Result<PathBuf> {
    let path = with_suffix(base, "csv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_path(&path)?;

    writer.serialize((fs, center))?;
    for sample in cx {
        writer.serialize((sample.re, sample.im))?;
    }

    writer.flush()?;
    log::info!("Wrote {} samples to {}", cx.len(), path.display());
    Ok(path)
}

/// Write a spectrum as `Δf|P[W]|P[dBm]` rows to `path`.
///
/// `ff` is relative to `center`, which is recorded in the header line.
pub fn write_spectrum_to_csv(path: &Path, ff: &[f64], pp: &[f64], center: f64) -> Result<()> {
    if ff.len() != pp.len() {
        return Err(IqError::InvalidInput(format!(
            "frequency axis has {} points but power has {}",
            ff.len(),
            pp.len()
        )));
    }

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(
        file,
        "# Delta f [Hz] @ {} [Hz]|Power [W]|Power [dBm]",
        format_sci(center, 2)
    )?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_writer(file);
    for (&f, &p) in ff.iter().zip(pp) {
        writer.serialize((f, p, to_dbm(p)))?;
    }
    writer.flush()?;
    Ok(())
}

/// `%.<precision>e` with a signed, two-digit exponent (`1.20e+09`).
fn format_sci(value: f64, precision: usize) -> String {
    let formatted = format!("{value:.precision$e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

// ---------------------------------------------------------------------------
// WAV
// ---------------------------------------------------------------------------

/// Write the magnitude of `cx`, normalized to a peak of 1.0, to `<base>.wav`
/// as mono 32-bit float audio.
///
/// Only `|cx|` is kept; the phase is lost.
pub fn write_signal_to_wav(base: &Path, cx: &[Complex64], fs: u32) -> Result<PathBuf> {
    let peak = cx.iter().map(|s| s.norm()).fold(0.0_f64, f64::max);
    if !(peak > 0.0 && peak.is_finite()) {
        return Err(IqError::InvalidInput(
            "cannot normalize a signal without a finite, non-zero peak".into(),
        ));
    }
    if fs == 0 {
        return Err(IqError::InvalidInput("sample rate must be positive".into()));
    }

    let path = with_suffix(base, "wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: fs,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for sample in cx {
        writer.write_sample((sample.norm() / peak) as f32)?;
    }
    writer.finalize()?;

    log::info!("Wrote {} samples to {}", cx.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended() {
        assert_eq!(
            with_suffix(Path::new("out/sig"), "bin"),
            PathBuf::from("out/sig.bin")
        );
        assert_eq!(
            with_suffix(Path::new("run.1"), "csv"),
            PathBuf::from("run.1.csv")
        );
    }

    #[test]
    fn sci_format_matches_printf() {
        assert_eq!(format_sci(1.2e9, 2), "1.20e+09");
        assert_eq!(format_sci(0.0, 2), "0.00e+00");
        assert_eq!(format_sci(-4.5e-3, 2), "-4.50e-03");
        assert_eq!(format_sci(1e100, 1), "1.0e+100");
    }

    #[test]
    fn bin_round_trip_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let cx = vec![Complex64::new(0.5, -0.25), Complex64::new(1.0, 2.0)];
        let path = write_signal_to_bin(&dir.path().join("sig"), &cx, 1e6, 4.1e8, true).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24);

        let rec = read_signal_from_bin(&path, true).unwrap();
        assert_eq!(rec.fs, Some(1e6));
        assert_eq!(rec.center, Some(4.1e8));
        assert_eq!(rec.samples, cx);
    }

    #[test]
    fn bin_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let cx = vec![Complex64::new(3.0, 4.0)];
        let path = write_signal_to_bin(&dir.path().join("raw"), &cx, 1.0, 0.0, false).unwrap();
        let rec = read_signal_from_bin(&path, false).unwrap();
        assert_eq!(rec.fs, None);
        assert_eq!(rec.samples, cx);
    }

    #[test]
    fn truncated_bin_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, [0u8; 12]).unwrap();
        assert!(read_signal_from_bin(&path, false).unwrap_err().is_parse());
    }

    #[test]
    fn csv_has_header_record() {
        let dir = tempfile::tempdir().unwrap();
        let cx = vec![Complex64::new(1.5, -2.0), Complex64::new(0.0, 0.25)];
        let path = write_signal_to_csv(&dir.path().join("sig"), &cx, 2.0, 3.0).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["2.0|3.0", "1.5|-2.0", "0.0|0.25"]);
    }

    #[test]
    fn spectrum_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        write_spectrum_to_csv(&path, &[-1.0, 1.0], &[1e-3, 1.0], 1.2e9).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Delta f [Hz] @ 1.20e+09 [Hz]|Power [W]|Power [dBm]");
        assert_eq!(lines[1], "-1.0|0.001|0.0");
        assert_eq!(lines[2], "1.0|1.0|30.0");
    }

    #[test]
    fn spectrum_csv_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.csv");
        assert!(write_spectrum_to_csv(&path, &[1.0], &[], 0.0).is_err());
    }

    #[test]
    fn wav_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let cx = vec![
            Complex64::new(3.0, 4.0),
            Complex64::new(0.0, 2.5),
            Complex64::new(0.0, 0.0),
        ];
        let path = write_signal_to_wav(&dir.path().join("sig"), &cx, 8000).unwrap();
        let mut reader = hound::WavReader::open(path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn wav_rejects_silent_signal() {
        let dir = tempfile::tempdir().unwrap();
        let cx = vec![Complex64::new(0.0, 0.0); 4];
        assert!(write_signal_to_wav(&dir.path().join("s"), &cx, 8000).is_err());
        assert!(write_signal_to_wav(&dir.path().join("e"), &[], 8000).is_err());
    }
}
