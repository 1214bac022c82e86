use std::path::Path;

use anyhow::{Context, Result};
use iqtools::{
    get_cplx_spectrogram, get_eng_notation, linspace, make_analytical, make_test_signal_with_rng,
    write_histogram2d_to_parquet, write_signal_to_bin, write_signal_to_csv, write_signal_to_wav,
    write_timedata_to_parquet, Histogram2D, TimeData,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FS: f64 = 48_000.0;
const CENTER: f64 = 245e6;
const TONE: f64 = 1_000.0;
const NFRAMES: usize = 375;
const LFRAMES: usize = 128;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);

    // 1 s of a 1 kHz tone with three harmonics and noise
    let (_, x) = make_test_signal_with_rng(TONE, FS, 1.0, 1, true, &mut rng)
        .context("generating test signal")?;
    let (analytic, _) = make_analytical(&x).context("building analytic signal")?;

    let base = Path::new("test_signal");
    let bin = write_signal_to_bin(base, &analytic, FS, CENTER, true)?;
    let csv = write_signal_to_csv(base, &analytic, FS, CENTER)?;
    let wav = write_signal_to_wav(base, &analytic, FS as u32)?;

    let data = TimeData::new(FS, CENTER, analytic);
    let td = write_timedata_to_parquet(Path::new("test_signal_timedata"), &data)?;

    // Spectrogram power over a (frequency, time) mesh
    let zz = get_cplx_spectrogram(&data.samples[..NFRAMES * LFRAMES], NFRAMES, LFRAMES)
        .context("computing spectrogram")?;
    let freqs = linspace(0.0, FS * (LFRAMES - 1) as f64 / LFRAMES as f64, LFRAMES);
    let times = linspace(0.0, (NFRAMES - 1) as f64 * LFRAMES as f64 / FS, NFRAMES);
    let hist = Histogram2D::from_axes(&freqs, &times, &zz.power(), "test signal spectrogram")?;
    let sg = write_histogram2d_to_parquet(Path::new("test_signal_spectrogram"), &hist)?;

    println!(
        "Wrote {} samples at {} around {} to:",
        data.samples.len(),
        get_eng_notation(FS, "Hz", 2),
        get_eng_notation(CENTER, "Hz", 2),
    );
    for path in [bin, csv, wav, td, sg] {
        println!("  {}", path.display());
    }
    Ok(())
}
