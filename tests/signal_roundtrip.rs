//! Round-trip laws of the transforms and the signal file formats

mod common;

use common::assert_float_eq;
use iqtools::dsp::fft::fft;
use iqtools::{
    get_cplx_spectrogram, get_inv_cplx_spectrogram, make_test_signal, read_signal_from_bin,
    shift_phase, write_signal_to_bin, write_spectrum_to_csv, Complex64,
};
use proptest::prelude::*;

fn samples(
    max_frames: usize,
    max_len: usize,
) -> impl Strategy<Value = (Vec<Complex64>, usize, usize)> {
    (1..=max_frames, 1..=max_len).prop_flat_map(|(n, l)| {
        (
            prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), n * l),
            Just(n),
            Just(l),
        )
            .prop_map(|(pairs, n, l)| {
                let x: Vec<Complex64> = pairs
                    .into_iter()
                    .map(|(re, im)| Complex64::new(re, im))
                    .collect();
                (x, n, l)
            })
    })
}

fn max_norm(x: &[Complex64]) -> f64 {
    x.iter().map(|z| z.norm()).fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn spectrogram_round_trip((x, n, l) in samples(8, 64)) {
        let zz = get_cplx_spectrogram(&x, n, l).unwrap();
        let back = get_inv_cplx_spectrogram(&zz, n, l).unwrap();
        prop_assert_eq!(back.len(), x.len());
        let scale = max_norm(&x).max(1.0);
        for (a, b) in x.iter().zip(&back) {
            prop_assert!((a - b).norm() <= 1e-9 * scale);
        }
    }

    #[test]
    fn spectrogram_rejects_wrong_grid((x, n, l) in samples(6, 16)) {
        prop_assert!(get_cplx_spectrogram(&x, n + 1, l).is_err());
    }

    #[test]
    fn phase_shift_preserves_magnitude_spectrum(
        (x, _, _) in samples(1, 64),
        phase in -10.0f64..10.0,
    ) {
        let before = fft(&x);
        let after = fft(&shift_phase(&x, phase));
        let scale = max_norm(&before).max(1.0);
        for (a, b) in before.iter().zip(&after) {
            prop_assert!((a.norm() - b.norm()).abs() <= 1e-9 * scale);
        }
    }
}

#[test]
fn test_signal_spans_one_second() {
    let (t, x) = make_test_signal(10.0, 1000.0, 1.0, 0, false).unwrap();
    assert_eq!(t.len(), 1000);
    assert_float_eq(t[999], 0.999, 1e-12);
    let i = 123;
    let expected = (2.0 * std::f64::consts::PI * 10.0 * t[i]).sin()
        + (2.0 * std::f64::consts::PI * 20.0 * t[i]).sin();
    assert_float_eq(x[i], expected, 1e-12);
}

#[test]
fn generated_signal_survives_bin_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, x) = make_test_signal(50.0, 1000.0, 0.1, 1, false).unwrap();
    let cx: Vec<Complex64> = x.iter().map(|&v| Complex64::new(v, 0.0)).collect();

    let path = write_signal_to_bin(&dir.path().join("tone"), &cx, 1000.0, 0.0, true).unwrap();
    let rec = read_signal_from_bin(&path, true).unwrap();
    assert_eq!(rec.fs, Some(1000.0));
    assert_eq!(rec.samples.len(), cx.len());
    for (a, b) in cx.iter().zip(&rec.samples) {
        // stored as f32
        assert_float_eq(a.re, b.re, 1e-6);
        assert_eq!(b.im, 0.0);
    }
}

#[test]
fn spectrum_csv_matches_spectrogram_power() {
    let dir = tempfile::tempdir().unwrap();
    let x: Vec<Complex64> = (0..16)
        .map(|i| Complex64::from_polar(1.0, 2.0 * std::f64::consts::PI * 2.0 * i as f64 / 16.0))
        .collect();
    let zz = get_cplx_spectrogram(&x, 1, 16).unwrap();
    let power = zz.power();
    let ff: Vec<f64> = (0..16).map(|i| i as f64).collect();

    let path = dir.path().join("spectrum.csv");
    write_spectrum_to_csv(&path, &ff, &power, 0.0).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let row: Vec<f64> = text
        .lines()
        .nth(3)
        .unwrap()
        .split('|')
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(row[0], 2.0);
    assert_float_eq(row[1], 256.0, 1e-9);
}
