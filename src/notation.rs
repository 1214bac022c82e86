//! Engineering notation.

/// (exponent, 10^exponent, prefix), largest first.
const PREFIXES: [(i32, f64, &str); 17] = [
    (24, 1e24, "Y"),
    (21, 1e21, "Z"),
    (18, 1e18, "E"),
    (15, 1e15, "P"),
    (12, 1e12, "T"),
    (9, 1e9, "G"),
    (6, 1e6, "M"),
    (3, 1e3, "k"),
    (0, 1e0, ""),
    (-3, 1e-3, "m"),
    (-6, 1e-6, "u"),
    (-9, 1e-9, "n"),
    (-12, 1e-12, "p"),
    (-15, 1e-15, "f"),
    (-18, 1e-18, "a"),
    (-21, 1e-21, "z"),
    (-24, 1e-24, "y"),
];

/// Format `value` with an SI prefix and `unit`, e.g. `1.5kHz`.
///
/// Without a unit the magnitude is written as an exponent instead
/// (`1.5e3`). The mantissa is truncated, not rounded, to `decimal_place`
/// decimals.
pub fn get_eng_notation(value: f64, unit: &str, decimal_place: u32) -> String {
    if value == 0.0 {
        return format!("0{unit}");
    }
    if !value.is_finite() {
        return format!("{value}{unit}");
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // Values below 1e-24 still use the smallest prefix.
    let (exponent, power, prefix) = PREFIXES
        .iter()
        .find(|(_, power, _)| magnitude >= *power)
        .copied()
        .unwrap_or(PREFIXES[PREFIXES.len() - 1]);

    let multiplier = match (exponent, unit.is_empty()) {
        (0, _) => String::new(),
        (_, false) => prefix.to_string(),
        (_, true) => format!("e{exponent}"),
    };

    let scale = 10f64.powi(decimal_place as i32);
    let mantissa = (magnitude / power * scale).trunc() / scale;

    format!("{sign}{mantissa:?}{multiplier}{unit}")
}
