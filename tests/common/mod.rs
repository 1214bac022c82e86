//! Common test utilities and helpers

#![allow(dead_code)] // Not every test file uses every helper

use std::path::{Path, PathBuf};

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// A result CSV with `header_lines` metadata lines. The metadata block
/// carries the three keyed lines plus filler up to the declared length.
pub fn result_csv(header_lines: usize, center: f64, start: f64, stop: f64, power: &[f64]) -> String {
    let mut lines = vec![
        "Tektronix RSA5126B".to_string(),
        format!("Frequency,{center},Hz"),
        format!("XStart,{start},Hz"),
        format!("XStop,{stop},Hz"),
        "Trace,Trace 1,Power".to_string(),
    ];
    while lines.len() < header_lines {
        lines.push(format!("Setting{},value", lines.len()));
    }
    assert_eq!(lines.len(), header_lines, "fixture header too short");
    lines.extend(power.iter().map(|p| p.to_string()));
    lines.join("\n") + "\n"
}

/// A Specan XML trace with the given declared count and `y` values.
pub fn specan_xml(count: usize, start: f64, stop: f64, values: &[f64]) -> String {
    let ys: String = values.iter().map(|v| format!("      <y>{v}</y>\n")).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <RSAPersist>\n\
         <Internal>\n\
           <Composite pid=\"Trace1\">\n\
             <Count>{count}</Count>\n\
             <XStart>{start}</XStart>\n\
             <XStop>{stop}</XStop>\n\
             <XUnits>Hz</XUnits>\n\
             <YUnits>dBm</YUnits>\n\
             <Items>\n{ys}    </Items>\n\
           </Composite>\n\
         </Internal>\n\
         </RSAPersist>\n"
    )
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
