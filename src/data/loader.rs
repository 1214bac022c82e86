use std::path::Path;

use num_complex::Complex64;

use super::model::{linspace, Trace, TraceUnits};
use crate::config::{DataCsvLayout, ResultCsvLayout};
use crate::error::{IqError, Result, ResultExt};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a result CSV saved by the RSA5000 series.
///
/// Frequencies of the returned trace are relative to the center frequency
/// found in the header.
pub fn read_result_csv(path: &Path) -> Result<Trace> {
    read_result_csv_with(path, &ResultCsvLayout::default())
}

/// Read the IQ samples of a data CSV saved by the RSA5100 series.
///
/// The 50 Ω termination is already accounted for in these files.
pub fn read_data_csv(path: &Path) -> Result<Vec<Complex64>> {
    read_data_csv_with(path, &DataCsvLayout::default())
}

/// Read a trace saved from the Specan view of the RSA5000 series.
///
/// Frequencies of the returned trace are absolute.
pub fn read_specan_xml(path: &Path) -> Result<Trace> {
    let text = read_text(path)?;
    parse_specan_xml(&text).context(path.display().to_string())
}

// ---------------------------------------------------------------------------
// Result CSV (power trace)
// ---------------------------------------------------------------------------

/// Layout:
///
/// ```text
/// <header_lines lines of metadata, e.g. "Frequency,1.2E+9,Hz">
/// -85.13
/// -84.97
/// ...
/// ```
pub fn read_result_csv_with(path: &Path, layout: &ResultCsvLayout) -> Result<Trace> {
    let text = read_text(path)?;
    parse_result_csv(&text, layout).context(path.display().to_string())
}

fn parse_result_csv(text: &str, layout: &ResultCsvLayout) -> Result<Trace> {
    let body = skip_lines(text, layout.header_lines)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut power = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != 1 {
            return Err(IqError::Parse(format!(
                "data row {row_no}: expected a single value, found {}",
                record.len()
            )));
        }
        power.push(parse_number(&record[0], row_no, 0)?);
    }

    let meta = layout.schema().evaluate(text)?;
    let center = meta.require(&layout.center.key)?;
    let start = meta.require(&layout.start.key)?;
    let stop = meta.require(&layout.stop.key)?;
    log::debug!(
        "Result CSV: {} points, center {center}, span {start}..{stop}",
        power.len()
    );

    Ok(Trace {
        frequencies: linspace(start - center, stop - center, power.len()),
        power,
        start,
        stop,
        center: Some(center),
        units: None,
    })
}

// ---------------------------------------------------------------------------
// Data CSV (complex samples)
// ---------------------------------------------------------------------------

/// Layout: `header_lines` lines of metadata followed by comma-separated rows.
/// All values, taken row by row, are consecutive `re, im` pairs.
pub fn read_data_csv_with(path: &Path, layout: &DataCsvLayout) -> Result<Vec<Complex64>> {
    let text = read_text(path)?;
    parse_data_csv(&text, layout).context(path.display().to_string())
}

fn parse_data_csv(text: &str, layout: &DataCsvLayout) -> Result<Vec<Complex64>> {
    let body = skip_lines(text, layout.header_lines)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut values = Vec::new();
    let mut width = None;
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let expected = *width.get_or_insert(record.len());
        if record.len() != expected {
            return Err(IqError::Parse(format!(
                "data row {row_no}: expected {expected} values, found {}",
                record.len()
            )));
        }
        for (col, field) in record.iter().enumerate() {
            values.push(parse_number(field, row_no, col)?);
        }
    }

    if values.len() % 2 != 0 {
        return Err(IqError::Parse(format!(
            "odd number of values ({}) cannot form re/im pairs",
            values.len()
        )));
    }

    let samples: Vec<Complex64> = values
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
        .collect();
    log::debug!("Data CSV: {} IQ samples", samples.len());
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Specan XML
// ---------------------------------------------------------------------------

/// Expected shape (element nesting varies between firmware versions, only
/// tag names matter):
///
/// ```xml
/// <Trace>
///   <Count>801</Count>
///   <XStart>1.0E+9</XStart>
///   <XStop>1.2E+9</XStop>
///   <XUnits>Hz</XUnits>
///   <YUnits>dBm</YUnits>
///   <y>-85.1</y>
///   ...
/// </Trace>
/// ```
fn parse_specan_xml(text: &str) -> Result<Trace> {
    let doc = roxmltree::Document::parse(text.trim_start_matches('\u{feff}'))
        .map_err(|e| IqError::Parse(format!("malformed XML: {e}")))?;

    let mut count = None;
    let mut start = None;
    let mut stop = None;
    let mut xunits = None;
    let mut yunits = None;
    let mut power = Vec::new();

    for node in doc.descendants().filter(|n| n.is_element()) {
        let text = node.text().unwrap_or("").trim();
        match node.tag_name().name() {
            "Count" => {
                let n = text
                    .parse::<usize>()
                    .map_err(|_| IqError::Parse(format!("Count '{text}' is not an integer")))?;
                count = Some(n);
            }
            "XStart" => start = Some(parse_xml_number("XStart", text)?),
            "XStop" => stop = Some(parse_xml_number("XStop", text)?),
            "XUnits" => xunits = Some(text.to_string()),
            "YUnits" => yunits = Some(text.to_string()),
            "y" => power.push(parse_xml_number("y", text)?),
            _ => {}
        }
    }

    let count = count.ok_or_else(|| missing_element("Count"))?;
    let start = start.ok_or_else(|| missing_element("XStart"))?;
    let stop = stop.ok_or_else(|| missing_element("XStop"))?;
    let xunits = xunits.ok_or_else(|| missing_element("XUnits"))?;
    let yunits = yunits.ok_or_else(|| missing_element("YUnits"))?;

    if power.len() != count {
        return Err(IqError::Parse(format!(
            "Count declares {count} points but {} <y> elements were found",
            power.len()
        )));
    }

    Ok(Trace {
        frequencies: linspace(start, stop, count),
        power,
        start,
        stop,
        center: None,
        units: Some(TraceUnits {
            x: xunits,
            y: yunits,
        }),
    })
}

fn parse_xml_number(tag: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| IqError::Parse(format!("<{tag}> value '{text}' is not a number")))
}

fn missing_element(tag: &str) -> IqError {
    IqError::Parse(format!("missing <{tag}> element"))
}

// -- Shared helpers --

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    String::from_utf8(bytes)
        .map_err(|_| IqError::Parse("file is not valid UTF-8".into()))
        .context(path.display().to_string())
}

/// Everything after the first `n` lines.
fn skip_lines(text: &str, n: usize) -> Result<&str> {
    let mut rest = text;
    for skipped in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None if skipped + 1 == n && !rest.is_empty() => rest = "",
            None => {
                return Err(IqError::Parse(format!(
                    "expected {n} header lines, file has only {skipped}"
                )))
            }
        }
    }
    Ok(rest)
}

fn parse_number(field: &str, row: usize, col: usize) -> Result<f64> {
    field.parse::<f64>().map_err(|_| {
        IqError::Parse(format!(
            "data row {row}, column {col}: '{field}' is not a number"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(lines: usize) -> String {
        (0..lines).map(|i| format!("Header line {i}\n")).collect()
    }

    #[test]
    fn skip_lines_counts_newlines() {
        assert_eq!(skip_lines("a\nb\nc\n", 2).unwrap(), "c\n");
        assert_eq!(skip_lines("a\nb", 2).unwrap(), "");
        assert_eq!(skip_lines("a\nb\n", 0).unwrap(), "a\nb\n");
        assert!(skip_lines("a\n", 3).unwrap_err().is_parse());
    }

    #[test]
    fn result_csv_builds_center_relative_axis() {
        let layout = ResultCsvLayout {
            header_lines: 4,
            ..Default::default()
        };
        let text = "Frequency,100,Hz\nXStart,90,Hz\nXStop,110,Hz\nTrace,1\n1.0\n2.0\n3.0\n";
        let trace = parse_result_csv(text, &layout).unwrap();
        assert_eq!(trace.power, vec![1.0, 2.0, 3.0]);
        assert_eq!(trace.frequencies, vec![-10.0, 0.0, 10.0]);
        assert_eq!(trace.center, Some(100.0));
        assert_eq!(trace.start, 90.0);
        assert_eq!(trace.stop, 110.0);
    }

    #[test]
    fn result_csv_rejects_multi_column_rows() {
        let layout = ResultCsvLayout {
            header_lines: 3,
            ..Default::default()
        };
        let text = "Frequency,100,Hz\nXStart,90,Hz\nXStop,110,Hz\n1.0,2.0\n";
        assert!(parse_result_csv(text, &layout).unwrap_err().is_parse());
    }

    #[test]
    fn data_csv_pairs_values_row_major() {
        let layout = DataCsvLayout { header_lines: 2 };
        let text = format!("{}1,2,3,4\n5,6,7,8\n", header(2));
        let samples = parse_data_csv(&text, &layout).unwrap();
        assert_eq!(
            samples,
            vec![
                Complex64::new(1.0, 2.0),
                Complex64::new(3.0, 4.0),
                Complex64::new(5.0, 6.0),
                Complex64::new(7.0, 8.0),
            ]
        );
    }

    #[test]
    fn result_csv_rejects_multi_column_row_after_valid_rows() {
        let layout = ResultCsvLayout {
            header_lines: 3,
            ..Default::default()
        };
        let text = "Frequency,100,Hz\nXStart,90,Hz\nXStop,110,Hz\n1.0\n2.0,3.0\n";
        let err = parse_result_csv(text, &layout).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("data row 1"));
    }

    #[test]
    fn data_csv_ragged_row_is_an_error() {
        let layout = DataCsvLayout { header_lines: 1 };
        let text = "hdr\n1.0,2.0\n3.0\n";
        let err = parse_data_csv(text, &layout).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("expected 2 values, found 1"));
    }

    #[test]
    fn data_csv_odd_value_count_is_an_error() {
        let layout = DataCsvLayout { header_lines: 1 };
        let text = "hdr\n1\n2\n3\n";
        assert!(parse_data_csv(text, &layout).unwrap_err().is_parse());
    }

    #[test]
    fn specan_xml_uses_absolute_axis() {
        let xml = "<Root><Count>3</Count><XStart>10</XStart><XStop>20</XStop>\
                   <XUnits>Hz</XUnits><YUnits>dBm</YUnits>\
                   <y>-1</y><y>-2</y><y>-3</y></Root>";
        let trace = parse_specan_xml(xml).unwrap();
        assert_eq!(trace.frequencies, vec![10.0, 15.0, 20.0]);
        assert_eq!(trace.power, vec![-1.0, -2.0, -3.0]);
        assert_eq!(trace.center, None);
        assert_eq!(trace.units.unwrap().y, "dBm");
    }

    #[test]
    fn specan_xml_missing_units_is_an_error() {
        let xml = "<Root><Count>1</Count><XStart>0</XStart><XStop>0</XStop><y>1</y></Root>";
        let err = parse_specan_xml(xml).unwrap_err();
        assert!(err.to_string().contains("XUnits"));
    }

    #[test]
    fn specan_xml_last_duplicate_element_wins() {
        let xml = "<Root><Count>2</Count><XStart>0</XStart><XStart>10</XStart>\
                   <XStop>20</XStop><XUnits>Hz</XUnits><YUnits>dBm</YUnits>\
                   <y>-1</y><y>-2</y></Root>";
        let trace = parse_specan_xml(xml).unwrap();
        assert_eq!(trace.start, 10.0);
        assert_eq!(trace.frequencies, vec![10.0, 20.0]);
    }

    #[test]
    fn non_utf8_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.xml");
        std::fs::write(&path, b"<Root><XUnits>\xb5s</XUnits></Root>").unwrap();
        let err = read_specan_xml(&path).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn specan_xml_malformed_document() {
        let err = parse_specan_xml("<Root><Count>1</Root>").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("malformed XML"));
    }
}
