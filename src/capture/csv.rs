// Scope CSV exports: metadata rows, an "index,..." header row, then one sample per row

use super::Waveform;
use crate::error::{DecodeError, Result};
use crate::utils::consts::HEADER_SENTINEL;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace};

fn field(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Parse a capture, taking voltages from `column` of every row after the header
pub fn load_csv<R: BufRead>(reader: R, column: usize) -> Result<Waveform> {
    let mut voltages = Vec::new();
    let mut past_header = false;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;

        if !past_header {
            if line.split(',').next().map(field) == Some(HEADER_SENTINEL) {
                debug!("Header row found on line {}", line_no);
                past_header = true;
            } else {
                trace!("Skipping metadata line {}", line_no);
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        let raw = line.split(',').nth(column).ok_or_else(|| {
            DecodeError::Format {
                line: line_no,
                reason: format!("row has no column {}", column),
            }
        })?;
        let value = field(raw);
        let voltage = value
            .parse::<f32>()
            .map_err(|err| DecodeError::Format {
                line: line_no,
                reason: format!("'{}' is not a number: {}", value, err),
            })?;
        voltages.push(voltage);
    }

    if !past_header {
        return Err(DecodeError::MissingHeader {
            sentinel: HEADER_SENTINEL,
        });
    }

    Ok(Waveform::new(voltages))
}

/// Write voltages as a scope-style CSV that [`load_csv`] reads back
pub fn write_csv(path: &Path, voltages: &[f32], sample_rate_mhz: f32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "Model,tenbaset-rs synth")?;
    writeln!(file, "Sample Rate,{}e6", sample_rate_mhz)?;
    writeln!(file, "Record Length,{}", voltages.len())?;
    writeln!(file, "{},voltage", HEADER_SENTINEL)?;
    for (index, &voltage) in voltages.iter().enumerate() {
        writeln!(file, "{},{}", index, voltage)?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CAPTURE: &str = "Model,DS1104Z\n\
        Channel,CH1\n\
        index,CH1,\n\
        0,12.5,\n\
        1,-600,\n\
        \n\
        2,\"3e2\",\n";

    #[test]
    fn test_load_skips_metadata() {
        let waveform = load_csv(Cursor::new(CAPTURE), 1).unwrap();
        assert_eq!(waveform.voltages(), &[12.5, -600.0, 300.0]);
    }

    #[test]
    fn test_missing_header() {
        let err = load_csv(Cursor::new("Model,X\n0,1.0\n"), 1).unwrap_err();
        assert!(matches!(err, DecodeError::MissingHeader { .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_unparseable_value_reports_line() {
        let err = load_csv(Cursor::new("index,v\n0,1.0\n1,abc\n"), 1).unwrap_err();
        match err {
            DecodeError::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let err = load_csv(Cursor::new("index,v\n0\n"), 1).unwrap_err();
        assert!(matches!(err, DecodeError::Format { line: 2, .. }));
    }

    #[test]
    fn test_header_only_is_empty_capture() {
        let waveform = load_csv(Cursor::new("index,v\n"), 1).unwrap();
        assert!(waveform.is_empty());
    }
}
