// Waveform ingestion: scope CSV exports and WAV recordings

pub mod csv;
pub mod wav;

use crate::error::Result;
use crate::utils::consts::{DEFAULT_VALUE_COLUMN, DEFAULT_WAV_SCALE};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

pub use csv::{load_csv, write_csv};
pub use wav::{load_wav, write_wav};

/// One voltage reading at an implicit uniform time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub voltage: f32,
}

/// Immutable, time-ordered sample sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Waveform {
    voltages: Vec<f32>,
}

impl Waveform {
    pub fn new(voltages: Vec<f32>) -> Self {
        Self { voltages }
    }

    pub fn voltages(&self) -> &[f32] {
        &self.voltages
    }

    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<Sample> {
        self.voltages
            .get(index)
            .map(|&voltage| Sample { index, voltage })
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.voltages
            .iter()
            .enumerate()
            .map(|(index, &voltage)| Sample { index, voltage })
    }
}

impl From<Vec<f32>> for Waveform {
    fn from(voltages: Vec<f32>) -> Self {
        Self::new(voltages)
    }
}

/// How to pull voltages out of a capture file
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// CSV column holding the voltage
    pub column: usize,
    /// Multiplier applied to normalized WAV samples
    pub wav_scale: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            column: DEFAULT_VALUE_COLUMN,
            wav_scale: DEFAULT_WAV_SCALE,
        }
    }
}

pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Load a capture, dispatching on the file extension (`.wav` or CSV otherwise)
pub fn load_capture(path: &Path, options: &LoadOptions) -> Result<Waveform> {
    let waveform = if is_wav(path) {
        debug!("Reading WAV capture {} (scale {})", path.display(), options.wav_scale);
        load_wav(path, options.wav_scale)?
    } else {
        debug!("Reading CSV capture {} (column {})", path.display(), options.column);
        let reader = BufReader::new(File::open(path)?);
        load_csv(reader, options.column)?
    };

    info!("Loaded {} samples from {}", waveform.len(), path.display());
    Ok(waveform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_contiguous() {
        let waveform = Waveform::new(vec![0.5, -1.0, 2.0]);
        let indices: Vec<usize> = waveform.samples().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(
            waveform.sample(1),
            Some(Sample {
                index: 1,
                voltage: -1.0
            })
        );
        assert_eq!(waveform.sample(3), None);
    }

    #[test]
    fn test_wav_extension_detection() {
        assert!(is_wav(Path::new("capture.WAV")));
        assert!(is_wav(Path::new("dir/capture.wav")));
        assert!(!is_wav(Path::new("WAVE1.CSV")));
        assert!(!is_wav(Path::new("wav")));
    }
}
