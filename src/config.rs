//! Decoder configuration, loadable from JSON and overridable from the CLI

use crate::error::{DecodeError, Result};
use crate::utils::consts::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which resynchronization heuristic the bit decoder runs, with its tolerances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum ResyncConfig {
    /// Accept the first crossing within ± `window` samples of the nominal spacing
    FixedWindow { window: usize },
    /// Accept the first crossing between `min_spacing` and `max_spacing`
    /// (fractions of the nominal spacing) after the previous one
    IdealPosition { min_spacing: f32, max_spacing: f32 },
    /// Jump a full bit, classify by slope, then walk onto the transition sample
    DriftTracking {
        #[serde(default)]
        max_walk: Option<usize>,
    },
}

impl ResyncConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FixedWindow { .. } => "fixed-window",
            Self::IdealPosition { .. } => "ideal-position",
            Self::DriftTracking { .. } => "drift-tracking",
        }
    }

    pub fn default_fixed_window() -> Self {
        Self::FixedWindow {
            window: DEFAULT_WINDOW,
        }
    }

    pub fn default_ideal_position() -> Self {
        Self::IdealPosition {
            min_spacing: DEFAULT_MIN_SPACING,
            max_spacing: DEFAULT_MAX_SPACING,
        }
    }

    pub fn default_drift_tracking() -> Self {
        Self::DriftTracking { max_walk: None }
    }
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self::default_fixed_window()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Negative voltage marking the first preamble excursion
    pub threshold: f32,
    pub sample_rate_mhz: f32,
    pub bit_rate_mhz: f32,
    pub resync: ResyncConfig,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            sample_rate_mhz: DEFAULT_SAMPLE_RATE_MHZ,
            bit_rate_mhz: ETHERNET_BIT_RATE_MHZ,
            resync: ResyncConfig::default(),
        }
    }
}

impl DecoderConfig {
    pub fn with_resync(mut self, resync: ResyncConfig) -> Self {
        self.resync = resync;
        self
    }

    /// Nominal number of samples spanning one bit
    pub fn samples_per_bit(&self) -> f32 {
        self.sample_rate_mhz / self.bit_rate_mhz
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| DecodeError::InvalidConfig(err.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DecodeError::InvalidConfig(msg));

        if !(self.threshold < 0.0) {
            return invalid(format!("threshold must be negative, got {}", self.threshold));
        }
        if !(self.sample_rate_mhz > 0.0) || !(self.bit_rate_mhz > 0.0) {
            return invalid(format!(
                "rates must be positive (sample rate {} MSa/s, bit rate {} Mb/s)",
                self.sample_rate_mhz, self.bit_rate_mhz
            ));
        }
        let spb = self.samples_per_bit();
        if spb < 2.0 {
            return invalid(format!("need at least 2 samples per bit, got {:.2}", spb));
        }
        if !(spb <= MAX_SAMPLES_PER_BIT) {
            return invalid(format!(
                "at most {} samples per bit are supported, got {}",
                MAX_SAMPLES_PER_BIT, spb
            ));
        }

        match self.resync {
            ResyncConfig::FixedWindow { window } => {
                if window == 0 || window >= spb.round() as usize {
                    return invalid(format!(
                        "window {} must be between 1 and the bit period ({:.2} samples)",
                        window, spb
                    ));
                }
            }
            ResyncConfig::IdealPosition {
                min_spacing,
                max_spacing,
            } => {
                if (spb * min_spacing).floor() < 1.0 {
                    return invalid(format!(
                        "min spacing {} is shorter than one sample",
                        min_spacing
                    ));
                }
                if !(min_spacing < max_spacing) {
                    return invalid(format!(
                        "min spacing {} must be below max spacing {}",
                        min_spacing, max_spacing
                    ));
                }
                if !(max_spacing <= MAX_SPACING_LIMIT) {
                    return invalid(format!(
                        "max spacing {} exceeds {} bit periods",
                        max_spacing, MAX_SPACING_LIMIT
                    ));
                }
            }
            ResyncConfig::DriftTracking { max_walk } => {
                if let Some(walk) = max_walk {
                    if walk >= spb.trunc() as usize {
                        return invalid(format!(
                            "max walk {} must be shorter than the bit period ({:.2} samples)",
                            walk, spb
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
