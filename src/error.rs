//! Error types for the capture decoder

use thiserror::Error;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Fatal failures of the decode pipeline.
///
/// Decoder-side stops (end of data, quiet period, a window with no crossing)
/// are not errors; they are reported as a [`crate::phy::Termination`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The capture never reaches the header row
    #[error("capture has no '{sentinel}' header row")]
    MissingHeader { sentinel: &'static str },

    /// A data row could not be turned into a voltage
    #[error("capture format error on line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// No sample dips to the start-of-signal threshold
    #[error("no sample at or below threshold {threshold} (scanned {scanned} samples)")]
    ThresholdNotFound { threshold: f32, scanned: usize },

    /// No positive zero crossing after the threshold sample
    #[error("no zero crossing found after offset {offset}")]
    CrossingNotFound { offset: usize },

    /// Decoded bits do not start with preamble + SFD
    #[error(
        "data does not begin with the Ethernet preamble: \
         bit {bit} mismatches at offset {offset} ({decoded} bits decoded)"
    )]
    PreambleMismatch {
        bit: usize,
        offset: usize,
        decoded: usize,
    },

    #[error("invalid decoder configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl DecodeError {
    /// True for malformed capture contents
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingHeader { .. } | Self::Format { .. })
    }
}
