use serde::Serialize;
use tracing::info;

use crate::error::{DecodeError, Result};
use crate::utils::consts::PREAMBLE_BITS;

/// Seven 0x55 preamble bytes and the 0xD5 SFD, in wire order
pub const ETHERNET_PREAMBLE: [u8; PREAMBLE_BITS] = [
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 0, //
    1, 0, 1, 0, 1, 0, 1, 1, //
];

/// Where signal activity begins and where the first bit (always a 1) sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocatedStart {
    /// First sample at or below the threshold
    pub threshold_offset: usize,
    /// First sample above zero after that: the first decoded bit
    pub crossing_offset: usize,
}

/// Find the first preamble excursion and the rising crossing that ends it.
///
/// The line idles near zero and the preamble opens with a 1 (low half first),
/// so the first dip below `threshold` is followed by a rising zero crossing.
pub fn locate(samples: &[f32], threshold: f32) -> Result<LocatedStart> {
    let threshold_offset = samples
        .iter()
        .position(|&v| v <= threshold)
        .ok_or(DecodeError::ThresholdNotFound {
            threshold,
            scanned: samples.len(),
        })?;
    info!("Threshold at offset {}", threshold_offset);

    let crossing_offset = samples[threshold_offset..]
        .iter()
        .position(|&v| v > 0.0)
        .map(|rel| threshold_offset + rel)
        .ok_or(DecodeError::CrossingNotFound {
            offset: threshold_offset,
        })?;
    info!("First zero crossing at offset {}", crossing_offset);

    Ok(LocatedStart {
        threshold_offset,
        crossing_offset,
    })
}

/// Index of the first bit that differs from the preamble, if any.
/// A stream shorter than the preamble mismatches at its end.
pub fn first_mismatch(bits: &[u8]) -> Option<usize> {
    ETHERNET_PREAMBLE
        .iter()
        .enumerate()
        .find(|&(i, &expected)| bits.get(i) != Some(&expected))
        .map(|(i, _)| i)
}
