// Frame reconstruction: [Preamble x7] [SFD] [Octets...] with each octet sent LSB first

use super::decoder::DecodeResult;
use super::preamble::first_mismatch;
use crate::error::{DecodeError, Result};
use crate::utils::consts::PREAMBLE_BITS;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// One reconstructed byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Octet {
    /// Most significant bit first, i.e. the wire bits reversed
    pub bits: [u8; 8],
    pub value: u8,
}

impl Octet {
    /// Build from eight bits in wire order (least significant first)
    pub fn from_wire_bits(wire: &[u8]) -> Self {
        let mut bits = [0u8; 8];
        for (dst, &src) in bits.iter_mut().zip(wire.iter().rev()) {
            *dst = src;
        }
        Self {
            bits,
            value: bits_to_byte(&bits),
        }
    }

    pub fn bit_string(&self) -> String {
        self.bits
            .iter()
            .map(|&b| if b != 0 { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for Octet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#x}", self.bit_string(), self.value)
    }
}

/// Convert bit array to byte (MSB first)
pub fn bits_to_byte(bits: &[u8]) -> u8 {
    let mut byte = 0u8;
    for (i, &bit) in bits
        .iter()
        .enumerate()
        .take(8)
    {
        if bit != 0 {
            byte |= 1 << (7 - i);
        }
    }
    byte
}

/// Read-only cursor over decoded bits
pub struct BitCursor<'a> {
    bits: &'a [u8],
    pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(bits: &'a [u8]) -> Self {
        Self { bits, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bits.len());
    }

    /// Next `n` bits, or None if fewer remain (the cursor does not move then)
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let chunk = &self.bits[self.pos..self.pos + n];
        self.pos += n;
        Some(chunk)
    }
}

/// Payload octets recovered after the preamble and SFD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub octets: Vec<Octet>,
    /// Bits after the preamble
    pub packet_bits: usize,
    /// Trailing bits that did not fill an octet
    pub dropped_bits: usize,
}

impl Frame {
    pub fn bytes(&self) -> Vec<u8> {
        self.octets.iter().map(|o| o.value).collect()
    }
}

/// Validate preamble + SFD and regroup what follows into bytes
pub fn assemble(result: &DecodeResult) -> Result<Frame> {
    if let Some(bit) = first_mismatch(&result.bits) {
        let offset = result
            .crossings
            .get(bit)
            .copied()
            .unwrap_or(result.end_offset);
        debug!("Preamble mismatch at bit {} (offset {})", bit, offset);
        return Err(DecodeError::PreambleMismatch {
            bit,
            offset,
            decoded: result.bits.len(),
        });
    }

    let mut cursor = BitCursor::new(&result.bits);
    cursor.skip(PREAMBLE_BITS);
    let packet_bits = cursor.remaining();
    info!("{} packet bits", packet_bits);

    let mut octets = Vec::with_capacity(packet_bits / 8);
    while let Some(chunk) = cursor.take(8) {
        octets.push(Octet::from_wire_bits(chunk));
    }
    let dropped_bits = cursor.remaining();
    if dropped_bits > 0 {
        debug!("Dropping {} trailing bits", dropped_bits);
    }

    Ok(Frame {
        octets,
        packet_bits,
        dropped_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phy::preamble::ETHERNET_PREAMBLE;
    use crate::phy::resync::Termination;

    fn result_with(bits: Vec<u8>) -> DecodeResult {
        let crossings = (0..bits.len()).map(|i| 100 + 25 * i).collect();
        DecodeResult {
            bits,
            crossings,
            termination: Termination::QuietPeriod,
            end_offset: 5000,
        }
    }

    #[test]
    fn test_octet_reversal() {
        let octet = Octet::from_wire_bits(&[0, 1, 1, 0, 0, 0, 0, 1]);
        assert_eq!(octet.bit_string(), "10000110");
        assert_eq!(octet.value, 0x86);
        assert_eq!(octet.to_string(), "10000110 0x86");
    }

    #[test]
    fn test_hex_has_no_padding() {
        let octet = Octet::from_wire_bits(&[1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(octet.to_string(), "00000101 0x5");
    }

    #[test]
    fn test_assemble_drops_tail() {
        let mut bits = ETHERNET_PREAMBLE.to_vec();
        bits.extend([0, 1, 1, 0, 0, 0, 0, 1]);
        bits.extend([1, 1, 1, 1, 1, 1, 1, 1]);
        bits.extend([1, 0, 1]);
        let frame = assemble(&result_with(bits)).unwrap();
        assert_eq!(frame.bytes(), vec![0x86, 0xFF]);
        assert_eq!(frame.packet_bits, 19);
        assert_eq!(frame.dropped_bits, 3);
    }

    #[test]
    fn test_preamble_only() {
        let frame = assemble(&result_with(ETHERNET_PREAMBLE.to_vec())).unwrap();
        assert!(frame.octets.is_empty());
        assert_eq!(frame.packet_bits, 0);
    }

    #[test]
    fn test_preamble_mismatch() {
        let mut bits = ETHERNET_PREAMBLE.to_vec();
        bits[62] = 1;
        bits.extend([0; 8]);
        let err = assemble(&result_with(bits)).unwrap_err();
        match err {
            DecodeError::PreambleMismatch {
                bit,
                offset,
                decoded,
            } => {
                assert_eq!(bit, 62);
                assert_eq!(offset, 100 + 25 * 62);
                assert_eq!(decoded, 72);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_stream_mismatches() {
        let err = assemble(&result_with(ETHERNET_PREAMBLE[..40].to_vec())).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::PreambleMismatch {
                bit: 40,
                offset: 5000,
                ..
            }
        ));
    }

    #[test]
    fn test_cursor() {
        let bits = [1, 0, 1];
        let mut cursor = BitCursor::new(&bits);
        assert_eq!(cursor.take(2), Some(&bits[..2]));
        assert_eq!(cursor.take(2), None);
        assert_eq!(cursor.remaining(), 1);
        cursor.skip(10);
        assert_eq!(cursor.remaining(), 0);
    }
}
