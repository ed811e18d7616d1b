//! Loader output -> locator -> bit decoder -> frame assembler

use crate::capture::Waveform;
use crate::config::DecoderConfig;
use crate::error::Result;
use crate::phy::{
    BitDecoder, DecodeResult, Frame, LocatedStart, Octet, Termination, assemble, locate,
};
use serde::Serialize;
use tracing::info;

/// Everything a run found, in the order the stages found it
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub strategy: &'static str,
    pub samples_per_bit: f32,
    pub threshold_offset: usize,
    pub first_crossing_offset: usize,
    pub bits_decoded: usize,
    pub termination: Termination,
    pub end_offset: usize,
    pub mean_spacing: Option<f32>,
    pub packet_bits: usize,
    pub dropped_bits: usize,
    pub octets: Vec<Octet>,
    #[serde(skip)]
    pub bits: Vec<u8>,
}

impl DecodeReport {
    fn new(
        config: &DecoderConfig,
        start: LocatedStart,
        decoded: DecodeResult,
        frame: Frame,
    ) -> Self {
        Self {
            strategy: config.resync.name(),
            samples_per_bit: config.samples_per_bit(),
            threshold_offset: start.threshold_offset,
            first_crossing_offset: start.crossing_offset,
            bits_decoded: decoded.len(),
            termination: decoded.termination,
            end_offset: decoded.end_offset,
            mean_spacing: decoded.mean_spacing(),
            packet_bits: frame.packet_bits,
            dropped_bits: frame.dropped_bits,
            octets: frame.octets,
            bits: decoded.bits,
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.octets.iter().map(|o| o.value).collect()
    }
}

/// Locate and decode, without checking the preamble
pub fn decode_bits(
    waveform: &Waveform,
    config: &DecoderConfig,
) -> Result<(LocatedStart, DecodeResult)> {
    config.validate()?;
    let samples = waveform.voltages();
    let start = locate(samples, config.threshold)?;
    let decoded = BitDecoder::new(config).decode(samples, start.crossing_offset);
    Ok((start, decoded))
}

/// Run the whole pipeline over one capture
pub fn run(waveform: &Waveform, config: &DecoderConfig) -> Result<DecodeReport> {
    let (start, decoded) = decode_bits(waveform, config)?;
    info!(
        "Decoding ended ({}) at offset {}",
        decoded.termination.name(),
        decoded.end_offset
    );
    let frame = assemble(&decoded)?;
    Ok(DecodeReport::new(config, start, decoded, frame))
}
