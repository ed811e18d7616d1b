use super::resync::{Crossing, ResyncStrategy, Step, Termination};
use crate::config::DecoderConfig;
use tracing::{debug, info, trace};

enum DecoderState {
    SeekingCrossing,
    Emitting(Crossing),
    Done(Termination, usize), // termination and the sample offset it happened at
}

/// Bits recovered from a capture and why decoding stopped
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    /// Append-only, in decode order; the first bit is always 1
    pub bits: Vec<u8>,
    /// Sample index of the crossing behind each bit
    pub crossings: Vec<usize>,
    pub termination: Termination,
    pub end_offset: usize,
}

impl DecodeResult {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Average distance between consecutive crossings, in samples
    pub fn mean_spacing(&self) -> Option<f32> {
        let (first, last) = (self.crossings.first()?, self.crossings.last()?);
        let gaps = self.crossings.len() - 1;
        if gaps == 0 {
            return None;
        }
        Some((last - first) as f32 / gaps as f32)
    }
}

pub struct BitDecoder {
    strategy: Box<dyn ResyncStrategy>,
}

impl BitDecoder {
    pub fn new(config: &DecoderConfig) -> Self {
        Self::with_strategy(config.resync.create(config.samples_per_bit()))
    }

    pub fn with_strategy(strategy: Box<dyn ResyncStrategy>) -> Self {
        Self { strategy }
    }

    /// Decode bits starting from the located first crossing.
    ///
    /// `start` must be the rising crossing found by the locator; it is emitted
    /// as a 1 without further checks.
    pub fn decode(&self, samples: &[f32], start: usize) -> DecodeResult {
        let mut bits = Vec::new();
        let mut crossings = Vec::new();
        let mut pos = start;
        let mut state = DecoderState::Emitting(Crossing {
            index: start,
            bit: 1,
        });

        debug!(
            "Decoding from offset {} with {} resync (min spacing {})",
            start,
            self.strategy.name(),
            self.strategy.min_spacing()
        );

        let (termination, end_offset) = loop {
            state = match state {
                DecoderState::SeekingCrossing => {
                    match self.strategy.next_crossing(samples, pos) {
                        Step::Crossing(crossing) => DecoderState::Emitting(crossing),
                        Step::Stop {
                            termination,
                            offset,
                        } => DecoderState::Done(termination, offset),
                    }
                }
                DecoderState::Emitting(crossing) => {
                    trace!("bit {} = {} at offset {}", bits.len(), crossing.bit, crossing.index);
                    bits.push(crossing.bit);
                    crossings.push(crossing.index);
                    pos = crossing.index;
                    DecoderState::SeekingCrossing
                }
                DecoderState::Done(termination, offset) => break (termination, offset),
            };
        };

        info!("Total of {} bits decoded", bits.len());
        debug!("Decoding stopped at offset {}: {}", end_offset, termination.name());

        DecodeResult {
            bits,
            crossings,
            termination,
            end_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResyncConfig;
    use crate::phy::line_coding::ManchesterEncoder;

    fn encoded(bits: &[u8]) -> Vec<f32> {
        let mut samples = vec![0.0; 20];
        samples.extend(ManchesterEncoder::new(25.0, 1000.0).encode(bits));
        samples.extend(vec![0.0; 60]);
        samples
    }

    #[test]
    fn test_decoder_all_strategies() {
        let bits = [1, 0, 1, 1, 0, 0, 0, 1, 1, 1, 0];
        let samples = encoded(&bits);
        // First mid-bit crossing: 20 idle samples + 13
        let start = 33;
        assert!(samples[start - 1] < 0.0 && samples[start] > 0.0);

        for resync in [
            ResyncConfig::default_fixed_window(),
            ResyncConfig::default_ideal_position(),
            ResyncConfig::default_drift_tracking(),
        ] {
            let decoder = BitDecoder::new(&DecoderConfig::default().with_resync(resync));
            let result = decoder.decode(&samples, start);
            assert_eq!(result.bits, bits, "{}", resync.name());
            assert_eq!(result.termination, Termination::QuietPeriod, "{}", resync.name());
            assert_eq!(result.mean_spacing(), Some(25.0));
        }
    }

    #[test]
    fn test_first_bit_is_one() {
        let decoder = BitDecoder::new(&DecoderConfig::default());
        let result = decoder.decode(&[-1.0, 1.0], 1);
        assert_eq!(result.bits, vec![1]);
        assert_eq!(result.crossings, vec![1]);
        assert_eq!(result.termination, Termination::EndOfData);
        assert_eq!(result.mean_spacing(), None);
    }

    #[test]
    fn test_missing_transition_stops_decoding() {
        // A bit period with no mid-bit transition
        let mut samples = encoded(&[1, 0, 1]);
        let flat_from = 20 + 50;
        for v in samples.iter_mut().skip(flat_from).take(25) {
            *v = 1000.0;
        }
        let decoder = BitDecoder::new(&DecoderConfig::default());
        let result = decoder.decode(&samples, 33);
        assert_eq!(result.bits, vec![1, 0]);
        assert_eq!(result.termination, Termination::CrossingNotFound);
    }
}
