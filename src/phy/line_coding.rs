// Manchester encoding (IEEE 802.3): 0 -> [high, low], 1 -> [low, high]
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::preamble::ETHERNET_PREAMBLE;
use crate::error::{DecodeError, Result};
use crate::utils::consts::*;

pub struct ManchesterEncoder {
    samples_per_bit: f32, // may be fractional, e.g. 25.0 at 250 MSa/s
    amplitude: f32,
}

impl ManchesterEncoder {
    pub fn new(samples_per_bit: f32, amplitude: f32) -> Self {
        Self {
            samples_per_bit,
            amplitude,
        }
    }

    /// slice of bits -> Manchester-encoded voltages
    ///
    /// Sample `n` belongs to bit `floor(n / spb)`; the first half of a bit
    /// covers the phases below 0.5.
    pub fn encode(&self, bits: &[u8]) -> Vec<f32> {
        let total = self.samples_for_bits(bits.len());
        let mut samples = Vec::with_capacity(total);

        for n in 0..total {
            let t = n as f32 / self.samples_per_bit;
            let bit_idx = (t.floor() as usize).min(bits.len().saturating_sub(1));
            let first_half = t - (bit_idx as f32) < 0.5;
            let high = if bits[bit_idx] == 0 {
                first_half
            } else {
                !first_half
            };
            samples.push(if high { self.amplitude } else { -self.amplitude });
        }

        samples
    }

    pub fn samples_for_bits(&self, num_bits: usize) -> usize {
        (num_bits as f32 * self.samples_per_bit).round() as usize
    }
}

/// Bytes to wire-order bits (least-significant bit first)
pub fn bytes_to_wire_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in 0..8 {
            bits.push((byte >> i) & 1);
        }
    }
    bits
}

/// Parameters of a synthetic 10BASE-T capture
#[derive(Debug, Clone, Copy)]
pub struct SynthOptions {
    pub sample_rate_mhz: f32,
    pub bit_rate_mhz: f32,
    pub amplitude: f32,
    /// Quiet samples before and after the frame
    pub idle_samples: usize,
    /// Uniform noise amplitude added to active samples
    pub noise: f32,
    /// Relative bit period error: 0.01 is a transmitter clock 1% slow
    pub drift: f32,
    pub seed: u64,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            sample_rate_mhz: DEFAULT_SAMPLE_RATE_MHZ,
            bit_rate_mhz: ETHERNET_BIT_RATE_MHZ,
            amplitude: DEFAULT_AMPLITUDE,
            idle_samples: DEFAULT_IDLE_SAMPLES,
            noise: 0.0,
            drift: 0.0,
            seed: 0,
        }
    }
}

/// Generate idle + preamble/SFD + payload + idle as Manchester voltages
pub fn synthesize(payload: &[u8], options: &SynthOptions) -> Result<Vec<f32>> {
    let samples_per_bit = options.sample_rate_mhz / options.bit_rate_mhz * (1.0 + options.drift);
    if !(samples_per_bit >= 2.0) {
        return Err(DecodeError::InvalidPayload(format!(
            "cannot synthesize {:.2} samples per bit",
            samples_per_bit
        )));
    }

    let mut bits = ETHERNET_PREAMBLE.to_vec();
    bits.extend(bytes_to_wire_bits(payload));

    let encoder = ManchesterEncoder::new(samples_per_bit, options.amplitude);
    let mut active = encoder.encode(&bits);

    if options.noise > 0.0 {
        let mut rng = StdRng::seed_from_u64(options.seed);
        for sample in active.iter_mut() {
            *sample += rng.random_range(-options.noise..=options.noise);
        }
    }

    let mut output = Vec::with_capacity(active.len() + 2 * options.idle_samples);
    output.extend(std::iter::repeat_n(0.0, options.idle_samples));
    output.extend(active);
    output.extend(std::iter::repeat_n(0.0, options.idle_samples));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manchester_levels() {
        let encoder = ManchesterEncoder::new(4.0, 1.0);
        let samples = encoder.encode(&[0, 1]);
        assert_eq!(samples, vec![1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_fractional_bit_period() {
        let encoder = ManchesterEncoder::new(25.0, 1000.0);
        let samples = encoder.encode(&[1]);
        assert_eq!(samples.len(), 25);
        // Mid-bit transition lands between sample 12 and 13
        assert_eq!(samples[12], -1000.0);
        assert_eq!(samples[13], 1000.0);
    }

    #[test]
    fn test_wire_bit_order() {
        assert_eq!(bytes_to_wire_bits(&[0x86]), vec![0, 1, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_synthesize_layout() {
        let options = SynthOptions {
            idle_samples: 10,
            ..SynthOptions::default()
        };
        let samples = synthesize(&[0xAB], &options).unwrap();
        assert_eq!(samples.len(), 10 + 72 * 25 + 10);
        assert!(samples[..10].iter().all(|&v| v == 0.0));
        assert!(samples[samples.len() - 10..].iter().all(|&v| v == 0.0));
        // Preamble starts with a 1: low half first
        assert_eq!(samples[10], -1000.0);
    }

    #[test]
    fn test_noise_is_seeded() {
        let options = SynthOptions {
            noise: 50.0,
            seed: 7,
            ..SynthOptions::default()
        };
        let a = synthesize(&[1, 2, 3], &options).unwrap();
        let b = synthesize(&[1, 2, 3], &options).unwrap();
        assert_eq!(a, b);
        let active = &a[options.idle_samples..options.idle_samples + 100];
        assert!(active.iter().all(|&v| v.abs() >= 950.0 && v.abs() <= 1050.0));
        assert!(active.iter().any(|&v| v != 1000.0 && v != -1000.0));
    }
}
