use super::Waveform;
use crate::error::Result;
use std::path::Path;

/// Read a mono WAV file, normalizing to [-1, 1] and multiplying by `scale`.
/// Multi-channel files keep only the first channel.
pub fn load_wav(path: &Path, scale: f32) -> Result<Waveform> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let normalized: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        hound::SampleFormat::Int => {
            let amplitude = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / amplitude))
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
        }
    };

    let voltages = normalized
        .into_iter()
        .step_by(channels)
        .map(|sample| sample * scale)
        .collect();
    Ok(Waveform::new(voltages))
}

/// Write voltages as 16-bit mono PCM, dividing by `scale` first
pub fn write_wav(path: &Path, voltages: &[f32], sample_rate: u32, scale: f32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let amplitude = i16::MAX as f32;
    for &voltage in voltages {
        let normalized = (voltage / scale).clamp(-1.0, 1.0);
        writer.write_sample((normalized * amplitude) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
