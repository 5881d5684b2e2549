//! WAV cue generation for decoder and engine tests

use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Write a sine tone WAV file
pub fn generate_sine_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    frequency: f32,
    duration_ms: u64,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let total_frames = (u64::from(sample_rate) * duration_ms) / 1000;
    for frame in 0..total_frames {
        let t = frame as f32 / sample_rate as f32;
        let sample = ((2.0 * PI * frequency * t).sin() * 0.5 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Write a silent WAV file
pub fn generate_silent_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    let total_samples = (u64::from(sample_rate) * duration_ms) / 1000 * u64::from(channels);
    for _ in 0..total_samples {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(())
}
