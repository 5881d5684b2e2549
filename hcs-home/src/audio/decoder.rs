//! Cue decoder using symphonia
//!
//! Decodes a whole cue file (MP3, FLAC, Vorbis, WAV) to interleaved stereo
//! f32 PCM. Cues are short, so there is no streaming or seeking.

use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decoded cue before resampling
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved stereo samples
    pub samples: Vec<f32>,
    /// Source sample rate
    pub sample_rate: u32,
}

/// Whole-file decoder
pub struct CueDecoder;

impl CueDecoder {
    /// Decode entire audio file to interleaved stereo samples.
    ///
    /// # Errors
    /// - Failed to open file
    /// - Unsupported audio format
    /// - No audio track, or the track has no sample rate
    pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
        debug!("Decoding cue file: {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open file {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to probe format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut sample_buf_frames = 0u64;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    warn!("Error reading packet from {}: {}", path.display(), e);
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(Error::Decode(format!("Decode failed: {}", e))),
            };

            let spec = *decoded.spec();
            let frames = decoded.capacity() as u64;
            if sample_buf.is_none() || frames > sample_buf_frames {
                sample_buf = Some(SampleBuffer::<f32>::new(frames, spec));
                sample_buf_frames = frames;
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                let channels = spec.channels.count();
                Self::append_as_stereo(buf.samples(), channels, &mut samples);
            }
        }

        debug!(
            "Decoded {} frames at {}Hz from {}",
            samples.len() / 2,
            sample_rate,
            path.display()
        );

        Ok(DecodedAudio {
            samples,
            sample_rate,
        })
    }

    /// Append interleaved samples with `channels` channels as stereo.
    ///
    /// Mono is duplicated to both channels; anything wider keeps the first two.
    fn append_as_stereo(input: &[f32], channels: usize, output: &mut Vec<f32>) {
        match channels {
            0 => {}
            1 => {
                output.reserve(input.len() * 2);
                for &sample in input {
                    output.push(sample);
                    output.push(sample);
                }
            }
            2 => output.extend_from_slice(input),
            n => {
                for frame in input.chunks_exact(n) {
                    output.push(frame[0]);
                    output.push(frame[1]);
                }
            }
        }
    }
}
