//! Core audio data types
//!
//! Cue audio is decoded once, converted to interleaved stereo f32 at the
//! device rate, and held in RAM for instant rewind-and-play.

/// Decoded, resampled cue ready for mixing.
///
/// **Format:**
/// - Samples are f32 (floating point -1.0 to 1.0)
/// - Stereo interleaved: [L, R, L, R, ...]
/// - Sample rate equals the output device rate
#[derive(Debug, Clone)]
pub struct CueBuffer {
    /// PCM audio samples (interleaved stereo)
    pub samples: Vec<f32>,

    /// Sample rate the samples are stored at
    pub sample_rate: u32,

    /// Number of stereo frames (samples.len() / 2)
    pub frame_count: usize,
}

impl CueBuffer {
    /// Create a buffer from interleaved stereo samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let frame_count = samples.len() / 2;
        Self {
            samples,
            sample_rate,
            frame_count,
        }
    }

    /// Get duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frame_count as u64 * 1000) / self.sample_rate as u64
    }

    /// Get audio frame at specific frame index
    pub fn get_frame(&self, frame_index: usize) -> Option<AudioFrame> {
        let sample_index = frame_index * 2;
        if sample_index + 1 < self.samples.len() {
            Some(AudioFrame {
                left: self.samples[sample_index],
                right: self.samples[sample_index + 1],
            })
        } else {
            None
        }
    }
}

/// AudioFrame represents a single stereo sample (one frame of audio).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFrame {
    /// Left channel sample
    pub left: f32,

    /// Right channel sample
    pub right: f32,
}

impl AudioFrame {
    /// Create a silent frame (0.0, 0.0)
    pub fn zero() -> Self {
        AudioFrame { left: 0.0, right: 0.0 }
    }

    /// Create a frame from left and right samples
    pub fn from_stereo(left: f32, right: f32) -> Self {
        AudioFrame { left, right }
    }

    /// Add `other` scaled by `gain` (for mixing voices)
    pub fn mix(&mut self, other: AudioFrame, gain: f32) {
        self.left += other.left * gain;
        self.right += other.right * gain;
    }

    /// Clamp both channels to [-1.0, 1.0]
    pub fn clamped(self) -> Self {
        AudioFrame {
            left: self.left.clamp(-1.0, 1.0),
            right: self.right.clamp(-1.0, 1.0),
        }
    }
}

impl Default for AudioFrame {
    fn default() -> Self {
        Self::zero()
    }
}
