//! Audio pipeline for cue playback
//!
//! symphonia decode → rubato resample to device rate → in-RAM cue buffers →
//! voice mixer → cpal output.

pub mod decoder;
pub mod mixer;
pub mod output;
pub mod resampler;
pub mod types;

pub use decoder::{CueDecoder, DecodedAudio};
pub use mixer::{Voice, VoiceMixer};
pub use output::AudioOutput;
pub use resampler::Resampler;
pub use types::{AudioFrame, CueBuffer};
