//! Cue voice mixer
//!
//! Every preloaded cue owns one voice. Playing a cue rewinds its voice, so a
//! repeated request replaces the in-flight playback instead of stacking a
//! second copy. Different cues overlap freely.

use crate::audio::{AudioFrame, CueBuffer};
use crate::media::CueId;
use std::collections::HashMap;
use std::sync::Arc;

/// Playback cursor over one cue buffer
#[derive(Debug, Clone)]
pub struct Voice {
    buffer: Arc<CueBuffer>,
    position: usize,
    playing: bool,
    volume: f32,
}

impl Voice {
    pub fn new(buffer: Arc<CueBuffer>, volume: f32) -> Self {
        Self {
            buffer,
            position: 0,
            playing: false,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Rewind to the first frame and start
    pub fn restart(&mut self) {
        self.position = 0;
        self.playing = true;
    }

    /// Stop and rewind
    pub fn halt(&mut self) {
        self.playing = false;
        self.position = 0;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

/// Set of voices keyed by cue
#[derive(Debug, Default)]
pub struct VoiceMixer {
    voices: HashMap<CueId, Voice>,
}

impl VoiceMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the voice for `cue`
    pub fn insert(&mut self, cue: CueId, voice: Voice) {
        self.voices.insert(cue, voice);
    }

    pub fn voice(&self, cue: CueId) -> Option<&Voice> {
        self.voices.get(&cue)
    }

    pub fn voice_mut(&mut self, cue: CueId) -> Option<&mut Voice> {
        self.voices.get_mut(&cue)
    }

    /// Number of voices currently audible or priming
    pub fn active_count(&self) -> usize {
        self.voices.values().filter(|v| v.playing).count()
    }

    /// Mix every playing voice into `block`, advancing their cursors.
    ///
    /// Voices reaching the end of their buffer stop and rewind.
    pub fn render(&mut self, block: &mut [AudioFrame]) {
        for voice in self.voices.values_mut().filter(|v| v.playing) {
            for out in block.iter_mut() {
                match voice.buffer.get_frame(voice.position) {
                    Some(frame) => {
                        out.mix(frame, voice.volume);
                        voice.position += 1;
                    }
                    None => {
                        voice.halt();
                        break;
                    }
                }
            }
        }
    }
}
