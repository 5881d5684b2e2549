//! Media engine double that records every request

use hcs_home::error::{Error, Result};
use hcs_home::media::{CueHandle, CueId, MediaEngine};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Preload(CueId),
    Play(CueId),
    Stop(CueId),
    SetVolume(CueId, f32),
}

/// Cloneable handle; clones share one call log
#[derive(Clone, Default)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<MediaCall>>>,
    reject_plays: Arc<Mutex<bool>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `play_from_start` fail
    pub fn reject_plays(&self, reject: bool) {
        *self.reject_plays.lock().unwrap() = reject;
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<MediaCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn plays(&self) -> Vec<CueId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MediaCall::Play(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &MediaCall) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }
}

impl MediaEngine for RecordingEngine {
    fn preload(&mut self, cue: &CueHandle) -> Result<()> {
        self.calls.lock().unwrap().push(MediaCall::Preload(cue.id));
        Ok(())
    }

    fn play_from_start(&mut self, cue: CueId) -> Result<()> {
        self.calls.lock().unwrap().push(MediaCall::Play(cue));
        if *self.reject_plays.lock().unwrap() {
            return Err(Error::PlaybackRejected {
                cue: cue.to_string(),
                reason: "autoplay blocked".to_string(),
            });
        }
        Ok(())
    }

    fn stop(&mut self, cue: CueId) -> Result<()> {
        self.calls.lock().unwrap().push(MediaCall::Stop(cue));
        Ok(())
    }

    fn set_volume(&mut self, cue: CueId, volume: f32) -> Result<()> {
        self.calls.lock().unwrap().push(MediaCall::SetVolume(cue, volume));
        Ok(())
    }
}
