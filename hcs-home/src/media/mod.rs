//! Sound cues
//!
//! The [`CueRegistry`] gates every audible side effect behind the one-time
//! interaction grant. A [`MediaEngine`] owns decoding and output; the
//! registry only asks it to preload, play from the start, stop, and set a
//! level.

pub mod engine;
pub mod registry;

pub use engine::{CpalMediaEngine, CueBank};
pub use registry::{CueRegistry, MediaGateState};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::trace;

/// Identity of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueId {
    /// Selection / focus movement
    Hover,
    /// Shared game launch cue
    Launch,
    /// Cue bound to a dock icon position
    Icon(usize),
}

impl std::fmt::Display for CueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueId::Hover => write!(f, "hover"),
            CueId::Launch => write!(f, "launch"),
            CueId::Icon(index) => write!(f, "icon[{}]", index),
        }
    }
}

/// Configured source and level for one cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueSpec {
    /// Audio file; relative paths resolve against the sounds directory
    pub file: PathBuf,
    /// Playback level in [0, 1]
    #[serde(default = "default_cue_volume")]
    pub volume: f32,
}

fn default_cue_volume() -> f32 {
    0.5
}

impl CueSpec {
    pub fn new(file: impl Into<PathBuf>, volume: f32) -> Self {
        Self {
            file: file.into(),
            volume,
        }
    }
}

/// Every cue the home screen can play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueCatalog {
    pub hover: CueSpec,
    pub launch: CueSpec,
    /// Indexed by the `cue` field of dock icons
    pub icons: Vec<CueSpec>,
}

impl CueCatalog {
    /// Hover, launch, then icon cues in index order
    pub fn specs(&self) -> impl Iterator<Item = &CueSpec> {
        std::iter::once(&self.hover)
            .chain(std::iter::once(&self.launch))
            .chain(self.icons.iter())
    }
}

/// A constructed cue: identity, resolved source, configured level
#[derive(Debug, Clone, PartialEq)]
pub struct CueHandle {
    pub id: CueId,
    pub source: PathBuf,
    pub volume: f32,
}

/// Host audio subsystem.
///
/// Errors returned here are playback rejections; the registry logs and
/// swallows them.
pub trait MediaEngine: Send {
    /// Attach the cue's already-decoded audio so later plays start
    /// instantly. Runs inside input dispatch and must not decode.
    fn preload(&mut self, cue: &CueHandle) -> Result<()>;

    /// Rewind the cue to its first frame and start it
    fn play_from_start(&mut self, cue: CueId) -> Result<()>;

    /// Stop the cue if it is playing
    fn stop(&mut self, cue: CueId) -> Result<()>;

    /// Set the cue's output level in [0, 1]
    fn set_volume(&mut self, cue: CueId, volume: f32) -> Result<()>;
}

/// Engine used when audio is disabled or no output device exists.
/// Accepts every request and produces no sound.
#[derive(Debug, Default)]
pub struct NullMediaEngine;

impl MediaEngine for NullMediaEngine {
    fn preload(&mut self, cue: &CueHandle) -> Result<()> {
        trace!("null engine: preload {}", cue.id);
        Ok(())
    }

    fn play_from_start(&mut self, cue: CueId) -> Result<()> {
        trace!("null engine: play {}", cue);
        Ok(())
    }

    fn stop(&mut self, _cue: CueId) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _cue: CueId, _volume: f32) -> Result<()> {
        Ok(())
    }
}
