//! Test helpers for hcs-home integration tests
//!
//! - RecordingEngine: media engine that logs every call
//! - ScriptedGame: embedded game that records keys and exits on Escape
//! - audio_generator: WAV cue files via hound
//! - Harness: a session wired to both, with a configurable catalogue

#![allow(dead_code)]

pub mod audio_generator;
pub mod recording_engine;
pub mod scripted_game;

pub use recording_engine::{MediaCall, RecordingEngine};
pub use scripted_game::{GameTracker, ScriptedGame};

use hcs_common::events::EventBus;
use hcs_home::catalog::{GameCatalogEntry, LaunchMode};
use hcs_home::config::HomeConfig;
use hcs_home::input::{KeyInput, RawInput};
use hcs_home::HomeSession;
use std::sync::Arc;
use std::time::Instant;

/// Viewport width used by harness sessions
pub const VIEWPORT_WIDTH: f64 = 1280.0;

pub struct Harness {
    pub session: HomeSession,
    pub engine: RecordingEngine,
    pub game: GameTracker,
    pub start: Instant,
}

/// Game list of `count` banner titles; `embedded` marks one as the modal game
pub fn games(count: usize, embedded: Option<usize>) -> Vec<GameCatalogEntry> {
    (0..count)
        .map(|index| GameCatalogEntry {
            name: format!("Game {}", index),
            image_ref: String::new(),
            launch: if embedded == Some(index) {
                LaunchMode::Embedded
            } else {
                LaunchMode::Banner
            },
        })
        .collect()
}

impl Harness {
    pub fn new(config: HomeConfig) -> Self {
        let engine = RecordingEngine::new();
        let (game, tracker) = ScriptedGame::new();
        let catalog = Arc::new(config.catalog().expect("valid catalogue"));
        let session = HomeSession::from_config(
            &config,
            catalog,
            Box::new(engine.clone()),
            Box::new(game),
            EventBus::new(64),
            VIEWPORT_WIDTH,
        )
        .expect("session");
        Self {
            session,
            engine,
            game: tracker,
            start: Instant::now(),
        }
    }

    /// Default config with `count` banner games and the stock dock
    pub fn with_games(count: usize, embedded: Option<usize>) -> Self {
        let mut config = HomeConfig::default();
        config.games = games(count, embedded);
        Self::new(config)
    }

    pub fn key(&mut self, key: KeyInput) -> Vec<hcs_common::events::HomeEvent> {
        self.session.dispatch(RawInput::Key(key), self.start)
    }

    pub fn input_at(
        &mut self,
        input: RawInput,
        offset_ms: u64,
    ) -> Vec<hcs_common::events::HomeEvent> {
        self.session
            .dispatch(input, self.start + std::time::Duration::from_millis(offset_ms))
    }

    pub fn tick_at(&mut self, offset_ms: u64) -> Vec<hcs_common::events::HomeEvent> {
        self.session
            .tick(self.start + std::time::Duration::from_millis(offset_ms))
    }
}
