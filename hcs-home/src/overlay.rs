//! Transient overlays
//!
//! The help hint, the "launching" banner and the embedded-game flag are
//! independent of navigation. The banner clears itself through a
//! [`DelayedReset`] polled with an injected clock.

use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed-duration deadline. Re-arming supersedes the previous deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayedReset {
    deadline: Option<Instant>,
}

impl DelayedReset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Overlay flags shown on top of the home screen
#[derive(Debug, Clone)]
pub struct Overlays {
    help_visible: bool,
    launching_game: Option<usize>,
    banner_reset: DelayedReset,
    banner_duration: Duration,
    embedded_game_open: bool,
}

impl Overlays {
    pub fn new(banner_duration: Duration) -> Self {
        Self {
            help_visible: true,
            launching_game: None,
            banner_reset: DelayedReset::new(),
            banner_duration,
            embedded_game_open: false,
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn hide_help(&mut self) {
        self.help_visible = false;
    }

    /// Title index named by the launch banner, if it is showing
    pub fn launching_game(&self) -> Option<usize> {
        self.launching_game
    }

    pub fn embedded_game_open(&self) -> bool {
        self.embedded_game_open
    }

    /// Show the banner for `game`, replacing any banner already up
    pub fn show_launch_banner(&mut self, game: usize, now: Instant) {
        self.launching_game = Some(game);
        self.banner_reset.arm(now, self.banner_duration);
        debug!("Launch banner shown for game {}", game);
    }

    pub fn clear_launch_banner(&mut self) {
        self.launching_game = None;
        self.banner_reset.cancel();
    }

    pub fn open_embedded_game(&mut self) {
        self.clear_launch_banner();
        self.embedded_game_open = true;
    }

    pub fn close_embedded_game(&mut self) {
        self.embedded_game_open = false;
    }

    /// Clear an expired banner. Returns `true` when one was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.banner_reset.fire_if_due(now) {
            self.launching_game = None;
            debug!("Launch banner cleared");
            return true;
        }
        false
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.banner_reset.deadline()
    }
}
