//! Event types for the HCS event system
//!
//! Provides the shared event definitions and the EventBus. The home session
//! publishes every navigation and media side effect here; the renderer wakeup,
//! the event journal, and tests subscribe.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// One of the two independently indexed, cyclic sections of the home screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum Section {
    /// Game tile row
    Games,
    /// Dock icon row
    Icons,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Games => write!(f, "Games"),
            Section::Icons => write!(f, "Icons"),
        }
    }
}

/// HCS event types
///
/// Events are broadcast via EventBus and can be serialized for the event journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HomeEvent {
    /// First qualifying user input observed; audio is unlocked
    InteractionGranted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Selection or focus moved; the hover cue was requested
    Hover {
        /// Section focused after the move
        section: Section,
        /// Selected index within that section
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A game tile was activated
    GameLaunched {
        index: usize,
        name: String,
        /// True when the title opened the embedded game instead of the banner
        embedded: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A dock icon was activated (keyboard or pointer)
    IconActivated {
        index: usize,
        label: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The launch banner timed out or was superseded
    LaunchBannerCleared {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The embedded game modal closed; navigation resumes
    EmbeddedGameClosed {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl HomeEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            HomeEvent::InteractionGranted { .. } => "InteractionGranted",
            HomeEvent::Hover { .. } => "Hover",
            HomeEvent::GameLaunched { .. } => "GameLaunched",
            HomeEvent::IconActivated { .. } => "IconActivated",
            HomeEvent::LaunchBannerCleared { .. } => "LaunchBannerCleared",
            HomeEvent::EmbeddedGameClosed { .. } => "EmbeddedGameClosed",
        }
    }

    /// Serialize as one JSON line for the event journal
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One-to-many event broadcaster built on tokio::broadcast
pub struct EventBus {
    tx: broadcast::Sender<HomeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use hcs_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(64);
    /// assert_eq!(event_bus.capacity(), 64);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<HomeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: HomeEvent,
    ) -> Result<usize, broadcast::error::SendError<HomeEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: HomeEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
