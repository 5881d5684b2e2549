//! Home screen session
//!
//! `HomeSession` owns all mutable home screen state and is the single entry
//! point for input. Each call to [`HomeSession::dispatch`] grants the media
//! gate first, then routes the input either to the embedded game (while it is
//! open) or through classification to the navigation machine, and finally
//! fans the result out to the cue registry, the viewport and the event bus.

use crate::ambient::StatusBar;
use crate::catalog::{Catalog, LaunchMode};
use crate::config::HomeConfig;
use crate::embedded::{EmbeddedGame, GameSignal};
use crate::error::Result;
use crate::input::{classify, InputClass, PointerTarget, RawInput};
use crate::media::{CueRegistry, MediaEngine};
use crate::navigation::{ActivationEvent, NavigationState, NavigationStateMachine, Section};
use crate::overlay::Overlays;
use crate::viewport::{TileGeometry, ViewportSync};
use hcs_common::events::{EventBus, HomeEvent};
use hcs_common::time;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Layout and timer values the session needs at construction
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub geometry: TileGeometry,
    pub viewport_width: f64,
    pub launch_banner: Duration,
}

/// Read-only snapshot for the renderer
#[derive(Debug, Clone)]
pub struct HomeView {
    pub catalog: Arc<Catalog>,
    pub navigation: NavigationState,
    pub interaction_granted: bool,
    pub help_visible: bool,
    /// Title named by the launch banner
    pub launching_game: Option<usize>,
    pub embedded_game_open: bool,
    pub game_status: Option<String>,
    /// Horizontal scroll target of the game row
    pub scroll_target: f64,
    pub status: StatusBar,
}

pub struct HomeSession {
    catalog: Arc<Catalog>,
    navigation: NavigationStateMachine,
    media: CueRegistry,
    viewport: ViewportSync,
    overlays: Overlays,
    game: Box<dyn EmbeddedGame>,
    bus: EventBus,
    status: StatusBar,
    hovered_icon: Option<usize>,
}

impl HomeSession {
    pub fn new(
        catalog: Arc<Catalog>,
        media: CueRegistry,
        game: Box<dyn EmbeddedGame>,
        settings: SessionSettings,
        bus: EventBus,
    ) -> Result<Self> {
        let navigation = NavigationStateMachine::new(catalog.game_count(), catalog.icon_count())?;
        let mut viewport = ViewportSync::new(settings.geometry, settings.viewport_width);
        viewport.sync(0, Section::Games);

        Ok(Self {
            catalog,
            navigation,
            media,
            viewport,
            overlays: Overlays::new(settings.launch_banner),
            game,
            bus,
            status: StatusBar {
                clock: String::new(),
                battery_percent: 0,
            },
            hovered_icon: None,
        })
    }

    /// Assemble a session from validated configuration
    pub fn from_config(
        config: &HomeConfig,
        catalog: Arc<Catalog>,
        engine: Box<dyn MediaEngine>,
        game: Box<dyn EmbeddedGame>,
        bus: EventBus,
        viewport_width: f64,
    ) -> Result<Self> {
        let bindings = catalog.icons().iter().map(|icon| icon.cue).collect();
        let media = CueRegistry::new(
            engine,
            config.sounds.cue_catalog(),
            bindings,
            config.priming_delay(),
        );
        let settings = SessionSettings {
            geometry: config.tile_geometry(),
            viewport_width,
            launch_banner: config.launch_banner(),
        };
        Self::new(catalog, media, game, settings, bus)
    }

    /// Handle one input. Returns the events it produced, which are also
    /// published on the bus.
    pub fn dispatch(&mut self, input: RawInput, now: Instant) -> Vec<HomeEvent> {
        let mut events = Vec::new();

        if self.media.grant_interaction(now) {
            self.overlays.hide_help();
            events.push(HomeEvent::InteractionGranted {
                timestamp: time::now(),
            });
        }

        if self.overlays.embedded_game_open() {
            match input {
                RawInput::Key(key) => {
                    if self.game.handle_key(key) == GameSignal::Exit {
                        self.close_embedded_game(&mut events);
                    }
                }
                RawInput::Click {
                    target: Some(PointerTarget::ExitGame),
                } => self.close_embedded_game(&mut events),
                _ => trace!("Pointer input ignored while the game is open"),
            }
            self.publish(&events);
            return events;
        }

        match input {
            RawInput::Key(_) => match classify(&input) {
                InputClass::Directional(direction) => {
                    if let Some(hover) = self.navigation.handle_directional(direction) {
                        self.media.play_hover();
                        let state = self.navigation.state();
                        self.viewport
                            .sync(state.selected_game_index, state.focused_section);
                        events.push(HomeEvent::Hover {
                            section: hover.section,
                            index: hover.index,
                            timestamp: time::now(),
                        });
                    }
                }
                InputClass::Activate => {
                    if let Some(activation) = self.navigation.handle_activate() {
                        self.activate(activation, now, &mut events);
                    }
                }
                InputClass::GrantOnly => trace!("Input {:?} has no navigation meaning", input),
            },
            RawInput::PointerMove { target } => self.pointer_moved(target),
            RawInput::Click {
                target: Some(PointerTarget::Icon(index)),
            } => self.activate_icon(index, &mut events),
            RawInput::Click { target } => trace!("Click on {:?} has no effect here", target),
        }

        self.publish(&events);
        events
    }

    fn activate(&mut self, activation: ActivationEvent, now: Instant, events: &mut Vec<HomeEvent>) {
        match activation {
            ActivationEvent::LaunchGame(index) => {
                let catalog = Arc::clone(&self.catalog);
                let Some(entry) = catalog.game(index) else {
                    return;
                };
                let embedded = entry.launch == LaunchMode::Embedded;
                events.push(HomeEvent::GameLaunched {
                    index,
                    name: entry.name.clone(),
                    embedded,
                    timestamp: time::now(),
                });
                if embedded {
                    self.open_embedded_game();
                } else {
                    info!("Launching '{}'", entry.name);
                    self.media.play_launch_cue();
                    self.overlays.show_launch_banner(index, now);
                }
            }
            ActivationEvent::ActivateIcon(index) => self.activate_icon(index, events),
        }
    }

    fn activate_icon(&mut self, index: usize, events: &mut Vec<HomeEvent>) {
        let Some(icon) = self.catalog.icon(index) else {
            return;
        };
        debug!("Icon '{}' activated", icon.label);
        events.push(HomeEvent::IconActivated {
            index,
            label: icon.label.clone(),
            timestamp: time::now(),
        });
        self.media.play_icon_cue(index);
    }

    fn pointer_moved(&mut self, target: Option<PointerTarget>) {
        let icon = match target {
            Some(PointerTarget::Icon(index)) => Some(index),
            _ => None,
        };
        if icon == self.hovered_icon {
            return;
        }
        self.hovered_icon = icon;
        if icon.is_some_and(|index| index < self.catalog.icon_count()) {
            self.media.play_hover();
        }
    }

    fn open_embedded_game(&mut self) {
        self.media.stop_all();
        self.media.play_launch_cue();
        self.overlays.open_embedded_game();
        self.navigation.lock();
        self.game.open();
    }

    fn close_embedded_game(&mut self, events: &mut Vec<HomeEvent>) {
        self.game.close();
        self.media.stop_all();
        self.overlays.close_embedded_game();
        self.navigation.unlock();
        events.push(HomeEvent::EmbeddedGameClosed {
            timestamp: time::now(),
        });
    }

    /// Run due timers: priming completion and banner expiry
    pub fn tick(&mut self, now: Instant) -> Vec<HomeEvent> {
        let mut events = Vec::new();
        self.media.poll(now);
        if self.overlays.tick(now) {
            events.push(HomeEvent::LaunchBannerCleared {
                timestamp: time::now(),
            });
        }
        self.publish(&events);
        events
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.media.next_deadline(), self.overlays.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport.set_viewport_width(viewport_width);
        let state = self.navigation.state();
        self.viewport
            .sync(state.selected_game_index, state.focused_section);
    }

    pub fn set_status(&mut self, status: StatusBar) {
        self.status = status;
    }

    /// Stop every cue; used on shutdown
    pub fn shutdown(&mut self) {
        if self.overlays.embedded_game_open() {
            self.game.close();
        }
        self.media.stop_all();
    }

    pub fn view(&self) -> HomeView {
        let embedded_game_open = self.overlays.embedded_game_open();
        HomeView {
            catalog: Arc::clone(&self.catalog),
            navigation: self.navigation.state(),
            interaction_granted: self.media.is_granted(),
            help_visible: self.overlays.help_visible(),
            launching_game: self.overlays.launching_game(),
            embedded_game_open,
            game_status: embedded_game_open.then(|| self.game.status_line()),
            scroll_target: self.viewport.target(),
            status: self.status.clone(),
        }
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation.state()
    }

    pub fn is_locked(&self) -> bool {
        self.navigation.is_locked()
    }

    pub fn media(&self) -> &CueRegistry {
        &self.media
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn publish(&self, events: &[HomeEvent]) {
        for event in events {
            self.bus.emit_lossy(event.clone());
        }
    }
}
