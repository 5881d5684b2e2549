//! Focus and selection state machine
//!
//! The machine has two states, the focused [`Section`]. Each section owns a
//! selection index that moves around a ring: stepping past either end wraps,
//! so there is no boundary state. The sections are independent rings and keep
//! their index while unfocused.
//!
//! | Focus  | Input        | Effect                          |
//! |--------|--------------|---------------------------------|
//! | Games  | Left / Right | game index -1 / +1, `Hover`     |
//! | Games  | Down         | focus Icons, `Hover`            |
//! | Icons  | Left / Right | icon index -1 / +1, `Hover`     |
//! | Icons  | Up           | focus Games, `Hover`            |
//! | Games  | Activate     | `LaunchGame(game index)`        |
//! | Icons  | Activate     | `ActivateIcon(icon index)`      |
//!
//! Anything else is ignored. While the embedded game is open the machine is
//! locked and drops every input.

use crate::error::{Error, Result};
use tracing::{debug, trace};

pub use hcs_common::events::Section;

/// Directional key after keymap translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Focus and selection. Both indices stay in range even while their section
/// is not focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub focused_section: Section,
    pub selected_game_index: usize,
    pub selected_icon_index: usize,
}

impl NavigationState {
    /// Startup state: games focused, first tile and first icon selected
    pub fn initial() -> Self {
        Self {
            focused_section: Section::Games,
            selected_game_index: 0,
            selected_icon_index: 0,
        }
    }

    /// Selected index of the focused section
    pub fn focused_index(&self) -> usize {
        match self.focused_section {
            Section::Games => self.selected_game_index,
            Section::Icons => self.selected_icon_index,
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Ring sizes of the two sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub games: usize,
    pub icons: usize,
}

/// Selection or focus moved; the hover cue should play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverEvent {
    pub section: Section,
    pub index: usize,
}

/// Activation of the focused item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationEvent {
    LaunchGame(usize),
    ActivateIcon(usize),
}

/// Input understood by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    Directional(Direction),
    Activate,
}

/// Output of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Hover(HoverEvent),
    Activation(ActivationEvent),
}

fn wrap_step(index: usize, count: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % count
    } else {
        (index + count - 1) % count
    }
}

/// Pure transition function.
///
/// Given the same state and input the result is always the same. Empty rings
/// or an index already out of range leave the state untouched.
pub fn step(state: NavigationState, input: NavInput, bounds: Bounds) -> (NavigationState, Option<NavEvent>) {
    if bounds.games == 0
        || bounds.icons == 0
        || state.selected_game_index >= bounds.games
        || state.selected_icon_index >= bounds.icons
    {
        return (state, None);
    }

    let mut next = state;
    let event = match (state.focused_section, input) {
        (Section::Games, NavInput::Directional(dir @ (Direction::Left | Direction::Right))) => {
            next.selected_game_index =
                wrap_step(state.selected_game_index, bounds.games, dir == Direction::Right);
            Some(NavEvent::Hover(HoverEvent {
                section: Section::Games,
                index: next.selected_game_index,
            }))
        }
        (Section::Games, NavInput::Directional(Direction::Down)) => {
            next.focused_section = Section::Icons;
            Some(NavEvent::Hover(HoverEvent {
                section: Section::Icons,
                index: next.selected_icon_index,
            }))
        }
        (Section::Icons, NavInput::Directional(dir @ (Direction::Left | Direction::Right))) => {
            next.selected_icon_index =
                wrap_step(state.selected_icon_index, bounds.icons, dir == Direction::Right);
            Some(NavEvent::Hover(HoverEvent {
                section: Section::Icons,
                index: next.selected_icon_index,
            }))
        }
        (Section::Icons, NavInput::Directional(Direction::Up)) => {
            next.focused_section = Section::Games;
            Some(NavEvent::Hover(HoverEvent {
                section: Section::Games,
                index: next.selected_game_index,
            }))
        }
        (Section::Games, NavInput::Activate) => Some(NavEvent::Activation(
            ActivationEvent::LaunchGame(state.selected_game_index),
        )),
        (Section::Icons, NavInput::Activate) => Some(NavEvent::Activation(
            ActivationEvent::ActivateIcon(state.selected_icon_index),
        )),
        // Up on the top row, Down on the dock
        (Section::Games, NavInput::Directional(Direction::Up))
        | (Section::Icons, NavInput::Directional(Direction::Down)) => None,
    };

    (next, event)
}

/// Owner of the live [`NavigationState`]
#[derive(Debug)]
pub struct NavigationStateMachine {
    state: NavigationState,
    bounds: Bounds,
    locked: bool,
}

impl NavigationStateMachine {
    /// Create the machine for the given ring sizes.
    ///
    /// # Errors
    /// Either ring being empty is a fatal configuration error.
    pub fn new(game_count: usize, icon_count: usize) -> Result<Self> {
        if game_count == 0 || icon_count == 0 {
            return Err(Error::Config(format!(
                "navigation needs at least one game and one icon (games={}, icons={})",
                game_count, icon_count
            )));
        }
        Ok(Self {
            state: NavigationState::initial(),
            bounds: Bounds {
                games: game_count,
                icons: icon_count,
            },
            locked: false,
        })
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True while the embedded game holds input
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Stop accepting input (embedded game opened)
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Resume accepting input. Selection is whatever it was before `lock`.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Handle a directional key
    pub fn handle_directional(&mut self, direction: Direction) -> Option<HoverEvent> {
        match self.apply(NavInput::Directional(direction)) {
            Some(NavEvent::Hover(hover)) => Some(hover),
            _ => None,
        }
    }

    /// Handle Enter / Space
    pub fn handle_activate(&mut self) -> Option<ActivationEvent> {
        match self.apply(NavInput::Activate) {
            Some(NavEvent::Activation(activation)) => Some(activation),
            _ => None,
        }
    }

    /// Run one transition against the owned state
    pub fn apply(&mut self, input: NavInput) -> Option<NavEvent> {
        if self.locked {
            trace!("navigation locked, dropping {:?}", input);
            return None;
        }

        let (next, event) = step(self.state, input, self.bounds);
        if event.is_none() {
            trace!("ignored {:?} in {}", input, self.state.focused_section);
        } else if next != self.state {
            debug!(
                "navigation: {} game={} icon={} -> {} game={} icon={}",
                self.state.focused_section,
                self.state.selected_game_index,
                self.state.selected_icon_index,
                next.focused_section,
                next.selected_game_index,
                next.selected_icon_index
            );
        }
        self.state = next;
        event
    }
}
