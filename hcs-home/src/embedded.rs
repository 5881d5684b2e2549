//! Embedded game modal
//!
//! The game owns its own rules. The home screen opens it, forwards keys to it
//! while it is open, and closes it when it reports [`GameSignal::Exit`].

use crate::input::KeyInput;
use tracing::{debug, info};

/// Result of forwarding one key to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSignal {
    Continue,
    /// The game wants the modal closed
    Exit,
}

/// Falling-block game actions on the fixed key map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
    Hold,
    TogglePause,
    Exit,
}

impl GameAction {
    pub fn from_key(key: KeyInput) -> Option<Self> {
        let action = match key {
            KeyInput::Left => GameAction::MoveLeft,
            KeyInput::Right => GameAction::MoveRight,
            KeyInput::Down => GameAction::MoveDown,
            KeyInput::Space => GameAction::HardDrop,
            KeyInput::Up | KeyInput::Char('x') | KeyInput::Char('X') => {
                GameAction::RotateClockwise
            }
            KeyInput::Char('z') | KeyInput::Char('Z') => GameAction::RotateCounterClockwise,
            KeyInput::Shift | KeyInput::Char('c') | KeyInput::Char('C') => GameAction::Hold,
            KeyInput::Char('p') | KeyInput::Char('P') => GameAction::TogglePause,
            KeyInput::Escape => GameAction::Exit,
            _ => return None,
        };
        Some(action)
    }
}

/// A game hosted in the modal
pub trait EmbeddedGame: Send {
    fn open(&mut self);

    fn close(&mut self);

    fn handle_key(&mut self, key: KeyInput) -> GameSignal;

    /// One line for the modal footer
    fn status_line(&self) -> String {
        String::new()
    }
}

/// Minimal game: tracks the key map and exits on Escape
#[derive(Debug, Default)]
pub struct PassthroughGame {
    open: bool,
    paused: bool,
    last_action: Option<GameAction>,
    actions: u64,
}

impl PassthroughGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_action(&self) -> Option<GameAction> {
        self.last_action
    }
}

impl EmbeddedGame for PassthroughGame {
    fn open(&mut self) {
        self.open = true;
        self.paused = false;
        self.last_action = None;
        self.actions = 0;
        info!("Embedded game opened");
    }

    fn close(&mut self) {
        self.open = false;
        info!("Embedded game closed after {} actions", self.actions);
    }

    fn handle_key(&mut self, key: KeyInput) -> GameSignal {
        let Some(action) = GameAction::from_key(key) else {
            return GameSignal::Continue;
        };
        self.last_action = Some(action);
        self.actions += 1;
        debug!("Game action {:?}", action);

        match action {
            GameAction::Exit => GameSignal::Exit,
            GameAction::TogglePause => {
                self.paused = !self.paused;
                GameSignal::Continue
            }
            _ => GameSignal::Continue,
        }
    }

    fn status_line(&self) -> String {
        let state = if self.paused { "paused" } else { "playing" };
        match self.last_action {
            Some(action) => format!("{} | last: {:?} | Esc to exit", state, action),
            None => format!("{} | Esc to exit", state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map() {
        assert_eq!(GameAction::from_key(KeyInput::Down), Some(GameAction::MoveDown));
        assert_eq!(GameAction::from_key(KeyInput::Space), Some(GameAction::HardDrop));
        assert_eq!(
            GameAction::from_key(KeyInput::Char('z')),
            Some(GameAction::RotateCounterClockwise)
        );
        assert_eq!(GameAction::from_key(KeyInput::Up), Some(GameAction::RotateClockwise));
        assert_eq!(GameAction::from_key(KeyInput::Char('x')), Some(GameAction::RotateClockwise));
        assert_eq!(GameAction::from_key(KeyInput::Shift), Some(GameAction::Hold));
        assert_eq!(GameAction::from_key(KeyInput::Char('c')), Some(GameAction::Hold));
        assert_eq!(GameAction::from_key(KeyInput::Char('p')), Some(GameAction::TogglePause));
        assert_eq!(GameAction::from_key(KeyInput::Escape), Some(GameAction::Exit));
        assert_eq!(GameAction::from_key(KeyInput::Enter), None);
        assert_eq!(GameAction::from_key(KeyInput::Char('q')), None);
    }

    #[test]
    fn test_escape_exits() {
        let mut game = PassthroughGame::new();
        game.open();
        assert_eq!(game.handle_key(KeyInput::Left), GameSignal::Continue);
        assert_eq!(game.handle_key(KeyInput::Escape), GameSignal::Exit);
    }

    #[test]
    fn test_pause_toggles() {
        let mut game = PassthroughGame::new();
        game.open();
        game.handle_key(KeyInput::Char('p'));
        assert!(game.is_paused());
        assert!(game.status_line().starts_with("paused"));
        game.handle_key(KeyInput::Char('p'));
        assert!(!game.is_paused());
    }

    #[test]
    fn test_reopen_resets() {
        let mut game = PassthroughGame::new();
        game.open();
        game.handle_key(KeyInput::Char('p'));
        game.close();
        assert!(!game.is_open());

        game.open();
        assert!(game.is_open());
        assert!(!game.is_paused());
        assert_eq!(game.last_action(), None);
    }
}
