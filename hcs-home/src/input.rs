//! Input classification
//!
//! Terminal events are mapped to [`RawInput`] (keys, clicks, pointer moves)
//! and then classified against the fixed keymap. Every raw input counts as a
//! user interaction for the media gate, even when it classifies as
//! [`InputClass::GrantOnly`].

use crate::navigation::Direction;
use crossterm::event::{
    self, Event as TerminalEvent, KeyCode as TerminalKeyCode, KeyEventKind, KeyModifiers,
    ModifierKeyCode, MouseEventKind,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long the blocking reader waits before re-checking cancellation
const READER_POLL: Duration = Duration::from_millis(100);

/// Keys the home screen and the embedded game understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    Shift,
    Char(char),
}

/// What the pointer is over, from renderer hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Icon(usize),
    /// Exit button of the embedded game modal
    ExitGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    Key(KeyInput),
    Click { target: Option<PointerTarget> },
    PointerMove { target: Option<PointerTarget> },
}

/// Navigation meaning of a raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    Directional(Direction),
    Activate,
    /// Counts as interaction, nothing else
    GrantOnly,
}

pub fn classify(input: &RawInput) -> InputClass {
    match input {
        RawInput::Key(KeyInput::Left) => InputClass::Directional(Direction::Left),
        RawInput::Key(KeyInput::Right) => InputClass::Directional(Direction::Right),
        RawInput::Key(KeyInput::Up) => InputClass::Directional(Direction::Up),
        RawInput::Key(KeyInput::Down) => InputClass::Directional(Direction::Down),
        RawInput::Key(KeyInput::Enter) | RawInput::Key(KeyInput::Space) => InputClass::Activate,
        _ => InputClass::GrantOnly,
    }
}

/// Terminal event after mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    Raw(RawInput),
    Resize { width: u16, height: u16 },
    /// Ctrl+C
    Interrupt,
}

fn map_key_code(code: TerminalKeyCode) -> Option<KeyInput> {
    let key = match code {
        TerminalKeyCode::Left => KeyInput::Left,
        TerminalKeyCode::Right => KeyInput::Right,
        TerminalKeyCode::Up => KeyInput::Up,
        TerminalKeyCode::Down => KeyInput::Down,
        TerminalKeyCode::Enter => KeyInput::Enter,
        TerminalKeyCode::Esc => KeyInput::Escape,
        TerminalKeyCode::Char(' ') => KeyInput::Space,
        TerminalKeyCode::Char(ch) => KeyInput::Char(ch),
        TerminalKeyCode::Modifier(ModifierKeyCode::LeftShift)
        | TerminalKeyCode::Modifier(ModifierKeyCode::RightShift) => KeyInput::Shift,
        _ => return None,
    };
    Some(key)
}

/// Map a crossterm event. `hit_test` resolves a cell to a pointer target.
pub fn map_terminal_event<F>(event: TerminalEvent, hit_test: F) -> Option<TerminalInput>
where
    F: Fn(u16, u16) -> Option<PointerTarget>,
{
    match event {
        TerminalEvent::Resize(width, height) => Some(TerminalInput::Resize { width, height }),
        TerminalEvent::Key(key_event) => {
            if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                return None;
            }
            if matches!(key_event.code, TerminalKeyCode::Char('c'))
                && key_event.modifiers.contains(KeyModifiers::CONTROL)
            {
                return Some(TerminalInput::Interrupt);
            }
            map_key_code(key_event.code).map(|key| TerminalInput::Raw(RawInput::Key(key)))
        }
        TerminalEvent::Mouse(mouse) => {
            let target = hit_test(mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Down(_) => Some(TerminalInput::Raw(RawInput::Click { target })),
                MouseEventKind::Moved => {
                    Some(TerminalInput::Raw(RawInput::PointerMove { target }))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Read terminal events on a blocking thread and forward them.
///
/// Stops when `cancel` fires, the receiver goes away, or reading fails.
pub fn spawn_terminal_reader(
    tx: mpsc::Sender<TerminalEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            match event::poll(READER_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!("poll terminal event: {}", e);
                    break;
                }
            }
            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    warn!("read terminal event: {}", e);
                    break;
                }
            };
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
        debug!("Terminal reader stopped");
    })
}
