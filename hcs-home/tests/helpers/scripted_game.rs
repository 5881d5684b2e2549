//! Embedded game double

use hcs_home::embedded::{EmbeddedGame, GameSignal};
use hcs_home::input::KeyInput;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct GameLog {
    opened: usize,
    closed: usize,
    keys: Vec<KeyInput>,
}

/// Records keys and exits on Escape
pub struct ScriptedGame {
    log: Arc<Mutex<GameLog>>,
}

/// Read side of a ScriptedGame moved into a session
#[derive(Clone)]
pub struct GameTracker {
    log: Arc<Mutex<GameLog>>,
}

impl ScriptedGame {
    pub fn new() -> (Self, GameTracker) {
        let log = Arc::new(Mutex::new(GameLog::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            GameTracker { log },
        )
    }
}

impl EmbeddedGame for ScriptedGame {
    fn open(&mut self) {
        self.log.lock().unwrap().opened += 1;
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }

    fn handle_key(&mut self, key: KeyInput) -> GameSignal {
        self.log.lock().unwrap().keys.push(key);
        if key == KeyInput::Escape {
            GameSignal::Exit
        } else {
            GameSignal::Continue
        }
    }

    fn status_line(&self) -> String {
        format!("{} keys", self.log.lock().unwrap().keys.len())
    }
}

impl GameTracker {
    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }

    pub fn keys(&self) -> Vec<KeyInput> {
        self.log.lock().unwrap().keys.clone()
    }
}
