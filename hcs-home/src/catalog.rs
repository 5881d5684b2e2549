//! Game and dock icon catalogue
//!
//! Two immutable ordered lists supplied at startup. The session shares one
//! `Arc<Catalog>` with the renderer; nothing mutates it afterwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How activating a game tile behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Play the launch cue and show the "Launching ..." banner
    #[default]
    Banner,
    /// Open the embedded game modal
    Embedded,
}

/// One tile in the game row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCatalogEntry {
    pub name: String,
    /// Opaque resource locator for the tile artwork; only the renderer reads it
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub launch: LaunchMode,
}

/// One button in the dock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconEntry {
    pub label: String,
    /// Index into the configured icon cue list
    pub cue: usize,
    /// Visual accent hint for the renderer
    #[serde(default)]
    pub accent: Option<String>,
}

/// Validated catalogue. Both lists are non-empty and every icon's cue index
/// is bound.
#[derive(Debug, Clone)]
pub struct Catalog {
    games: Vec<GameCatalogEntry>,
    icons: Vec<IconEntry>,
}

impl Catalog {
    /// Build a catalogue, rejecting configurations that would break the
    /// wrap-around arithmetic or point at cues that do not exist.
    pub fn new(
        games: Vec<GameCatalogEntry>,
        icons: Vec<IconEntry>,
        icon_cue_count: usize,
    ) -> Result<Self> {
        if games.is_empty() {
            return Err(Error::Config("game catalogue is empty".to_string()));
        }
        if icons.is_empty() {
            return Err(Error::Config("icon dock is empty".to_string()));
        }
        if let Some(bad) = icons.iter().find(|icon| icon.cue >= icon_cue_count) {
            return Err(Error::Config(format!(
                "icon '{}' references cue {} but only {} icon cues are configured",
                bad.label, bad.cue, icon_cue_count
            )));
        }
        Ok(Self { games, icons })
    }

    pub fn games(&self) -> &[GameCatalogEntry] {
        &self.games
    }

    pub fn icons(&self) -> &[IconEntry] {
        &self.icons
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    pub fn game(&self, index: usize) -> Option<&GameCatalogEntry> {
        self.games.get(index)
    }

    pub fn icon(&self, index: usize) -> Option<&IconEntry> {
        self.icons.get(index)
    }
}

/// Built-in game row used when the config file has no `[[games]]`
pub fn default_games() -> Vec<GameCatalogEntry> {
    let banner = |name: &str, image_ref: &str| GameCatalogEntry {
        name: name.to_string(),
        image_ref: image_ref.to_string(),
        launch: LaunchMode::Banner,
    };
    vec![
        banner("Super Smash Bros. Ultimate", "tiles/smash.jpg"),
        GameCatalogEntry {
            name: "Tetris".to_string(),
            image_ref: "tiles/tetris.png".to_string(),
            launch: LaunchMode::Embedded,
        },
        banner("The Legend of Zelda: Breath of the Wild", "tiles/botw.jpg"),
        banner("Super Mario Odyssey", "tiles/odyssey.jpg"),
        banner("The Legend of Zelda: Tears of the Kingdom", "tiles/totk.png"),
    ]
}

/// Built-in dock used when the config file has no `[[icons]]`
pub fn default_icons() -> Vec<IconEntry> {
    [
        "Nintendo Online",
        "News",
        "eShop",
        "Album",
        "Controllers",
        "Settings",
        "Power",
    ]
    .iter()
    .enumerate()
    .map(|(cue, label)| IconEntry {
        label: label.to_string(),
        cue,
        accent: Some(if cue == 0 { "red" } else { "gray" }.to_string()),
    })
    .collect()
}
