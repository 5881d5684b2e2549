//! Configuration for hcs-home
//!
//! One TOML file, located by `hcs_common::config::ConfigFileResolver`. Every
//! section is optional; missing sections and a missing file both yield the
//! built-in defaults (five titles, seven dock icons, stock cue files).
//!
//! ```toml
//! [timing]
//! priming_delay_ms = 200
//! launch_banner_ms = 2000
//!
//! [sounds]
//! dir = "/usr/share/hcs/sounds"
//! hover = { file = "klick.mp3", volume = 0.5 }
//!
//! [[games]]
//! name = "Tetris"
//! launch = "embedded"
//! ```

use crate::ambient::AmbientSettings;
use crate::catalog::{default_games, default_icons, Catalog, GameCatalogEntry, IconEntry};
use crate::error::{Error, Result};
use crate::media::{CueCatalog, CueSpec};
use crate::viewport::TileGeometry;
use hcs_common::config::{default_data_dir, load_or_default, ConfigFileResolver, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Timer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Silent priming pass length per cue
    pub priming_delay_ms: u64,
    /// How long the "Launching ..." banner stays up
    pub launch_banner_ms: u64,
    pub clock_tick_ms: u64,
    pub battery_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            priming_delay_ms: 200,
            launch_banner_ms: 2000,
            clock_tick_ms: 1000,
            battery_tick_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub battery_start: u8,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { battery_start: 77 }
    }
}

/// Game tile geometry in layout units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub tile_width: f64,
    pub tile_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tile_width: 336.0,
            tile_gap: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output device name; `None` uses the system default
    pub device: Option<String>,
    pub enabled: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            enabled: true,
        }
    }
}

/// Cue files and levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundsConfig {
    /// Base directory for relative cue paths (default `<data dir>/sounds`)
    pub dir: Option<PathBuf>,
    pub hover: CueSpec,
    pub launch: CueSpec,
    /// Dock icon cues; icons refer to these by index
    pub icons: Vec<CueSpec>,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            hover: CueSpec::new("klick.mp3", 0.5),
            launch: CueSpec::new("run_title.mp3", 0.6),
            icons: [
                "home.mp3",
                "news.mp3",
                "eshop.mp3",
                "album.mp3",
                "controller.mp3",
                "settings.mp3",
                "standby.mp3",
            ]
            .into_iter()
            .map(|file| CueSpec::new(file, 0.5))
            .collect(),
        }
    }
}

impl SoundsConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| default_data_dir().join("sounds"))
    }

    /// Cue catalogue with every relative path joined onto the sounds directory
    pub fn cue_catalog(&self) -> CueCatalog {
        let dir = self.resolved_dir();
        let resolve = |spec: &CueSpec| CueSpec {
            file: resolve_path(&dir, &spec.file),
            volume: spec.volume,
        };
        CueCatalog {
            hover: resolve(&self.hover),
            launch: resolve(&self.launch),
            icons: self.icons.iter().map(resolve).collect(),
        }
    }
}

fn resolve_path(base: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

/// Complete home screen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default = "default_games")]
    pub games: Vec<GameCatalogEntry>,
    #[serde(default = "default_icons")]
    pub icons: Vec<IconEntry>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            timing: TimingConfig::default(),
            status: StatusConfig::default(),
            layout: LayoutConfig::default(),
            audio: AudioConfig::default(),
            sounds: SoundsConfig::default(),
            games: default_games(),
            icons: default_icons(),
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub sounds_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub no_audio: bool,
}

impl HomeConfig {
    /// Locate, parse and validate the configuration.
    ///
    /// Returns the config and the file it came from, if any.
    pub fn load(cli_path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let resolver = ConfigFileResolver::new("hcs-home");
        let (config, source): (HomeConfig, _) = load_or_default(&resolver, cli_path)?;
        config.validate()?;
        if let Some(path) = &source {
            info!("Loaded configuration from {}", path.display());
        }
        Ok((config, source))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HomeConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.sounds_dir {
            self.sounds.dir = Some(dir.clone());
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.no_audio {
            self.audio.enabled = false;
        }
    }

    /// Reject configurations the home screen cannot run with
    pub fn validate(&self) -> Result<()> {
        self.catalog()?;

        let cues = std::iter::once(("hover", &self.sounds.hover))
            .chain(std::iter::once(("launch", &self.sounds.launch)))
            .chain(self.sounds.icons.iter().map(|spec| ("icon", spec)));
        for (name, spec) in cues {
            if !(0.0..=1.0).contains(&spec.volume) {
                return Err(Error::Config(format!(
                    "{} cue volume {} for {} is outside [0, 1]",
                    name,
                    spec.volume,
                    spec.file.display()
                )));
            }
        }

        if self.layout.tile_width <= 0.0 || self.layout.tile_gap < 0.0 {
            return Err(Error::Config(format!(
                "invalid tile geometry: width {} gap {}",
                self.layout.tile_width, self.layout.tile_gap
            )));
        }
        if self.timing.clock_tick_ms == 0 || self.timing.battery_tick_ms == 0 {
            return Err(Error::Config("ticker periods must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::new(self.games.clone(), self.icons.clone(), self.sounds.icons.len())
    }

    pub fn priming_delay(&self) -> Duration {
        Duration::from_millis(self.timing.priming_delay_ms)
    }

    pub fn launch_banner(&self) -> Duration {
        Duration::from_millis(self.timing.launch_banner_ms)
    }

    pub fn tile_geometry(&self) -> TileGeometry {
        TileGeometry {
            tile_width: self.layout.tile_width,
            tile_gap: self.layout.tile_gap,
        }
    }

    pub fn ambient_settings(&self) -> AmbientSettings {
        AmbientSettings {
            clock_tick: Duration::from_millis(self.timing.clock_tick_ms),
            battery_tick: Duration::from_millis(self.timing.battery_tick_ms),
            battery_start: self.status.battery_start,
        }
    }

    /// Log file path, defaulting into the data directory
    pub fn log_file(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| default_data_dir().join("hcs-home.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LaunchMode;

    #[test]
    fn test_defaults_are_valid() {
        let config = HomeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.priming_delay_ms, 200);
        assert_eq!(config.timing.launch_banner_ms, 2000);
        assert_eq!(config.status.battery_start, 77);
        assert_eq!(config.sounds.icons.len(), 7);
        assert_eq!(config.sounds.launch.volume, 0.6);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = HomeConfig::from_toml_str("").unwrap();
        assert_eq!(config, HomeConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = HomeConfig::from_toml_str(
            r#"
            [timing]
            priming_delay_ms = 50

            [layout]
            tile_gap = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.priming_delay_ms, 50);
        assert_eq!(config.timing.launch_banner_ms, 2000);
        assert_eq!(config.layout.tile_gap, 8.0);
        assert_eq!(config.layout.tile_width, 336.0);
    }

    #[test]
    fn test_catalogue_from_toml() {
        let config = HomeConfig::from_toml_str(
            r#"
            [[games]]
            name = "Alpha"

            [[games]]
            name = "Blocks"
            launch = "embedded"

            [[icons]]
            label = "Home"
            cue = 0
            "#,
        )
        .unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.game_count(), 2);
        assert_eq!(catalog.game(1).unwrap().launch, LaunchMode::Embedded);
        assert_eq!(catalog.icon_count(), 1);
    }

    #[test]
    fn test_empty_games_rejected() {
        let mut config = HomeConfig::default();
        config.games.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unbound_icon_cue_rejected() {
        let mut config = HomeConfig::default();
        config.sounds.icons.truncate(3);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let result = HomeConfig::from_toml_str(
            r#"
            [sounds]
            hover = { file = "klick.mp3", volume = 1.5 }
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            HomeConfig::from_toml_str("[timing\npriming"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_cue_paths_resolve_against_sounds_dir() {
        let mut config = HomeConfig::default();
        config.sounds.dir = Some(PathBuf::from("/opt/sounds"));
        config.sounds.launch = CueSpec::new("/abs/launch.wav", 0.6);

        let cues = config.sounds.cue_catalog();
        assert_eq!(cues.hover.file, PathBuf::from("/opt/sounds/klick.mp3"));
        assert_eq!(cues.launch.file, PathBuf::from("/abs/launch.wav"));
        assert_eq!(cues.icons[6].file, PathBuf::from("/opt/sounds/standby.mp3"));
    }

    #[test]
    fn test_overrides() {
        let mut config = HomeConfig::default();
        config.apply_overrides(&ConfigOverrides {
            sounds_dir: Some(PathBuf::from("/tmp/cues")),
            log_level: Some("debug".to_string()),
            no_audio: true,
        });
        assert_eq!(config.sounds.dir, Some(PathBuf::from("/tmp/cues")));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.audio.enabled);
    }

    #[test]
    fn test_durations() {
        let config = HomeConfig::default();
        assert_eq!(config.priming_delay(), Duration::from_millis(200));
        assert_eq!(config.launch_banner(), Duration::from_secs(2));
        assert_eq!(config.ambient_settings().battery_tick, Duration::from_secs(5));
    }
}
