//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/hyprmover/config.json`.
//! Every section is optional; a missing or unreadable file means the daemon
//! runs with [`Config::default`] (no presets, `super+ctrl` as the main
//! modifiers).
//!
//! # Example
//!
//! ```json
//! {
//!   "main_modifiers": ["cmd", "ctrl"],
//!   "presets": [
//!     {"key": "f", "width": 2560, "height": 1578, "x": 0, "y": 22},
//!     {"key": "5", "width": 1280, "height": 1578, "x": 0, "y": 22},
//!     {"key": "t", "x": 5, "y": 27, "apply": "position"}
//!   ],
//!   "overlay": { "font_size": 16, "fade_out_ms": 150 },
//!   "open_at_login": true
//! }
//! ```

use crate::command::{Action, KeyChord, Modifier};
use crate::geometry::{Frame, Point};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Modifiers held together with the arrow key that enters a mode.
    #[serde(default = "default_main_modifiers")]
    pub main_modifiers: Vec<Modifier>,

    /// Preset geometries, bound in every mode in this order.
    #[serde(default)]
    pub presets: Vec<Preset>,

    /// Overlay appearance.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Install an XDG autostart entry for the daemon.
    #[serde(default)]
    pub open_at_login: bool,
}

fn default_main_modifiers() -> Vec<Modifier> {
    vec![Modifier::Super, Modifier::Ctrl]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_modifiers: default_main_modifiers(),
            presets: Vec::new(),
            overlay: OverlayConfig::default(),
            open_at_login: false,
        }
    }
}

/// How a preset is applied to the focused window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetApply {
    /// Set position and size.
    #[default]
    Frame,
    /// Only move the top-left corner to `(x, y)`; `width` and `height` are
    /// ignored.
    Position,
}

/// A literal target geometry bound to a key in every mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub apply: PresetApply,
}

impl Preset {
    pub fn chord(&self) -> KeyChord {
        KeyChord::new(self.key.clone(), self.modifiers.iter().copied())
    }

    pub fn action(&self) -> Action {
        match self.apply {
            PresetApply::Frame => {
                Action::ApplyPreset(Frame::new(self.x, self.y, self.width, self.height))
            }
            PresetApply::Position => Action::PlaceAt(Point {
                x: self.x,
                y: self.y,
            }),
        }
    }
}

/// Overlay appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Label font size in points.
    pub font_size: u32,
    /// Duration of the fade-out when a mode is dismissed (ms). `0` hides
    /// instantly.
    pub fade_out_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: 16,
            fade_out_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(contents)?;
        if config.main_modifiers.is_empty() {
            config.main_modifiers = default_main_modifiers();
        }
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// True when there simply is no config file.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
