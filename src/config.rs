// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{
    APP_ID, CONFIG_FILE_NAME, DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_SAVE_FOLDER,
    DEFAULT_SOUND_PLAYER, SHUTTER_SOUND, VIEWFINDER_WINDOW_ID,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration, stored as JSON in the config directory
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device node of the front camera (auto-detected when unset)
    pub front_device: Option<String>,
    /// Device node of the rear camera (auto-detected when unset)
    pub rear_device: Option<String>,
    /// Requested viewfinder/capture width
    pub capture_width: u32,
    /// Requested viewfinder/capture height
    pub capture_height: u32,
    /// Camera roll directory (defaults to ~/Pictures/Camera)
    pub photo_dir: Option<PathBuf>,
    /// Sound-theme name played when the shutter fires
    pub shutter_sound: String,
    /// Program used to play system sounds
    pub sound_player: String,
    /// Window group the viewfinder joins
    pub window_group: String,
    /// Window id the camera service gives the viewfinder
    pub viewfinder_id: String,
}

/// Values given on the command line, applied over the loaded config
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub front_device: Option<String>,
    pub rear_device: Option<String>,
    pub shutter_sound: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            front_device: None,
            rear_device: None,
            capture_width: DEFAULT_CAPTURE_WIDTH,
            capture_height: DEFAULT_CAPTURE_HEIGHT,
            photo_dir: None,
            shutter_sound: SHUTTER_SOUND.to_string(),
            sound_player: DEFAULT_SOUND_PLAYER.to_string(),
            window_group: APP_ID.to_string(),
            viewfinder_id: VIEWFINDER_WINDOW_ID.to_string(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join(CONFIG_FILE_NAME))
    }

    /// Apply command-line values; unset ones keep the loaded value
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(device) = overrides.front_device {
            self.front_device = Some(device);
        }
        if let Some(device) = overrides.rear_device {
            self.rear_device = Some(device);
        }
        if let Some(sound) = overrides.shutter_sound {
            self.shutter_sound = sound;
        }
        self
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`; a missing or malformed file yields defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load from `path`, reporting read and parse failures
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Camera roll directory
    pub fn photo_directory(&self) -> PathBuf {
        self.photo_dir.clone().unwrap_or_else(default_photo_dir)
    }
}

/// Default camera roll (~/Pictures/Camera)
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(DEFAULT_SAVE_FOLDER)
}
