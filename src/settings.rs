//! Game settings and preferences
//!
//! Persisted as JSON next to the player's other data, separate from level files.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Movement speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Normal => "Normal",
            SpeedPreset::Fast => "Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" | "norm" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            _ => None,
        }
    }

    /// Multiplier applied to a level's tiles per second
    pub fn multiplier(&self) -> f32 {
        match self {
            SpeedPreset::Slow => 0.75,
            SpeedPreset::Normal => 1.0,
            SpeedPreset::Fast => 1.5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snake speed preset
    pub speed: SpeedPreset,

    // === Audio ===
    /// Emit sound effect ids from the simulation
    pub sound_effects: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Display ===
    /// Draw tile grid lines
    pub show_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Normal,

            // Audio
            sound_effects: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            // Display
            show_grid: false,
        }
    }
}

impl Settings {
    /// Create settings from a speed preset
    pub fn from_preset(preset: SpeedPreset) -> Self {
        Self {
            speed: preset,
            ..Self::default()
        }
    }

    /// Effective movement speed for a level
    pub fn effective_tiles_per_second(&self, level_tiles_per_second: f32) -> f32 {
        level_tiles_per_second * self.speed.multiplier()
    }

    /// Effective sound effect volume (0 when effects are off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if !self.sound_effects {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Clamp volumes into 0..=1
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.sanitize();
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
