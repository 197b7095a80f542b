//! Game settings and physics tuning
//!
//! Stored as JSON next to the assets. Every field has a default, so a
//! settings file only needs to list what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Millis;
use crate::consts::*;
use crate::sim::TimingWindows;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Physics and input-timing knobs for the skater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkaterTuning {
    /// Downward acceleration while airborne (px/ms²)
    pub gravity: f32,
    /// Horizontal velocity change per grounded push (px/ms)
    pub push_delta: f32,
    /// Upward velocity of an ollie (px/ms)
    pub ollie_impulse: f32,
    /// Horizontal speed limit applied when respawning after leaving the level
    pub respawn_max_speed: f32,
    /// Windows for picking a flip direction
    pub flip_windows: TimingWindows,
    /// How long a grind request waits for a ledge
    pub grind_look_ahead_ms: Millis,
    /// How far below the skater to look for ledges (px)
    pub ledge_probe_depth: f32,
}

impl Default for SkaterTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            push_delta: PUSH_DELTA,
            ollie_impulse: OLLIE_IMPULSE,
            respawn_max_speed: RESPAWN_MAX_SPEED,
            flip_windows: TimingWindows {
                look_ahead_ms: FLIP_LOOK_AHEAD_MS,
                look_back_ms: FLIP_LOOK_BACK_MS,
            },
            grind_look_ahead_ms: GRIND_LOOK_AHEAD_MS,
            ledge_probe_depth: LEDGE_PROBE_DEPTH,
        }
    }
}

impl SkaterTuning {
    /// Windows used for grind direction selection
    pub fn grind_windows(&self) -> TimingWindows {
        TimingWindows {
            look_ahead_ms: self.grind_look_ahead_ms,
            look_back_ms: self.flip_windows.look_back_ms,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Skater physics
    pub tuning: SkaterTuning,
    /// Character animation catalog (built-in demo catalog if unset)
    pub catalog: Option<PathBuf>,
    /// Level manifest (built-in demo level if unset)
    pub level: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from `path`, falling back to defaults if the file is missing
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::warn!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = Settings::from_json(r#"{ "tuning": { "gravity": 0.005 } }"#).unwrap();
        assert_eq!(settings.tuning.gravity, 0.005);
        assert_eq!(settings.tuning.push_delta, PUSH_DELTA);
        assert_eq!(settings.tuning.flip_windows.look_ahead_ms, FLIP_LOOK_AHEAD_MS);
        assert!(settings.catalog.is_none());
    }

    #[test]
    fn test_malformed_settings_error() {
        assert!(matches!(
            Settings::from_json("{ \"tuning\": 3 }"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/gnar-skata/settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path =
            std::env::temp_dir().join(format!("gnar-skata-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.tuning.ollie_impulse = 1.5;
        settings.level = Some(PathBuf::from("assets/levels.json"));
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
