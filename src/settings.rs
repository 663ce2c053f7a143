//! Host settings
//!
//! Persisted as JSON next to the host's own project files. The host owns the
//! current frame; only the variant and playback placement live here.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FRAME_RATE, DEFAULT_MACHINE, DEFAULT_PIXELS_PER_CENTIMETER};
use crate::error::ConfigError;

/// Machine playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected machine variant
    pub machine: u32,
    /// Animation frames per second
    pub frame_rate: f32,
    /// Drawing scale (pixels per machine centimeter)
    pub pixels_per_centimeter: f32,
    /// Where machine origin lands in the host's drawing space (pixels)
    pub location: Vec2,
    /// Host timeline frame at which the machine starts running
    pub start_frame: u32,
    /// Directory holding `images/`; `None` resolves images virtually
    pub resources_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            machine: DEFAULT_MACHINE,
            frame_rate: DEFAULT_FRAME_RATE,
            pixels_per_centimeter: DEFAULT_PIXELS_PER_CENTIMETER,
            location: Vec2::ZERO,
            start_frame: 0,
            resources_dir: None,
        }
    }
}

impl Settings {
    /// Check values that would make playback meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if !(self.pixels_per_centimeter.is_finite() && self.pixels_per_centimeter > 0.0) {
            return Err(ConfigError::InvalidScale(self.pixels_per_centimeter));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.machine, 1);
        assert_eq!(settings.frame_rate, 30.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "machine": 2 }"#).unwrap();
        assert_eq!(settings.machine, 2);
        assert_eq!(settings.pixels_per_centimeter, 1.5);
        assert_eq!(settings.start_frame, 0);
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        let settings = Settings {
            frame_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "contraption-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            machine: 2,
            location: Vec2::new(900.0, 500.0),
            start_frame: 45,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/contraption.json")).unwrap_err();
        assert!(matches!(err, ConfigError::SettingsIo { .. }));
    }
}
