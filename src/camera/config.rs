//! Camera configuration.
//!
//! Only the keys every driver understands are first-class fields.
//! Anything else lands in [`CameraConfig::extra`] and is passed to the
//! driver untouched. Nothing here is validated; drivers reject what
//! they cannot honour in `init_camera`.

use crate::markers::{MarkerConfig, MarkerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration handed to a driver's `init_camera`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device serial number; empty selects the first device found.
    pub serial_number: String,
    /// Human-readable model label, e.g. `Realsense D415`.
    pub camera_type: String,
    /// Directory that `save_data` writes into; empty means the working directory.
    pub camera_data_save_directory: PathBuf,
    /// Stream width in pixels.
    pub width: u32,
    /// Stream height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Color stream format code (`bgr8`, `rgb8`).
    pub color_format: String,
    /// Depth stream format code (`z16`).
    pub depth_format: String,
    /// Infrared stream format code (`y8`).
    pub ir_format: String,
    /// Driver-specific keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            serial_number: String::new(),
            camera_type: "Realsense D415".to_string(),
            camera_data_save_directory: PathBuf::new(),
            width: 1280,
            height: 720,
            fps: 30,
            color_format: "bgr8".to_string(),
            depth_format: "z16".to_string(),
            ir_format: "y8".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl CameraConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets the directory used by `save_data`.
    pub fn with_save_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.camera_data_save_directory = dir.into();
        self
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML or has mistyped keys.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    /// The `[markers]` table failed validation.
    #[error("invalid marker configuration: {0}")]
    Markers(#[from] MarkerError),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[camera]` table.
    #[serde(default)]
    pub camera: CameraConfig,
    /// `[markers.<name>]` tables.
    #[serde(default)]
    pub markers: MarkerConfig,
    /// `[stream]` table.
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Options for the polling loop of the `stream` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Frames to poll before exiting (0 runs until interrupted).
    pub frame_limit: u64,
    /// Write a preview mosaic every N frames (0 to disable).
    pub preview_every: u64,
    /// Width of one preview tile; the height keeps a 16:9 ratio.
    pub preview_tile_width: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frame_limit: 0,
            preview_every: 0,
            preview_tile_width: 640,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text. Marker definitions are validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.markers.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_d415_profile() {
        let config = CameraConfig::default();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.fps, 30);
        assert_eq!(config.color_format, "bgr8");
        assert_eq!(config.depth_format, "z16");
        assert_eq!(config.ir_format, "y8");
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let config = FileConfig::from_toml_str(
            r#"
            [camera]
            serial_number = "f1234567"
            width = 640
            height = 480
            laser_power = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.serial_number, "f1234567");
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.fps, 30);
        assert_eq!(
            config.camera.extra.get("laser_power"),
            Some(&toml::Value::Integer(150))
        );
    }

    #[test]
    fn test_camera_config_not_validated_on_load() {
        let config = FileConfig::from_toml_str("[camera]\nwidth = 0\ncolor_format = \"yuyv\"\n");
        assert!(config.is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert_eq!(config.camera, CameraConfig::default());
        assert!(config.markers.is_empty());
        assert_eq!(config.stream.frame_limit, 0);
    }

    #[test]
    fn test_invalid_toml_reported() {
        assert!(matches!(
            FileConfig::from_toml_str("[camera"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
