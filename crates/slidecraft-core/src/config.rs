//! Editor configuration.

use crate::camera::Camera;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for the editor core. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Elements can never be resized to this size or below.
    pub min_element_size: f64,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Handle hit radius in screen pixels.
    pub handle_tolerance: f64,
    /// Maximum number of undo states to keep.
    pub undo_depth: usize,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: f64,
    pub ai_min_slides: usize,
    pub ai_max_slides: usize,
    pub ai_default_slides: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_element_size: 10.0,
            default_zoom: 1.0,
            min_zoom: 0.25,
            max_zoom: 3.0,
            zoom_step: 0.1,
            handle_tolerance: 8.0,
            undo_depth: 50,
            duplicate_offset: 20.0,
            ai_min_slides: 3,
            ai_max_slides: 30,
            ai_default_slides: 10,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Check that the ranges make sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_element_size > 0.0) {
            return Err(ConfigError::Invalid("min_element_size must be positive".into()));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid("zoom bounds are inverted or non-positive".into()));
        }
        if self.ai_min_slides == 0 || self.ai_min_slides > self.ai_max_slides {
            return Err(ConfigError::Invalid("AI slide bounds are inverted or zero".into()));
        }
        Ok(())
    }

    /// Camera configured with these zoom settings.
    pub fn camera(&self) -> Camera {
        Camera::with_bounds(self.default_zoom, self.min_zoom, self.max_zoom, self.zoom_step)
    }

    /// Clamp a requested AI slide count into the configured bounds (0 = default).
    pub fn clamp_slide_count(&self, requested: usize) -> usize {
        if requested == 0 {
            return self.ai_default_slides;
        }
        requested.clamp(self.ai_min_slides, self.ai_max_slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"max_zoom": 4.0}"#).unwrap();
        assert_eq!(config.max_zoom, 4.0);
        assert_eq!(config.min_element_size, 10.0);
        assert_eq!(config.ai_max_slides, 30);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = EditorConfig::from_json(r#"{"min_zoom": 5.0, "max_zoom": 1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EditorConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_clamp_slide_count() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_slide_count(0), 10);
        assert_eq!(config.clamp_slide_count(1), 3);
        assert_eq!(config.clamp_slide_count(12), 12);
        assert_eq!(config.clamp_slide_count(100), 30);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        assert_eq!(EditorConfig::load_or_default(&path).unwrap(), EditorConfig::default());
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Io { .. })));

        std::fs::write(&path, r#"{"undo_depth": 5}"#).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap().undo_depth, 5);
    }

    #[test]
    fn test_camera_from_config() {
        let config = EditorConfig {
            default_zoom: 10.0,
            ..EditorConfig::default()
        };
        assert_eq!(config.camera().zoom, config.max_zoom);
    }
}
