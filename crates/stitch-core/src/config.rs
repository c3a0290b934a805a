//! Editor tuning supplied by the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

/// Errors from loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom range {min}..{max}")]
    InvalidZoomRange { min: f64, max: f64 },
}

/// Limits and step sizes for an [`crate::Editor`]. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo snapshots kept.
    pub history_limit: usize,
    /// Quiet period before continuous edits are snapshotted.
    pub history_debounce_ms: u64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplicative zoom per wheel tick.
    pub wheel_zoom_factor: f64,
    /// Additive zoom step for the zoom in/out commands.
    pub zoom_step: f64,
    /// Offset of duplicated elements, in document px.
    pub duplicate_offset: f64,
    pub nudge_small: f64,
    pub nudge_large: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: crate::history::MAX_HISTORY,
            history_debounce_ms: 300,
            min_zoom: crate::viewport::MIN_ZOOM,
            max_zoom: crate::viewport::MAX_ZOOM,
            wheel_zoom_factor: crate::viewport::WHEEL_ZOOM_FACTOR,
            zoom_step: crate::viewport::ZOOM_STEP,
            duplicate_offset: crate::store::DUPLICATE_OFFSET,
            nudge_small: 1.0,
            nudge_large: 10.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }

    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.history_debounce(), Duration::from_millis(300));
        assert_eq!(config.duplicate_offset, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"historyLimit": 10, "maxZoom": 8.0}"#).unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.max_zoom, 8.0);
        assert_eq!(config.min_zoom, 0.1);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"minZoom": 5.0, "maxZoom": 2.0}"#),
            Err(ConfigError::InvalidZoomRange { .. })
        ));
    }
}
