//! Image element data.

use serde::{Deserialize, Serialize};

/// Non-destructive adjustments applied by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
}

/// Visible window into the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub src: String,
    /// Source before any processing; kept so edits can be reverted.
    #[serde(default)]
    pub original_src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<ImageFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_data: Option<CropData>,
}

impl ImageData {
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        Self {
            original_src: src.clone(),
            src,
            filters: None,
            crop_data: None,
        }
    }
}
