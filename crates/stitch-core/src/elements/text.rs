//! Text element data.

use serde::{Deserialize, Serialize};

/// Font size floor applied when a transform shrinks text.
pub const MIN_FONT_SIZE: f64 = 8.0;

pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default = "default_weight")]
    pub font_weight: u16,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Multiple of the font size; 1.2 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Extra advance per character in px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

fn default_weight() -> u16 {
    DEFAULT_FONT_WEIGHT
}

impl TextData {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: DEFAULT_FONT_WEIGHT,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            line_height: None,
            letter_spacing: None,
        }
    }

    pub fn line_height(&self) -> f64 {
        self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT)
    }

    pub fn letter_spacing(&self) -> f64 {
        self.letter_spacing.unwrap_or(0.0)
    }

    /// Weights of 600 and above render bold.
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}
