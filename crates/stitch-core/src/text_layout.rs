//! Text measurement used to keep text boxes tall enough for their content.
//!
//! Glyph metrics belong to the renderer, so measurement goes through the
//! [`TextMeasure`] trait. [`EstimatedMeasure`] is a font-agnostic fallback
//! used when no renderer metrics are available.

use crate::elements::{Element, ElementKind, FontStyle, TextData};

/// Height changes at or below this many px are not written back.
pub const HEIGHT_TOLERANCE: f64 = 1.0;

/// Font description passed to a measurer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec<'a> {
    pub family: &'a str,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl<'a> From<&'a TextData> for FontSpec<'a> {
    fn from(text: &'a TextData) -> Self {
        Self {
            family: &text.font_family,
            size: text.font_size,
            bold: text.is_bold(),
            italic: text.font_style == FontStyle::Italic,
        }
    }
}

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    fn line_width(&self, text: &str, font: &FontSpec<'_>) -> f64;
}

/// Assumes every character is 0.6 em wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

impl TextMeasure for EstimatedMeasure {
    fn line_width(&self, text: &str, font: &FontSpec<'_>) -> f64 {
        text.chars().count() as f64 * font.size * 0.6
    }
}

/// Height of `text` wrapped at `max_width` (no wrapping when `None` or 0).
///
/// Paragraphs split on `\n`; words wrap greedily on single spaces and a
/// word wider than the box stays on its own line.
pub fn measure_text_height(
    text: &TextData,
    max_width: Option<f64>,
    measure: &dyn TextMeasure,
) -> f64 {
    let font = FontSpec::from(text);
    let spacing = text.letter_spacing();
    let max_width = max_width.filter(|w| *w > 0.0);

    let mut total_lines = 0usize;
    for paragraph in text.content.split('\n') {
        let Some(max_width) = max_width else {
            total_lines += 1;
            continue;
        };
        if paragraph.is_empty() {
            total_lines += 1;
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let width =
                measure.line_width(&candidate, &font) + spacing * candidate.chars().count() as f64;
            if width > max_width && !current.is_empty() {
                total_lines += 1;
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            total_lines += 1;
        }
    }

    total_lines.max(1) as f64 * text.font_size * text.line_height()
}

/// Width of the widest line, without wrapping.
pub fn measure_text_width(text: &TextData, measure: &dyn TextMeasure) -> f64 {
    let font = FontSpec::from(text);
    let spacing = text.letter_spacing();
    text.content
        .split('\n')
        .map(|line| measure.line_width(line, &font) + spacing * line.chars().count() as f64)
        .fold(0.0, f64::max)
}

/// The height a text element should grow or shrink to, if it differs from
/// the current height by more than [`HEIGHT_TOLERANCE`].
pub fn fitted_height(element: &Element, measure: &dyn TextMeasure) -> Option<f64> {
    let ElementKind::Text(text) = &element.kind else {
        return None;
    };
    let height = measure_text_height(text, Some(element.width), measure);
    ((height - element.height).abs() > HEIGHT_TOLERANCE).then_some(height)
}
