//! Document and slide model.
//!
//! A [`Document`] owns an ordered list of [`Slide`]s, each holding the
//! elements placed on it. These types are plain data; the invariants that
//! span operations (dense slide order, at least one slide, z-order
//! assignment) are maintained by [`crate::store::DocumentStore`].

use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Errors from reading or writing documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Unique identifier for slides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    pub fn new() -> Self {
        Self(format!("sl_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SlideId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page size and default background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            background_color: "#ffffff".to_string(),
        }
    }
}

impl DocumentSettings {
    pub fn page_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Partial update of [`DocumentSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background_color: Option<String>,
}

/// One page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: SlideId,
    /// Dense 0-based position within the document.
    pub order: usize,
    pub name: String,
    /// Elements in insertion order. Paint order comes from `z_index`.
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Cached preview image, derived from the elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Slide {
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            id: SlideId::new(),
            order,
            name: name.into(),
            elements: Vec::new(),
            background_color: None,
            thumbnail: None,
        }
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Elements in paint order (bottom first). Ties keep insertion order.
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted
    }

    /// Highest z-index, or -1 for an empty slide.
    pub fn max_z_index(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).fold(-1, i64::max)
    }

    /// Lowest z-index, or 0 for an empty slide.
    pub fn min_z_index(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).min().unwrap_or(0)
    }

    /// Ids of selectable elements whose bounding box strictly overlaps `rect`.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.sorted_elements()
            .into_iter()
            .filter(|e| e.is_marquee_selectable() && e.overlaps(rect))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Topmost element under a document-space point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<&Element> {
        self.sorted_elements()
            .into_iter()
            .rev()
            .find(|e| e.opacity > 0.0 && e.hit_test(point, tolerance))
    }
}

/// The full editable project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    /// Owner reference; opaque to the editor.
    #[serde(default)]
    pub user_id: String,
    pub slides: Vec<Slide>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    #[serde(default)]
    pub settings: DocumentSettings,
}

impl Document {
    /// A blank document with a single "Slide 1".
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: format!("doc_{}", Uuid::new_v4().simple()),
            name: name.into(),
            user_id: String::new(),
            slides: vec![Slide::new("Slide 1", 0)],
            created_at: now,
            updated_at: now,
            settings: DocumentSettings::default(),
        }
    }

    pub fn slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| &s.id == id)
    }

    pub fn slide_mut(&mut self, id: &SlideId) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| &s.id == id)
    }

    pub fn slide_index(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }

    /// Rewrite every slide's `order` to its index.
    pub fn renormalize_slide_order(&mut self) {
        for (index, slide) in self.slides.iter_mut().enumerate() {
            slide.order = index;
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
