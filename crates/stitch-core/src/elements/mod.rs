//! Elements placed on a slide.
//!
//! An [`Element`] holds the geometry and paint every element shares plus an
//! [`ElementKind`] with the variant-specific data. The JSON shape matches the
//! persisted document format: a flat object with a `type` discriminant.

mod image;
mod line;
pub mod paint;
mod text;
mod vector;

pub use image::{CropData, ImageData, ImageFilters};
pub use line::LineData;
pub use paint::{
    BlurEffect, CoverPlacement, Effect, FillLayer, ImageFill, LineCap, LineJoin, Paint, ScaleMode,
    Shadow, ShadowEffect, SolidFill, StrokeLayer, cover_placement,
};
pub use text::{FontStyle, TextAlign, TextData};
pub use vector::{VectorData, VectorType};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(format!("el_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of an element, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Image,
    Text,
    Vector,
    Line,
}

/// Variant-specific element data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Image(ImageData),
    Text(TextData),
    #[serde(alias = "shape")]
    Vector(VectorData),
    Line(LineData),
}

fn default_opacity() -> f64 {
    1.0
}

/// A positioned, paintable object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Top-left corner, or the anchor point for lines.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around `(x, y)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    /// Paint order among siblings. Only relative order matters.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub paint: Paint,
}

impl Element {
    /// Create an element of `kind` covering `rect`.
    pub fn new(kind: ElementKind, rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            id: ElementId::new(),
            kind,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            z_index: 0,
            name: None,
            paint: Paint::default(),
        }
    }

    /// Create a vector shape spanning `rect`.
    pub fn vector(vector_type: VectorType, rect: Rect) -> Self {
        Self::new(ElementKind::Vector(VectorData::new(vector_type)), rect)
    }

    /// Create a text element with its top-left corner at `origin`.
    pub fn text(content: impl Into<String>, origin: Point, size: Size) -> Self {
        Self::new(
            ElementKind::Text(TextData::new(content)),
            Rect::from_origin_size(origin, size),
        )
    }

    /// Create a straight line from `start` to `end`, anchored at `start`.
    pub fn line(start: Point, end: Point) -> Self {
        let mut element = Self::new(ElementKind::Line(LineData::new()), Rect::ZERO);
        element.x = start.x;
        element.y = start.y;
        element.set_line_end(end);
        element
    }

    /// Create an image element showing `src` in `rect`.
    pub fn image(src: impl Into<String>, rect: Rect) -> Self {
        Self::new(ElementKind::Image(ImageData::new(src)), rect)
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Vector(_) => ElementType::Vector,
            ElementKind::Line(_) => ElementType::Line,
        }
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineData> {
        match &self.kind {
            ElementKind::Line(line) => Some(line),
            _ => None,
        }
    }

    /// Assign a fresh id.
    pub fn regenerate_id(&mut self) {
        self.id = ElementId::new();
    }

    /// Move the end point of a line, keeping the anchor. No-op for other kinds.
    pub fn set_line_end(&mut self, end: Point) {
        let anchor = Point::new(self.x, self.y);
        if let ElementKind::Line(line) = &mut self.kind {
            line.set_segment(end - anchor);
            self.width = (end.x - anchor.x).abs();
            self.height = (end.y - anchor.y).abs();
        }
    }

    /// Unrotated bounds in document space.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Line(line) => line.local_bounds() + Vec2::new(self.x, self.y),
            _ => Rect::new(self.x, self.y, self.x + self.width, self.y + self.height),
        }
    }

    /// Local-to-document transform: rotation happens around `(x, y)`.
    pub fn transform(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Axis-aligned bounding box in document space, including rotation.
    pub fn aabb(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.bounds();
        }
        let local = self.bounds() - Vec2::new(self.x, self.y);
        self.transform().transform_rect_bbox(local)
    }

    /// Strict overlap of this element's AABB with `rect`. Touching edges do
    /// not count.
    pub fn overlaps(&self, rect: Rect) -> bool {
        let aabb = self.aabb();
        let rect = rect.abs();
        aabb.x0 < rect.x1 && aabb.x1 > rect.x0 && aabb.y0 < rect.y1 && aabb.y1 > rect.y0
    }

    /// Whether a marquee may pick this element up.
    pub fn is_marquee_selectable(&self) -> bool {
        !self.locked && self.opacity > 0.0
    }

    /// Point hit test in document space.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.transform().inverse() * point;
        match &self.kind {
            ElementKind::Line(line) => {
                let width = self
                    .paint
                    .top_stroke()
                    .map(|stroke| stroke.width)
                    .unwrap_or(0.0);
                line.distance_to(local) <= tolerance + width / 2.0
            }
            _ => Rect::new(0.0, 0.0, self.width, self.height)
                .inflate(tolerance, tolerance)
                .contains(local),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Smallest width/height a transform may produce.
    pub fn min_size(&self) -> f64 {
        match self.kind {
            ElementKind::Vector(_) => 5.0,
            ElementKind::Image(_) => 10.0,
            ElementKind::Text(_) => 20.0,
            ElementKind::Line(_) => 0.0,
        }
    }

    /// Bake an accumulated handle transform into the element's geometry.
    pub fn apply_transform(&mut self, commit: &TransformCommit) {
        self.x = commit.position.x;
        self.y = commit.position.y;
        self.rotation = commit.rotation;
        let min = self.min_size();
        match &mut self.kind {
            ElementKind::Line(line) => {
                line.scale(commit.scale_x, commit.scale_y);
                let bounds = line.local_bounds();
                self.width = bounds.width();
                self.height = bounds.height();
            }
            ElementKind::Text(data) => {
                self.width = (self.width * commit.scale_x).max(min);
                self.height = (self.height * commit.scale_y).max(min);
                data.font_size = (data.font_size * commit.scale_y).max(text::MIN_FONT_SIZE);
            }
            _ => {
                self.width = (self.width * commit.scale_x).max(min);
                self.height = (self.height * commit.scale_y).max(min);
            }
        }
    }

    /// Legacy paint is resolved into explicit layers. See [`Paint::normalize_legacy`].
    pub fn normalize_legacy_paint(&mut self) -> bool {
        self.paint.normalize_legacy()
    }
}

/// Result of a resize/rotate gesture reported by the handle UI.
///
/// Scale factors are relative to the element's size when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformCommit {
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl TransformCommit {
    pub fn new(position: Point, scale_x: f64, scale_y: f64, rotation: f64) -> Self {
        Self {
            position,
            scale_x,
            scale_y,
            rotation,
        }
    }
}

/// Partial update merged into an element.
///
/// Fields left `None` are untouched. Variant-specific fields are ignored
/// for elements of another kind. Legacy paint scalars cannot be written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub name: Option<String>,
    pub fills: Option<Vec<FillLayer>>,
    pub strokes: Option<Vec<StrokeLayer>>,
    pub effects: Option<Vec<Effect>>,
    // Text
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    // Vector
    pub vector_type: Option<VectorType>,
    pub corner_radius: Option<f64>,
    pub sides: Option<u32>,
    // Line
    pub points: Option<Vec<f64>>,
    pub dash: Option<Vec<f64>>,
    pub arrow_start: Option<bool>,
    pub arrow_end: Option<bool>,
    // Image
    pub src: Option<String>,
    pub filters: Option<ImageFilters>,
    pub crop_data: Option<CropData>,
}

impl ElementUpdate {
    pub fn position(mut self, point: Point) -> Self {
        self.x = Some(point.x);
        self.y = Some(point.y);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.width = Some(size.width);
        self.height = Some(size.height);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn fills(mut self, fills: Vec<FillLayer>) -> Self {
        self.fills = Some(fills);
        self
    }

    pub fn strokes(mut self, strokes: Vec<StrokeLayer>) -> Self {
        self.strokes = Some(strokes);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Position/size/rotation/text values from a transform commit.
    pub fn from_element_geometry(element: &Element) -> Self {
        let mut update = Self::default()
            .position(Point::new(element.x, element.y))
            .size(Size::new(element.width, element.height));
        update.rotation = Some(element.rotation);
        match &element.kind {
            ElementKind::Text(text) => update.font_size = Some(text.font_size),
            ElementKind::Line(line) => update.points = Some(line.points.clone()),
            _ => {}
        }
        update
    }

    /// Whether this update can change the laid-out height of a text element.
    pub fn affects_text_layout(&self) -> bool {
        self.content.is_some()
            || self.width.is_some()
            || self.font_family.is_some()
            || self.font_size.is_some()
            || self.font_weight.is_some()
            || self.font_style.is_some()
            || self.line_height.is_some()
            || self.letter_spacing.is_some()
    }

    /// Shallow-merge into `element`.
    pub fn apply_to(&self, element: &mut Element) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        set(&mut element.x, &self.x);
        set(&mut element.y, &self.y);
        set(&mut element.width, &self.width);
        set(&mut element.height, &self.height);
        set(&mut element.rotation, &self.rotation);
        set(&mut element.opacity, &self.opacity);
        set(&mut element.locked, &self.locked);
        if let Some(name) = &self.name {
            element.name = Some(name.clone());
        }
        if let Some(fills) = &self.fills {
            element.paint.fills = Some(fills.clone());
        }
        if let Some(strokes) = &self.strokes {
            element.paint.strokes = Some(strokes.clone());
        }
        if let Some(effects) = &self.effects {
            element.paint.effects = Some(effects.clone());
        }

        match &mut element.kind {
            ElementKind::Text(text) => {
                set(&mut text.content, &self.content);
                set(&mut text.font_family, &self.font_family);
                set(&mut text.font_size, &self.font_size);
                set(&mut text.font_weight, &self.font_weight);
                set(&mut text.font_style, &self.font_style);
                set(&mut text.text_align, &self.text_align);
                if self.line_height.is_some() {
                    text.line_height = self.line_height;
                }
                if self.letter_spacing.is_some() {
                    text.letter_spacing = self.letter_spacing;
                }
            }
            ElementKind::Vector(vector) => {
                set(&mut vector.vector_type, &self.vector_type);
                if self.corner_radius.is_some() {
                    vector.corner_radius = self.corner_radius;
                }
                if self.sides.is_some() {
                    vector.sides = self.sides;
                }
            }
            ElementKind::Line(line) => {
                set(&mut line.points, &self.points);
                if self.dash.is_some() {
                    line.dash = self.dash.clone();
                }
                set(&mut line.arrow_start, &self.arrow_start);
                set(&mut line.arrow_end, &self.arrow_end);
            }
            ElementKind::Image(image) => {
                set(&mut image.src, &self.src);
                if self.filters.is_some() {
                    image.filters = self.filters.clone();
                }
                if self.crop_data.is_some() {
                    image.crop_data = self.crop_data;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_bounds() {
        let element = Element::vector(
            VectorType::Rectangle,
            Rect::new(30.0, 40.0, 10.0, 20.0),
        );
        assert_eq!(element.bounds(), Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(element.aabb(), element.bounds());
    }

    #[test]
    fn test_rotated_aabb_grows() {
        let mut element = Element::vector(VectorType::Rectangle, Rect::new(0.0, 0.0, 100.0, 100.0));
        element.rotation = 45.0;
        let aabb = element.aabb();
        let diagonal = 100.0 * std::f64::consts::SQRT_2;
        assert!((aabb.width() - diagonal).abs() < 1e-6);
        assert!((aabb.x0 + diagonal / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_is_strict() {
        let element = Element::vector(VectorType::Ellipse, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(element.overlaps(Rect::new(5.0, 5.0, 20.0, 20.0)));
        assert!(!element.overlaps(Rect::new(10.0, 0.0, 20.0, 10.0)));
        // Reversed rectangles are normalized.
        assert!(element.overlaps(Rect::new(20.0, 20.0, 9.0, 9.0)));
    }

    #[test]
    fn test_line_bounds_follow_anchor() {
        let element = Element::line(Point::new(100.0, 100.0), Point::new(50.0, 130.0));
        assert_eq!(element.bounds(), Rect::new(50.0, 100.0, 100.0, 130.0));
        assert_eq!(element.width, 50.0);
        assert_eq!(element.height, 30.0);
    }

    #[test]
    fn test_hit_test_respects_rotation() {
        let mut element = Element::vector(VectorType::Rectangle, Rect::new(0.0, 0.0, 100.0, 10.0));
        assert!(element.hit_test(Point::new(90.0, 5.0), 0.0));
        element.rotation = 90.0;
        assert!(!element.hit_test(Point::new(90.0, 5.0), 0.0));
        assert!(element.hit_test(Point::new(-5.0, 90.0), 0.0));
    }

    #[test]
    fn test_transform_enforces_minimums() {
        let mut shape = Element::vector(VectorType::Rectangle, Rect::new(0.0, 0.0, 100.0, 100.0));
        shape.apply_transform(&TransformCommit::new(Point::new(5.0, 5.0), 0.01, 2.0, 30.0));
        assert_eq!(shape.width, 5.0);
        assert_eq!(shape.height, 200.0);
        assert_eq!(shape.rotation, 30.0);
        assert_eq!((shape.x, shape.y), (5.0, 5.0));

        let mut text = Element::text("hi", Point::ZERO, Size::new(200.0, 50.0));
        text.apply_transform(&TransformCommit::new(Point::ZERO, 0.01, 0.01, 0.0));
        assert_eq!(text.width, 20.0);
        assert_eq!(text.height, 20.0);
        assert_eq!(text.as_text().unwrap().font_size, 8.0);

        let mut image = Element::image("a.png", Rect::new(0.0, 0.0, 100.0, 100.0));
        image.apply_transform(&TransformCommit::new(Point::ZERO, 0.01, 1.0, 0.0));
        assert_eq!(image.width, 10.0);
    }

    #[test]
    fn test_transform_scales_line_points() {
        let mut line = Element::line(Point::ZERO, Point::new(10.0, 20.0));
        line.apply_transform(&TransformCommit::new(Point::ZERO, 2.0, 0.5, 0.0));
        assert_eq!(line.as_line().unwrap().points, vec![0.0, 0.0, 20.0, 10.0]);
        assert_eq!((line.width, line.height), (20.0, 10.0));
    }

    #[test]
    fn test_update_ignores_foreign_fields() {
        let mut shape = Element::vector(VectorType::Rectangle, Rect::new(0.0, 0.0, 10.0, 10.0));
        let update = ElementUpdate::default()
            .content("ignored")
            .position(Point::new(3.0, 4.0));
        update.apply_to(&mut shape);
        assert_eq!((shape.x, shape.y), (3.0, 4.0));
        assert!(shape.as_text().is_none());
    }

    #[test]
    fn test_update_sets_explicit_empty_fills() {
        let mut shape = Element::vector(VectorType::Rectangle, Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_paint(Paint::legacy(Some("#ff0000"), None, None));
        ElementUpdate::default().fills(Vec::new()).apply_to(&mut shape);
        assert!(shape.paint.resolved_fills().is_empty());
        assert_eq!(shape.paint.legacy_fill(), Some("#ff0000"));
    }

    #[test]
    fn test_legacy_json_document_element() {
        let json = r##"{
            "id": "el_abc",
            "type": "shape",
            "shapeType": "ellipse",
            "x": 10, "y": 20, "width": 30, "height": 40,
            "rotation": 0, "opacity": 1, "locked": false, "zIndex": 3,
            "fill": "#3b82f6", "stroke": "#1d4ed8", "strokeWidth": 2
        }"##;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.id.as_str(), "el_abc");
        assert_eq!(element.z_index, 3);
        assert!(matches!(
            &element.kind,
            ElementKind::Vector(VectorData { vector_type: VectorType::Ellipse, .. })
        ));
        assert!(element.paint.fills.is_none());
        assert_eq!(element.paint.resolved_fills()[0].color(), Some("#3b82f6"));
        assert_eq!(element.paint.top_stroke().unwrap().width, 2.0);

        let out = serde_json::to_value(&element).unwrap();
        assert_eq!(out["type"], "vector");
        assert_eq!(out["vectorType"], "ellipse");
        assert_eq!(out["fill"], "#3b82f6");
    }

    #[test]
    fn test_text_json_roundtrip() {
        let element = Element::text("Hello", Point::new(1.0, 2.0), Size::new(200.0, 50.0));
        let json = serde_json::to_string(&element).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }
}
