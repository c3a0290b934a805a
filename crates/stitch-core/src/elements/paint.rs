//! Layered paint: fills, strokes and effects.
//!
//! Every element carries three ordered stacks (bottom to top). Older
//! documents only have the scalar `fill`/`stroke`/`strokeWidth`/`shadow`
//! fields; those are kept read-only and resolved into layers here.
//!
//! The layered arrays are `Option<Vec<_>>` on purpose. `None` means the
//! element has never had layers and falls back to the legacy scalar.
//! `Some(vec![])` is an explicit "no paint" and must never fall back.

use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

/// Id used for layers synthesized from legacy scalar fields.
pub const LEGACY_FILL_ID: &str = "legacy-fill";
pub const LEGACY_STROKE_ID: &str = "legacy-stroke";
pub const LEGACY_SHADOW_ID: &str = "legacy-shadow";

/// Generate a fresh layer id.
pub fn new_layer_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// How an image fill is fitted into the element bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    Cover,
    Fit,
    Fill,
}

/// A solid color fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidFill {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Hex color, optionally with an alpha suffix.
    pub color: String,
}

/// An image fill positioned like a crop window over the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFill {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    pub src: String,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    /// Intrinsic size, filled in once the image has loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<f64>,
    /// Crop anchor in `0..=1`; 0 is left, 0.5 center, 1 right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f64>,
}

impl ImageFill {
    pub fn intrinsic_size(&self) -> Option<Size> {
        match (self.image_width, self.image_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(Size::new(w, h)),
            _ => None,
        }
    }

    /// Cover placement for this layer inside a container, or `None` until
    /// the intrinsic size is known.
    pub fn cover_placement(&self, container: Size, shape_offset: Vec2) -> Option<CoverPlacement> {
        let image = self.intrinsic_size()?;
        Some(cover_placement(
            container,
            image,
            self.offset_x.unwrap_or(0.5),
            self.offset_y.unwrap_or(0.5),
            shape_offset,
        ))
    }
}

/// One fill layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FillLayer {
    Solid(SolidFill),
    Image(ImageFill),
}

impl FillLayer {
    pub fn solid(color: impl Into<String>, opacity: f64) -> Self {
        FillLayer::Solid(SolidFill {
            id: new_layer_id(),
            enabled: true,
            opacity,
            color: color.into(),
        })
    }

    /// Image fill centered on the source, in cover mode.
    pub fn image(src: impl Into<String>, intrinsic: Option<Size>, opacity: f64) -> Self {
        FillLayer::Image(ImageFill {
            id: new_layer_id(),
            enabled: true,
            opacity,
            src: src.into(),
            scale_mode: ScaleMode::Cover,
            image_width: intrinsic.map(|s| s.width),
            image_height: intrinsic.map(|s| s.height),
            offset_x: Some(0.5),
            offset_y: Some(0.5),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            FillLayer::Solid(f) => &f.id,
            FillLayer::Image(f) => &f.id,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            FillLayer::Solid(f) => f.enabled,
            FillLayer::Image(f) => f.enabled,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            FillLayer::Solid(f) => f.opacity,
            FillLayer::Image(f) => f.opacity,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            FillLayer::Solid(f) => Some(&f.color),
            FillLayer::Image(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// One stroke layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeLayer {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub color: String,
    pub width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<LineCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_join: Option<LineJoin>,
    /// Alternating dash and gap lengths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_pattern: Option<Vec<f64>>,
}

impl StrokeLayer {
    pub fn new(color: impl Into<String>, width: f64, opacity: f64) -> Self {
        Self {
            id: new_layer_id(),
            enabled: true,
            color: color.into(),
            width,
            opacity,
            line_cap: Some(LineCap::Butt),
            line_join: Some(LineJoin::Miter),
            dash_pattern: None,
        }
    }
}

/// Parameters shared by drop and inner shadows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowEffect {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurEffect {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub radius: f64,
}

/// One entry of the effect stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Effect {
    DropShadow(ShadowEffect),
    InnerShadow(ShadowEffect),
    Blur(BlurEffect),
}

impl Effect {
    pub fn drop_shadow(offset: Vec2, blur: f64, color: impl Into<String>, opacity: f64) -> Self {
        Effect::DropShadow(ShadowEffect {
            id: new_layer_id(),
            enabled: true,
            offset_x: offset.x,
            offset_y: offset.y,
            blur,
            color: color.into(),
            opacity,
        })
    }

    pub fn blur(radius: f64) -> Self {
        Effect::Blur(BlurEffect {
            id: new_layer_id(),
            enabled: true,
            radius,
        })
    }

    pub fn enabled(&self) -> bool {
        match self {
            Effect::DropShadow(s) | Effect::InnerShadow(s) => s.enabled,
            Effect::Blur(b) => b.enabled,
        }
    }
}

/// Legacy single shadow stored directly on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
    pub enabled: bool,
}

/// The paint stacks of an element plus its legacy scalar fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<FillLayer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<StrokeLayer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shadow: Option<Shadow>,
}

impl Paint {
    /// Paint with only legacy scalar fields, as written by older documents.
    pub fn legacy(fill: Option<&str>, stroke: Option<&str>, stroke_width: Option<f64>) -> Self {
        Self {
            fill: fill.map(str::to_string),
            stroke: stroke.map(str::to_string),
            stroke_width,
            ..Self::default()
        }
    }

    /// Paint with explicit layer stacks.
    pub fn layered(fills: Vec<FillLayer>, strokes: Vec<StrokeLayer>) -> Self {
        Self {
            fills: Some(fills),
            strokes: Some(strokes),
            ..Self::default()
        }
    }

    pub fn with_legacy_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn legacy_fill(&self) -> Option<&str> {
        self.fill.as_deref()
    }

    pub fn legacy_stroke(&self) -> Option<&str> {
        self.stroke.as_deref()
    }

    pub fn legacy_stroke_width(&self) -> Option<f64> {
        self.stroke_width
    }

    pub fn legacy_shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    /// Fill stack, falling back to the legacy `fill` scalar when absent.
    pub fn resolved_fills(&self) -> Cow<'_, [FillLayer]> {
        match &self.fills {
            Some(fills) => Cow::Borrowed(fills.as_slice()),
            None => Cow::Owned(
                self.fill
                    .iter()
                    .map(|color| {
                        FillLayer::Solid(SolidFill {
                            id: LEGACY_FILL_ID.to_string(),
                            enabled: true,
                            opacity: 1.0,
                            color: color.clone(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    /// Stroke stack, falling back to `stroke`/`strokeWidth` when absent.
    pub fn resolved_strokes(&self) -> Cow<'_, [StrokeLayer]> {
        match &self.strokes {
            Some(strokes) => Cow::Borrowed(strokes.as_slice()),
            None => {
                let legacy = match (&self.stroke, self.stroke_width) {
                    (Some(color), Some(width)) if width > 0.0 => Some(StrokeLayer {
                        id: LEGACY_STROKE_ID.to_string(),
                        ..StrokeLayer::new(color.clone(), width, 1.0)
                    }),
                    _ => None,
                };
                Cow::Owned(legacy.into_iter().collect())
            }
        }
    }

    /// Effect stack, falling back to an enabled legacy shadow when absent.
    pub fn resolved_effects(&self) -> Cow<'_, [Effect]> {
        match &self.effects {
            Some(effects) => Cow::Borrowed(effects.as_slice()),
            None => Cow::Owned(
                self.shadow
                    .iter()
                    .filter(|shadow| shadow.enabled)
                    .map(|shadow| {
                        Effect::DropShadow(ShadowEffect {
                            id: LEGACY_SHADOW_ID.to_string(),
                            enabled: true,
                            offset_x: shadow.offset_x,
                            offset_y: shadow.offset_y,
                            blur: shadow.blur,
                            color: shadow.color.clone(),
                            opacity: 1.0,
                        })
                    })
                    .collect(),
            ),
        }
    }

    /// Topmost enabled stroke; renderers draw only this one.
    pub fn top_stroke(&self) -> Option<StrokeLayer> {
        self.resolved_strokes().iter().rev().find(|s| s.enabled).cloned()
    }

    /// Topmost enabled drop shadow.
    pub fn top_drop_shadow(&self) -> Option<ShadowEffect> {
        self.resolved_effects().iter().rev().find_map(|effect| match effect {
            Effect::DropShadow(shadow) if shadow.enabled => Some(shadow.clone()),
            _ => None,
        })
    }

    /// Enabled fills, bottom to top.
    pub fn enabled_fills(&self) -> Vec<FillLayer> {
        self.resolved_fills().iter().filter(|f| f.enabled()).cloned().collect()
    }

    /// Turn absent stacks that have a legacy scalar into explicit layers.
    ///
    /// Explicit stacks (empty or not) are left alone. Returns whether
    /// anything changed.
    pub fn normalize_legacy(&mut self) -> bool {
        let mut changed = false;
        if self.fills.is_none() && self.fill.is_some() {
            self.fills = Some(self.resolved_fills().into_owned());
            changed = true;
        }
        if self.strokes.is_none() && self.stroke.is_some() {
            self.strokes = Some(self.resolved_strokes().into_owned());
            changed = true;
        }
        if self.effects.is_none() && self.shadow.is_some() {
            self.effects = Some(self.resolved_effects().into_owned());
            changed = true;
        }
        changed
    }

    /// Solid colors referenced by this paint, fill colors first.
    pub fn colors(&self) -> Vec<String> {
        let mut colors: Vec<String> = self
            .resolved_fills()
            .iter()
            .filter_map(|f| f.color().map(str::to_string))
            .collect();
        colors.extend(self.resolved_strokes().iter().map(|s| s.color.clone()));
        colors
    }

    /// Fill in the intrinsic size of image layers showing `src`.
    pub(crate) fn set_image_size(&mut self, src: &str, size: Size) -> bool {
        let Some(fills) = self.fills.as_mut() else {
            return false;
        };
        let mut changed = false;
        for layer in fills.iter_mut() {
            let FillLayer::Image(image) = layer else {
                continue;
            };
            if image.src == src && image.intrinsic_size().is_none() {
                image.image_width = Some(size.width);
                image.image_height = Some(size.height);
                changed = true;
            }
        }
        changed
    }
}

/// Pattern transform that makes an image cover a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    /// Uniform scale applied to the image.
    pub scale: f64,
    /// Position of the scaled image's top-left corner.
    pub offset: Vec2,
}

/// Scale the image so it covers `container` on its limiting axis, then
/// shift the overflow according to the crop anchor.
pub fn cover_placement(
    container: Size,
    image: Size,
    offset_x: f64,
    offset_y: f64,
    shape_offset: Vec2,
) -> CoverPlacement {
    let container_ratio = container.width / container.height;
    let image_ratio = image.width / image.height;

    let scale = if image_ratio > container_ratio {
        container.height / image.height
    } else {
        container.width / image.width
    };

    let overflow_x = image.width * scale - container.width;
    let overflow_y = image.height * scale - container.height;

    CoverPlacement {
        scale,
        offset: Vec2::new(
            shape_offset.x - overflow_x * offset_x,
            shape_offset.y - overflow_y * offset_y,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fills_fall_back_to_legacy() {
        let paint = Paint::legacy(Some("#3b82f6"), None, None);
        let fills = paint.resolved_fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].color(), Some("#3b82f6"));
        assert_eq!(fills[0].id(), LEGACY_FILL_ID);
    }

    #[test]
    fn test_explicit_empty_fills_mean_no_paint() {
        let mut paint = Paint::legacy(Some("#3b82f6"), Some("#000000"), Some(2.0));
        paint.fills = Some(Vec::new());
        assert!(paint.resolved_fills().is_empty());
        assert!(paint.enabled_fills().is_empty());
        // Strokes were never set, so they still resolve from the scalar.
        assert_eq!(paint.resolved_strokes().len(), 1);
    }

    #[test]
    fn test_no_legacy_and_no_layers_is_empty() {
        let paint = Paint::default();
        assert!(paint.resolved_fills().is_empty());
        assert!(paint.resolved_strokes().is_empty());
        assert!(paint.resolved_effects().is_empty());
    }

    #[test]
    fn test_legacy_stroke_needs_positive_width() {
        let paint = Paint::legacy(None, Some("#000000"), Some(0.0));
        assert!(paint.resolved_strokes().is_empty());
    }

    #[test]
    fn test_disabled_legacy_shadow_is_dropped() {
        let shadow = Shadow {
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 4.0,
            color: "#00000080".into(),
            enabled: false,
        };
        let paint = Paint::default().with_legacy_shadow(shadow.clone());
        assert!(paint.resolved_effects().is_empty());

        let paint = Paint::default().with_legacy_shadow(Shadow { enabled: true, ..shadow });
        let top = paint.top_drop_shadow().unwrap();
        assert_eq!(top.blur, 4.0);
    }

    #[test]
    fn test_top_stroke_is_last_enabled() {
        let mut hidden = StrokeLayer::new("#ff0000", 4.0, 1.0);
        hidden.enabled = false;
        let paint = Paint::layered(
            Vec::new(),
            vec![StrokeLayer::new("#00ff00", 1.0, 1.0), hidden],
        );
        assert_eq!(paint.top_stroke().unwrap().color, "#00ff00");
    }

    #[test]
    fn test_normalize_preserves_explicit_empty() {
        let mut paint = Paint::legacy(Some("#ffffff"), Some("#000000"), Some(1.0));
        paint.fills = Some(Vec::new());
        assert!(paint.normalize_legacy());
        assert_eq!(paint.fills.as_ref().map(Vec::len), Some(0));
        assert_eq!(paint.strokes.as_ref().map(Vec::len), Some(1));
        assert!(!paint.normalize_legacy());
    }

    #[test]
    fn test_cover_wide_image_scales_to_height() {
        let placement = cover_placement(
            Size::new(100.0, 100.0),
            Size::new(400.0, 200.0),
            0.5,
            0.5,
            Vec2::ZERO,
        );
        assert!((placement.scale - 0.5).abs() < 1e-9);
        // Scaled width 200, overflow 100, centered.
        assert!((placement.offset.x + 50.0).abs() < 1e-9);
        assert!(placement.offset.y.abs() < 1e-9);
    }

    #[test]
    fn test_cover_respects_anchor_and_shape_offset() {
        let placement = cover_placement(
            Size::new(100.0, 50.0),
            Size::new(100.0, 100.0),
            0.0,
            1.0,
            Vec2::new(-50.0, -25.0),
        );
        assert!((placement.scale - 1.0).abs() < 1e-9);
        assert!((placement.offset.x + 50.0).abs() < 1e-9);
        assert!((placement.offset.y + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_fill_waits_for_intrinsic_size() {
        let layer = FillLayer::image("photo.png", None, 1.0);
        let FillLayer::Image(image) = layer else {
            panic!("expected image fill");
        };
        assert!(image.cover_placement(Size::new(10.0, 10.0), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_set_image_size_fills_missing_dimensions() {
        let mut paint = Paint::layered(vec![FillLayer::image("a.png", None, 1.0)], Vec::new());
        assert!(paint.set_image_size("a.png", Size::new(640.0, 480.0)));
        assert!(!paint.set_image_size("a.png", Size::new(1.0, 1.0)));
        let FillLayer::Image(image) = &paint.fills.as_ref().unwrap()[0] else {
            panic!("expected image fill");
        };
        assert_eq!(image.image_width, Some(640.0));
    }

    #[test]
    fn test_fill_layer_json_shape() {
        let json =
            r##"{"id":"f1","type":"solid","enabled":true,"opacity":0.5,"color":"#ff000080"}"##;
        let layer: FillLayer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.opacity(), 0.5);
        let effect: Effect =
            serde_json::from_str(r#"{"id":"e","type":"blur","enabled":true,"radius":3}"#).unwrap();
        assert!(matches!(effect, Effect::Blur(BlurEffect { radius, .. }) if radius == 3.0));
    }
}
