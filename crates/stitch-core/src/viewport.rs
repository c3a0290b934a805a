//! Viewport module for pan/zoom transforms.
//!
//! The viewport maps document space to screen space:
//! `screen = document * scale + (x, y)`.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
/// Additive step used by the zoom in/out commands.
pub const ZOOM_STEP: f64 = 0.1;
/// Multiplicative step applied per wheel tick.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.03;
/// Margin kept around the page by [`Viewport::zoom_to_fit`].
pub const FIT_PADDING: f64 = 100.0;

/// Pan offset and zoom scale of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in screen pixels.
    pub x: f64,
    pub y: f64,
    /// Zoom factor.
    pub scale: f64,
    #[serde(skip, default = "default_min")]
    pub min_scale: f64,
    #[serde(skip, default = "default_max")]
    pub max_scale: f64,
}

fn default_min() -> f64 {
    MIN_ZOOM
}

fn default_max() -> f64 {
    MAX_ZOOM
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            min_scale: MIN_ZOOM,
            max_scale: MAX_ZOOM,
        }
    }
}

/// Map a screen point into document space.
pub fn screen_to_document(point: Point, viewport: &Viewport) -> Point {
    Point::new(
        (point.x - viewport.x) / viewport.scale,
        (point.y - viewport.y) / viewport.scale,
    )
}

/// Map a document point into screen space.
pub fn document_to_screen(point: Point, viewport: &Viewport) -> Point {
    Point::new(
        point.x * viewport.scale + viewport.x,
        point.y * viewport.scale + viewport.y,
    )
}

/// Pan offset that keeps the document point under `anchor` fixed while the
/// scale changes from `old_scale` to `new_scale`.
pub fn zoom_offset(anchor: Point, offset: Vec2, old_scale: f64, new_scale: f64) -> Vec2 {
    Vec2::new(
        anchor.x - (anchor.x - offset.x) / old_scale * new_scale,
        anchor.y - (anchor.y - offset.y) / old_scale * new_scale,
    )
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport with custom zoom limits.
    pub fn with_limits(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Document-to-screen transform for renderers.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.scale)
    }

    pub fn screen_to_document(&self, point: Point) -> Point {
        screen_to_document(point, self)
    }

    pub fn document_to_screen(&self, point: Point) -> Point {
        document_to_screen(point, self)
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Set the scale, keeping the document point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, scale: f64) {
        let new_scale = self.clamp_scale(scale);
        let offset = zoom_offset(anchor, self.offset(), self.scale, new_scale);
        self.x = offset.x;
        self.y = offset.y;
        self.scale = new_scale;
    }

    /// Apply one wheel tick at `anchor`. Positive `delta_y` zooms out.
    pub fn wheel_zoom(&mut self, anchor: Point, delta_y: f64, factor: f64) {
        let scale = if delta_y > 0.0 {
            self.scale / factor
        } else {
            self.scale * factor
        };
        self.zoom_at(anchor, scale);
    }

    /// Pan from a wheel delta. With `horizontal` the dominant axis scrolls
    /// sideways.
    pub fn wheel_pan(&mut self, delta: Vec2, horizontal: bool) {
        let delta = if horizontal {
            let dominant = if delta.x.abs() > delta.y.abs() {
                delta.x
            } else {
                delta.y
            };
            Vec2::new(dominant, 0.0)
        } else {
            delta
        };
        self.pan_by(-delta.x, -delta.y);
    }

    /// Step the scale up by `step`, rounded to two decimals.
    pub fn zoom_in(&mut self, step: f64) {
        self.scale = round_scale((self.scale + step).min(self.max_scale));
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.scale = round_scale((self.scale - step).max(self.min_scale));
    }

    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    /// Fit `page` inside `container` with padding, never zooming above 100%,
    /// and center it.
    pub fn zoom_to_fit(&mut self, container: Size, page: Size) {
        if page.width <= 0.0 || page.height <= 0.0 {
            return;
        }
        let scale_x = (container.width - FIT_PADDING * 2.0) / page.width;
        let scale_y = (container.height - FIT_PADDING * 2.0) / page.height;
        self.scale = round_scale(self.clamp_scale(scale_x.min(scale_y).min(1.0)));
        self.center(container, page);
    }

    /// Center `page` in `container` at the current scale.
    pub fn center(&mut self, container: Size, page: Size) {
        self.x = (container.width - page.width * self.scale) / 2.0;
        self.y = (container.height - page.height * self.scale) / 2.0;
    }
}

fn round_scale(scale: f64) -> f64 {
    (scale * 100.0).round() / 100.0
}
