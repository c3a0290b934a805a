//! Line element data.
//!
//! Points are stored flat (`[x0, y0, x1, y1, ...]`) relative to the
//! element's anchor, which is how documents persist them.

use super::paint::{LineCap, LineJoin};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineData {
    pub points: Vec<f64>,
    #[serde(default)]
    pub line_cap: LineCap,
    #[serde(default)]
    pub line_join: LineJoin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<Vec<f64>>,
    #[serde(default)]
    pub arrow_start: bool,
    #[serde(default)]
    pub arrow_end: bool,
}

impl LineData {
    /// A degenerate two-point line at the anchor.
    pub fn new() -> Self {
        Self {
            points: vec![0.0, 0.0, 0.0, 0.0],
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: None,
            arrow_start: false,
            arrow_end: false,
        }
    }

    /// Points relative to the anchor. A trailing odd value is ignored.
    pub fn local_points(&self) -> Vec<Point> {
        self.points
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect()
    }

    /// Replace the polyline with a single segment from the anchor.
    pub fn set_segment(&mut self, delta: Vec2) {
        self.points = vec![0.0, 0.0, delta.x, delta.y];
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.local_points()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    pub fn local_bounds(&self) -> Rect {
        let points = self.local_points();
        let Some(first) = points.first() else {
            return Rect::ZERO;
        };
        points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    /// Scale x coordinates by `sx` and y coordinates by `sy`.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for (i, value) in self.points.iter_mut().enumerate() {
            *value *= if i % 2 == 0 { sx } else { sy };
        }
    }

    /// Distance from a local point to the polyline.
    pub fn distance_to(&self, point: Point) -> f64 {
        let points = self.local_points();
        if points.len() == 1 {
            return point.distance(points[0]);
        }
        points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
    }
}

impl Default for LineData {
    fn default() -> Self {
        Self::new()
    }
}

/// Distance from a point to the segment `a`-`b`.
fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}
