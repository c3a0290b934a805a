//! Constraint helpers for drawing gestures held with Shift.

use kurbo::{Point, Rect};

/// Angle snap increment for constrained lines, in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 45.0;

/// Result of an angle snap operation.
#[derive(Debug, Clone, Copy)]
pub struct AngleSnapResult {
    /// The snapped endpoint.
    pub point: Point,
    /// The snapped angle in degrees (0-360).
    pub angle_degrees: f64,
    /// The original (unsnapped) angle in degrees.
    pub original_angle_degrees: f64,
    /// Distance from the start point, preserved from the original.
    pub distance: f64,
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    if snapped < 0.0 {
        snapped + 360.0
    } else if snapped >= 360.0 {
        snapped - 360.0
    } else {
        snapped
    }
}

/// Snap a line endpoint to [`ANGLE_SNAP_INCREMENT`] steps around `start`,
/// keeping its distance from `start`.
pub fn snap_line_endpoint(start: Point, end: Point) -> AngleSnapResult {
    let delta = end - start;
    let distance = delta.hypot();

    if distance < 0.001 {
        return AngleSnapResult {
            point: end,
            angle_degrees: 0.0,
            original_angle_degrees: 0.0,
            distance: 0.0,
        };
    }

    let angle = delta.y.atan2(delta.x).to_degrees();
    let original = if angle < 0.0 { angle + 360.0 } else { angle };
    let snapped = snap_angle(original, ANGLE_SNAP_INCREMENT);
    let radians = snapped.to_radians();

    AngleSnapResult {
        point: Point::new(
            start.x + distance * radians.cos(),
            start.y + distance * radians.sin(),
        ),
        angle_degrees: snapped,
        original_angle_degrees: original,
        distance,
    }
}

/// Box spanned by a drag from `anchor` to `current`.
///
/// With `square` the box takes the larger side on both axes, growing away
/// from the anchor in the direction of the drag.
pub fn drag_rect(anchor: Point, current: Point, square: bool) -> Rect {
    if !square {
        return Rect::from_points(anchor, current);
    }
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let side = dx.abs().max(dy.abs());
    let corner = Point::new(
        anchor.x + side.copysign(dx),
        anchor.y + side.copysign(dy),
    );
    Rect::from_points(anchor, corner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(0.0, 45.0) - 0.0).abs() < 0.01);
        assert!((snap_angle(22.0, 45.0) - 0.0).abs() < 0.01);
        assert!((snap_angle(23.0, 45.0) - 45.0).abs() < 0.01);
        assert!((snap_angle(100.0, 45.0) - 90.0).abs() < 0.01);
        assert!((snap_angle(350.0, 45.0) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_snap_line_endpoint_horizontal() {
        let result = snap_line_endpoint(Point::ZERO, Point::new(100.0, 5.0));
        assert!((result.angle_degrees - 0.0).abs() < 0.01);
        assert!(result.point.y.abs() < 0.01);
    }

    #[test]
    fn test_snap_line_endpoint_diagonal() {
        let result = snap_line_endpoint(Point::ZERO, Point::new(100.0, 80.0));
        assert!((result.angle_degrees - 45.0).abs() < 0.01);
        assert!((result.point.x - result.point.y).abs() < 1e-9);
    }

    #[test]
    fn test_snap_line_preserves_distance() {
        let end = Point::new(-30.0, 100.0);
        let result = snap_line_endpoint(Point::ZERO, end);
        let snapped_length = result.point.to_vec2().hypot();
        assert!((snapped_length - end.to_vec2().hypot()).abs() < 1e-9);
        assert!((result.angle_degrees - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_length_line_is_unchanged() {
        let start = Point::new(3.0, 4.0);
        let result = snap_line_endpoint(start, start);
        assert_eq!(result.point, start);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_drag_rect_square_follows_drag_direction() {
        let rect = drag_rect(Point::new(100.0, 100.0), Point::new(70.0, 110.0), true);
        assert_eq!(rect, Rect::new(70.0, 100.0, 100.0, 130.0));
        let free = drag_rect(Point::new(100.0, 100.0), Point::new(70.0, 110.0), false);
        assert_eq!(free, Rect::new(70.0, 100.0, 100.0, 110.0));
    }
}
