//! Grid snapping and angle normalization.

use kurbo::Point;

/// Grid cell size in meters (matches the rendered grid).
pub const GRID_SIZE: f64 = 0.5;

/// Snap a single coordinate to the nearest grid line.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a world point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let p = snap_to_grid(Point::new(1.3, 2.76), GRID_SIZE);
        assert_eq!(p, Point::new(1.5, 3.0));
    }

    #[test]
    fn test_snap_to_grid_exact() {
        let p = snap_to_grid(Point::new(1.5, -2.0), GRID_SIZE);
        assert_eq!(p, Point::new(1.5, -2.0));
    }

    #[test]
    fn test_snap_value_zero_grid_passthrough() {
        assert!((snap_value(1.234, 0.0) - 1.234).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(405.0) - 45.0).abs() < 1e-9);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-9);
        assert!(normalize_degrees(360.0).abs() < 1e-9);
    }
}
