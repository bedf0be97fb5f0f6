//! Hit-testing of screen points against (possibly rotated) elements.

use crate::camera::Camera;
use crate::element::{Element, ElementId};
use kurbo::{Affine, Point};

/// Whether `point` (world meters) lies inside `element`, with `tolerance`
/// meters of slop on every side.
///
/// Walls and unrotated elements use an axis-aligned box test. Rotated
/// elements bring the point into the element's local frame by rotating it
/// about the footprint center by the inverse angle.
pub fn element_contains(element: &Element, point: Point, tolerance: f64) -> bool {
    let rect = element.local_rect();
    // Elements with a missing dimension are unselectable.
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return false;
    }

    let local = if element.is_rotated_geometry() {
        let center = rect.center().to_vec2();
        let inverse = Affine::translate(center)
            * Affine::rotate(-element.rotation.to_radians())
            * Affine::translate(-center);
        inverse * point
    } else {
        point
    };

    let center = rect.center();
    let half_w = rect.width() / 2.0 + tolerance;
    let half_h = rect.height() / 2.0 + tolerance;
    (local.x - center.x).abs() <= half_w && (local.y - center.y).abs() <= half_h
}

/// Topmost element under `screen_point`.
///
/// `elements` must be in draw order (bottom first); the scan runs in
/// reverse so the last-drawn element wins ties.
pub fn hit_test<'a, I>(elements: I, camera: &Camera, screen_point: Point, tolerance_px: f64) -> Option<ElementId>
where
    I: IntoIterator<Item = &'a Element>,
    I::IntoIter: DoubleEndedIterator,
{
    let world = camera.screen_to_world(screen_point);
    let tolerance = camera.pixels_to_meters(tolerance_px);
    elements
        .into_iter()
        .rev()
        .find(|element| element_contains(element, world, tolerance))
        .map(|element| element.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementType};
    use kurbo::Vec2;

    fn zone(x: f64, y: f64, w: f64, d: f64) -> Element {
        Element::new(ElementType::Zone, Point::new(x, y)).with_kind(ElementKind::Zone { width: w, depth: d })
    }

    #[test]
    fn test_center_hits() {
        let z = zone(0.0, 0.0, 10.0, 10.0);
        assert!(element_contains(&z, Point::new(5.0, 5.0), 0.0));
        assert!(!element_contains(&z, Point::new(10.5, 5.0), 0.0));
    }

    #[test]
    fn test_tolerance_extends_edges() {
        let z = zone(0.0, 0.0, 10.0, 10.0);
        assert!(element_contains(&z, Point::new(10.15, 5.0), 0.2));
        assert!(!element_contains(&z, Point::new(10.3, 5.0), 0.2));
    }

    #[test]
    fn test_rotated_corner_misses() {
        let z = zone(0.0, 0.0, 10.0, 10.0).with_rotation(45.0);
        assert!(element_contains(&z, Point::new(5.0, 5.0), 0.0));
        // The unrotated corner is now outside the diamond.
        assert!(!element_contains(&z, Point::new(0.2, 0.2), 0.0));
        // The diamond's top vertex is inside.
        assert!(element_contains(&z, Point::new(5.0, 5.0 - 7.0), 0.0));
    }

    #[test]
    fn test_wall_quarter_turn_is_axis_aligned() {
        let wall = Element::new(ElementType::Wall, Point::new(0.0, 0.0))
            .with_kind(ElementKind::Wall { length: 10.0, thickness: 0.5 })
            .with_rotation(90.0);
        assert!(element_contains(&wall, Point::new(0.25, 9.0), 0.0));
        assert!(!element_contains(&wall, Point::new(5.0, 0.25), 0.0));
    }

    #[test]
    fn test_zero_size_unselectable() {
        let z = zone(0.0, 0.0, 0.0, 0.0);
        assert!(!element_contains(&z, Point::ZERO, 1.0));
    }

    #[test]
    fn test_topmost_wins() {
        let bottom = zone(0.0, 0.0, 10.0, 10.0);
        let top = zone(2.0, 2.0, 4.0, 4.0);
        let elements = [bottom.clone(), top.clone()];
        let camera = Camera::new();
        assert_eq!(hit_test(&elements, &camera, Point::new(40.0, 40.0), 2.0), Some(top.id));
        assert_eq!(hit_test(&elements, &camera, Point::new(90.0, 90.0), 2.0), Some(bottom.id));
        assert_eq!(hit_test(&elements, &camera, Point::new(500.0, 500.0), 2.0), None);
    }

    #[test]
    fn test_tolerance_scales_with_zoom() {
        let z = zone(0.0, 0.0, 10.0, 10.0);
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        camera.offset = Vec2::ZERO;
        // Right edge is at 200 px; 2 px of slop at any zoom.
        assert!(hit_test([&z], &camera, Point::new(201.5, 50.0), 2.0).is_some());
        assert!(hit_test([&z], &camera, Point::new(203.0, 50.0), 2.0).is_none());
    }
}
