//! Selection box and manipulation handle system.
//!
//! Handles live in screen space around the element's axis-aligned bounding
//! box. A handle drag is always computed from the element as it was when the
//! drag began plus the total pointer delta, so rounding never accumulates.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::constants::{MIN_DIMENSION, ROTATE_HANDLE_OFFSET_PX};
use crate::element::{Element, ElementPatch};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, resizes both axes.
    Corner(Corner),
    /// Edge midpoint handle, resizes one axis.
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleKind {
    /// Direction each axis grows when the handle moves right/down:
    /// `+1` grows, `-1` shrinks, `0` is untouched.
    fn grow_signs(self) -> (f64, f64) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (-1.0, -1.0),
            HandleKind::Corner(Corner::TopRight) => (1.0, -1.0),
            HandleKind::Corner(Corner::BottomLeft) => (-1.0, 1.0),
            HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
            HandleKind::Edge(Edge::Top) => (0.0, -1.0),
            HandleKind::Edge(Edge::Bottom) => (0.0, 1.0),
            HandleKind::Edge(Edge::Left) => (-1.0, 0.0),
            HandleKind::Edge(Edge::Right) => (1.0, 0.0),
            HandleKind::Rotate => (0.0, 0.0),
        }
    }

    pub fn is_resize(self) -> bool {
        !matches!(self, HandleKind::Rotate)
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in screen coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a screen point is within `radius` pixels of this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// Screen-space selection box of an element.
pub fn selection_box(element: &Element, camera: &Camera) -> Rect {
    camera.world_rect_to_screen(element.bounding_box())
}

/// Handles for a selected element, or none when its box is too small to
/// manipulate on screen.
pub fn handles(element: &Element, camera: &Camera, config: &EditorConfig) -> Vec<Handle> {
    let bounds = selection_box(element, camera);
    if bounds.width() < config.min_handle_box_px || bounds.height() < config.min_handle_box_px {
        return Vec::new();
    }
    let center = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(center.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, center.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(center.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, center.y), HandleKind::Edge(Edge::Left)),
        Handle::new(Point::new(center.x, bounds.y0 - ROTATE_HANDLE_OFFSET_PX), HandleKind::Rotate),
    ]
}

/// Find the handle closest to `point` within `radius` pixels.
pub fn hit_test_handles(handles: &[Handle], point: Point, radius: f64) -> Option<HandleKind> {
    handles
        .iter()
        .filter(|h| h.hit_test(point, radius))
        .min_by(|a, b| {
            let da = (point - a.position).hypot2();
            let db = (point - b.position).hypot2();
            da.total_cmp(&db)
        })
        .map(|h| h.kind)
}

/// Resize `original` by dragging `handle` a total of `screen_delta` pixels.
///
/// `rate` converts pixels to meters. Sizes clamp to [`MIN_DIMENSION`] and the
/// side of the selection box opposite the handle stays put. Returns `None`
/// for the rotate handle.
pub fn resize_from_handle(original: &Element, handle: HandleKind, screen_delta: Vec2, rate: f64) -> Option<ElementPatch> {
    if !handle.is_resize() {
        return None;
    }
    let (sign_x, sign_y) = handle.grow_signs();
    let (h_field, v_field) = original.screen_axes();
    let size = original.screen_size();
    let mut patch = ElementPatch::default();
    // Growth actually applied along each screen axis, after clamping.
    let mut grown = Vec2::ZERO;

    if sign_x != 0.0 {
        if let Some(field) = h_field {
            let width = (size.width + sign_x * screen_delta.x * rate).max(MIN_DIMENSION);
            grown.x = width - size.width;
            patch.set_dimension(field, width);
        }
    }
    if sign_y != 0.0 {
        if let Some(field) = v_field {
            let height = (size.height + sign_y * screen_delta.y * rate).max(MIN_DIMENSION);
            grown.y = height - size.height;
            patch.set_dimension(field, height);
        }
    }
    if patch.is_empty() {
        return Some(patch);
    }

    if original.is_rotated_geometry() {
        // The pivot moves with the size, so place the new box first and
        // derive the origin from its center.
        let mut resized = original.clone();
        resized.apply_patch(&patch);
        let before = original.bounding_box();
        let after = resized.bounding_box().size();
        let center = Point::new(
            anchored_center(before.x0, before.x1, after.width, if grown.x != 0.0 { sign_x } else { 0.0 }),
            anchored_center(before.y0, before.y1, after.height, if grown.y != 0.0 { sign_y } else { 0.0 }),
        );
        let local = resized.local_rect().size();
        patch.x = Some(center.x - local.width / 2.0);
        patch.y = Some(center.y - local.height / 2.0);
    } else {
        if sign_x < 0.0 && grown.x != 0.0 {
            patch.x = Some(original.x - grown.x);
        }
        if sign_y < 0.0 && grown.y != 0.0 {
            patch.y = Some(original.y - grown.y);
        }
    }
    Some(patch)
}

/// Center along one axis of a box of `extent` that keeps the side opposite
/// a handle moving in direction `sign` fixed. `0` keeps the old center.
fn anchored_center(lo: f64, hi: f64, extent: f64, sign: f64) -> f64 {
    if sign > 0.0 {
        lo + extent / 2.0
    } else if sign < 0.0 {
        hi - extent / 2.0
    } else {
        (lo + hi) / 2.0
    }
}

/// Patch applying one rotate-handle step to `element`.
pub fn rotation_step(element: &Element) -> ElementPatch {
    ElementPatch::rotation(element.element_type().next_rotation(element.rotation))
}
