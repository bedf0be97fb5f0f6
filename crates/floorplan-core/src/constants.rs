//! Shared numeric constants and per-type defaults for the floor-plan editor.

use crate::element::ElementType;
use peniko::Color;

// ── Scale ───────────────────────────────────────────────────────

/// Fixed world-to-pixel scale before zoom (pixels per meter).
pub const PIXELS_PER_METER: f64 = 10.0;

/// Smallest allowed value for any element dimension, in meters.
pub const MIN_DIMENSION: f64 = 0.5;

/// Depth of the swing band reserved by a door, in meters.
pub const DOOR_DEPTH: f64 = 1.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lowest zoom reachable by pinch or zoom buttons (unless a fit floor is higher).
pub const MIN_ZOOM: f64 = 0.2;

/// Highest zoom reachable by pinch or zoom buttons (unless a fit floor is higher).
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplicative step used by the zoom-in / zoom-out buttons.
pub const ZOOM_STEP: f64 = 1.25;

/// Zoom added per pixel of pinch distance change.
pub const PINCH_SENSITIVITY: f64 = 0.01;

/// Padding around the plan when fitting it to the viewport, in meters.
pub const FIT_PADDING_METERS: f64 = 2.0;

// ── Gestures ────────────────────────────────────────────────────

/// Hit-test slop around element edges, in screen pixels.
pub const HIT_TOLERANCE_PX: f64 = 2.0;

/// Movement needed before a touch on an element becomes a drag, in screen pixels.
pub const DRAG_THRESHOLD_PX: f64 = 1.0;

/// Movement needed before a handle touch starts resizing, in screen pixels.
pub const HANDLE_DRAG_THRESHOLD_PX: f64 = 3.0;

/// Resize rate of handle drags (meters per screen pixel).
pub const HANDLE_METERS_PER_PIXEL: f64 = 0.05;

// ── Handles ─────────────────────────────────────────────────────

/// Touch radius of a manipulation handle, in screen pixels.
pub const HANDLE_HIT_RADIUS_PX: f64 = 16.0;

/// Handles are hidden when the selection box is smaller than this on either side.
pub const MIN_HANDLE_BOX_PX: f64 = 20.0;

/// Distance from the top of the selection box to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Rotation applied per tap on the rotate handle, in degrees.
pub const ROTATION_STEP_DEGREES: f64 = 45.0;

/// Default size of a freshly placed element as `(primary, secondary)` in meters.
///
/// Secondary is ignored for doors, whose depth is [`DOOR_DEPTH`].
pub fn default_size(kind: ElementType) -> (f64, f64) {
    match kind {
        ElementType::Zone => (10.0, 10.0),
        ElementType::Aisle => (10.0, 3.0),
        ElementType::Rack => (2.5, 1.0),
        ElementType::Wall => (10.0, 0.5),
        ElementType::Door => (1.0, DOOR_DEPTH),
        ElementType::Office => (5.0, 4.0),
    }
}

/// Default shelf layout of a new rack as `(levels, bins_per_shelf)`.
pub const DEFAULT_RACK_LAYOUT: (u32, u32) = (4, 3);

/// Default fill color for an element type.
pub fn default_color(kind: ElementType) -> Color {
    match kind {
        ElementType::Zone => Color::from_rgba8(191, 219, 254, 255),
        ElementType::Aisle => Color::from_rgba8(229, 231, 235, 255),
        ElementType::Rack => Color::from_rgba8(251, 146, 60, 255),
        ElementType::Wall => Color::from_rgba8(55, 65, 81, 255),
        ElementType::Door => Color::from_rgba8(134, 239, 172, 255),
        ElementType::Office => Color::from_rgba8(196, 181, 253, 255),
    }
}

/// Drawing layer of an element type; higher layers are drawn (and hit) on top.
pub fn z_layer(kind: ElementType) -> u8 {
    match kind {
        ElementType::Zone => 0,
        ElementType::Aisle => 1,
        ElementType::Rack => 2,
        ElementType::Office => 3,
        ElementType::Wall => 4,
        ElementType::Door => 5,
    }
}

/// Label given to the `n`-th element of a type (1-based), e.g. `"Rack 3"`.
pub fn default_label(kind: ElementType, n: usize) -> String {
    format!("{} {}", kind.display_name(), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes_respect_minimum() {
        for kind in ElementType::ALL {
            let (a, b) = default_size(kind);
            assert!(a >= MIN_DIMENSION);
            assert!(b >= MIN_DIMENSION);
        }
    }

    #[test]
    fn test_zones_below_racks() {
        assert!(z_layer(ElementType::Zone) < z_layer(ElementType::Rack));
        assert!(z_layer(ElementType::Wall) < z_layer(ElementType::Door));
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label(ElementType::Rack, 3), "Rack 3");
    }

    #[test]
    fn test_zoom_limits_ordered() {
        assert!(MIN_ZOOM < 1.0 && 1.0 < MAX_ZOOM);
    }
}
