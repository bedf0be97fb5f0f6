//! Camera module for pan/zoom transforms.
//!
//! World coordinates are meters; screen coordinates are pixels. The mapping is
//!
//! ```text
//! screen = (world * PIXELS_PER_METER + offset) * zoom
//! ```
//!
//! so `offset` lives in unzoomed pixel space. Every conversion in the crate
//! goes through [`Camera::world_to_screen`] and [`Camera::screen_to_world`].

use crate::constants::{MAX_ZOOM, MIN_ZOOM, PIXELS_PER_METER};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in unzoomed pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 10 px per meter).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Zoom computed by the last fit-to-view; zoom never drops below it.
    #[serde(default)]
    pub fit_floor: Option<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            fit_floor: None,
        }
    }
}

/// Sparse camera update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPatch {
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub zoom: Option<f64>,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            (world.x * PIXELS_PER_METER + self.offset.x) * self.zoom,
            (world.y * PIXELS_PER_METER + self.offset.y) * self.zoom,
        )
    }

    /// Convert a screen point to world coordinates (exact inverse of
    /// [`Camera::world_to_screen`]).
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x / self.zoom - self.offset.x) / PIXELS_PER_METER,
            (screen.y / self.zoom - self.offset.y) / PIXELS_PER_METER,
        )
    }

    /// Convert a world rectangle to screen space.
    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_screen(Point::new(rect.x0, rect.y0)),
            self.world_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Length in screen pixels of a world length in meters.
    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        meters * PIXELS_PER_METER * self.zoom
    }

    /// Length in meters of a screen length in pixels.
    pub fn pixels_to_meters(&self, pixels: f64) -> f64 {
        pixels / (PIXELS_PER_METER * self.zoom)
    }

    /// The range zoom is currently clamped to.
    ///
    /// A fit floor raises the lower bound and, if it exceeds `max_zoom`,
    /// the upper bound too.
    pub fn zoom_range(&self) -> (f64, f64) {
        match self.fit_floor {
            Some(floor) => (self.min_zoom.max(floor), self.max_zoom.max(floor)),
            None => (self.min_zoom, self.max_zoom),
        }
    }

    /// Clamp a zoom value into [`Camera::zoom_range`].
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (lo, hi) = self.zoom_range();
        if zoom.is_nan() {
            return lo;
        }
        zoom.clamp(lo, hi)
    }

    /// Pan the camera by a delta in screen pixels; 1:1 at any zoom.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset += screen_delta / self.zoom;
    }

    /// Change zoom while keeping the world point under `anchor` fixed on screen.
    ///
    /// Returns false if the clamped zoom equals the current one.
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) -> bool {
        let new_zoom = self.clamp_zoom(zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        // World position (in unzoomed pixels) under the anchor at the old zoom.
        let world_pixel = anchor.to_vec2() / self.zoom - self.offset;
        self.zoom = new_zoom;
        self.offset = anchor.to_vec2() / new_zoom - world_pixel;
        true
    }

    /// Multiply zoom by `factor`, anchored at `anchor`.
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) -> bool {
        self.zoom_at(anchor, self.zoom * factor)
    }

    /// Apply a sparse update; zoom is clamped.
    pub fn apply_patch(&mut self, patch: &CameraPatch) {
        if let Some(x) = patch.offset_x {
            self.offset.x = x;
        }
        if let Some(y) = patch.offset_y {
            self.offset.y = y;
        }
        if let Some(zoom) = patch.zoom {
            self.zoom = self.clamp_zoom(zoom);
        }
    }

    /// Reset camera to default position and zoom, forgetting the fit floor.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
        self.fit_floor = None;
    }

    /// Frame `bounds` (world meters) inside `viewport` (pixels) with `padding`
    /// meters on every side, and record the result as the zoom floor.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        let padded = bounds.inflate(padding, padding);
        if padded.width() <= 0.0 || padded.height() <= 0.0 || viewport.is_zero_area() {
            self.reset();
            return;
        }

        let scale_x = viewport.width / (padded.width() * PIXELS_PER_METER);
        let scale_y = viewport.height / (padded.height() * PIXELS_PER_METER);
        let fit = scale_x.min(scale_y).max(self.min_zoom);

        self.fit_floor = Some(fit);
        self.zoom = fit;

        // Center the bounds in the viewport
        let center = padded.center();
        self.offset = Vec2::new(
            viewport.width / (2.0 * fit) - center.x * PIXELS_PER_METER,
            viewport.height / (2.0 * fit) - center.y * PIXELS_PER_METER,
        );
        log::info!("fit to view: zoom {:.3}, offset ({:.1}, {:.1})", fit, self.offset.x, self.offset.y);
    }
}
