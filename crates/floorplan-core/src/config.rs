//! Editor tuning knobs.

use crate::constants::*;
use crate::error::{EditorError, EditorResult};
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};

/// Tunable parameters for camera limits, gestures and handles.
///
/// Every field falls back to its default when absent from JSON, so a config
/// file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid cell size in meters used for drag snapping.
    pub grid_size: f64,
    /// Lower zoom limit.
    pub min_zoom: f64,
    /// Upper zoom limit.
    pub max_zoom: f64,
    /// Multiplicative zoom-button step.
    pub zoom_step: f64,
    /// Zoom added per pixel of pinch distance change.
    pub pinch_sensitivity: f64,
    /// Hit-test slop in screen pixels.
    pub hit_tolerance_px: f64,
    /// Movement before an element touch becomes a drag, in pixels.
    pub drag_threshold_px: f64,
    /// Movement before a handle touch starts resizing, in pixels.
    pub handle_drag_threshold_px: f64,
    /// Handle resize rate in meters per screen pixel.
    pub handle_meters_per_pixel: f64,
    /// Divide the handle rate by the current zoom.
    pub scale_handle_rate_by_zoom: bool,
    /// Touch radius of handles in pixels.
    pub handle_hit_radius_px: f64,
    /// Handles are hidden below this selection-box size in pixels.
    pub min_handle_box_px: f64,
    /// Padding in meters used by fit-to-view.
    pub fit_padding_m: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            pinch_sensitivity: PINCH_SENSITIVITY,
            hit_tolerance_px: HIT_TOLERANCE_PX,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            handle_drag_threshold_px: HANDLE_DRAG_THRESHOLD_PX,
            handle_meters_per_pixel: HANDLE_METERS_PER_PIXEL,
            scale_handle_rate_by_zoom: false,
            handle_hit_radius_px: HANDLE_HIT_RADIUS_PX,
            min_handle_box_px: MIN_HANDLE_BOX_PX,
            fit_padding_m: FIT_PADDING_METERS,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that limits and rates are usable.
    pub fn validate(&self) -> EditorResult<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(EditorError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(EditorError::InvalidConfig(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.grid_size <= 0.0 || self.handle_meters_per_pixel <= 0.0 || self.pinch_sensitivity <= 0.0 {
            return Err(EditorError::InvalidConfig(
                "grid_size, handle_meters_per_pixel and pinch_sensitivity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective handle resize rate (meters per pixel) at the given zoom.
    pub fn handle_rate(&self, zoom: f64) -> f64 {
        if self.scale_handle_rate_by_zoom && zoom > 0.0 {
            self.handle_meters_per_pixel / zoom
        } else {
            self.handle_meters_per_pixel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "max_zoom": 8.0 }"#).unwrap();
        assert!((config.max_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.min_zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((config.grid_size - GRID_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let result = EditorConfig::from_json(r#"{ "min_zoom": 4.0, "max_zoom": 2.0 }"#);
        assert!(matches!(result, Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_grid_size_rejected() {
        let result = EditorConfig::from_json(r#"{ "grid_size": 0.0 }"#);
        assert!(matches!(result, Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = EditorConfig::from_json("{ not json");
        assert!(matches!(result, Err(EditorError::Serialization(_))));
    }

    #[test]
    fn test_handle_rate_fixed_by_default() {
        let config = EditorConfig::default();
        assert!((config.handle_rate(4.0) - HANDLE_METERS_PER_PIXEL).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_rate_scaled_by_zoom() {
        let config = EditorConfig { scale_handle_rate_by_zoom: true, ..Default::default() };
        assert!((config.handle_rate(2.0) - HANDLE_METERS_PER_PIXEL / 2.0).abs() < f64::EPSILON);
    }
}
