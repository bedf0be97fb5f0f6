//! Renderer trait abstraction.

use floorplan_core::Editor;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only intersection dots.
    Dots,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a Editor,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Grid line color.
    pub grid_color: Color,
    /// Selection box and handle color.
    pub selection_color: Color,
    /// Element outline color.
    pub stroke_color: Color,
    /// Draw element labels.
    pub show_labels: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            grid_color: Color::from_rgba8(200, 200, 200, 100),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            stroke_color: Color::from_rgba8(31, 41, 55, 255),
            show_labels: true,
        }
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Toggle element labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    pub(crate) fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RendererError::InvalidViewport(format!("{}x{}", width, height)));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
