//! Backend-neutral scene recording.
//!
//! [`SceneRecorder`] turns editor state into a flat list of screen-space
//! draw commands. A GPU or canvas backend replays the list; tests inspect it.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
use floorplan_core::camera::Camera;
use floorplan_core::constants::PIXELS_PER_METER;
use floorplan_core::{Element, ElementId, HandleKind, GRID_SIZE};
use kurbo::{BezPath, Point, Rect};
use peniko::Color;

/// Grid lines closer than this on screen are coarsened.
const MIN_GRID_SPACING_PX: f64 = 8.0;

/// Handle dot radius in pixels.
const HANDLE_RADIUS_PX: f64 = 5.0;

/// One drawing primitive in screen pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    GridLine { from: Point, to: Point, color: Color },
    GridDot { at: Point, color: Color },
    Element { id: ElementId, outline: BezPath, fill: Color, stroke: Color },
    Label { text: String, at: Point },
    SelectionBox { rect: Rect, color: Color },
    Handle { kind: HandleKind, at: Point, radius: f64, color: Color },
}

/// Records draw commands instead of rasterizing.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded by the last `build_scene`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Grid spacing in meters: the base cell, doubled until it is readable.
    fn grid_step(camera: &Camera) -> f64 {
        let mut step = GRID_SIZE;
        while step * PIXELS_PER_METER * camera.zoom < MIN_GRID_SPACING_PX {
            step *= 2.0;
        }
        step
    }

    fn render_grid(&mut self, ctx: &RenderContext) {
        if ctx.grid_style == GridStyle::None {
            return;
        }
        let camera = ctx.editor.camera();
        let step = Self::grid_step(camera);
        let world_tl = camera.screen_to_world(Point::ZERO);
        let world_br = camera.screen_to_world(Point::new(ctx.viewport_size.width, ctx.viewport_size.height));
        let (x0, y0) = ((world_tl.x / step).floor() as i64, (world_tl.y / step).floor() as i64);
        let (x1, y1) = ((world_br.x / step).ceil() as i64, (world_br.y / step).ceil() as i64);
        let color = ctx.grid_color;

        match ctx.grid_style {
            GridStyle::Lines => {
                for i in x0..=x1 {
                    let x = camera.world_to_screen(Point::new(i as f64 * step, 0.0)).x;
                    self.commands.push(DrawCommand::GridLine {
                        from: Point::new(x, 0.0),
                        to: Point::new(x, ctx.viewport_size.height),
                        color,
                    });
                }
                for j in y0..=y1 {
                    let y = camera.world_to_screen(Point::new(0.0, j as f64 * step)).y;
                    self.commands.push(DrawCommand::GridLine {
                        from: Point::new(0.0, y),
                        to: Point::new(ctx.viewport_size.width, y),
                        color,
                    });
                }
            }
            GridStyle::Dots => {
                for i in x0..=x1 {
                    for j in y0..=y1 {
                        let at = camera.world_to_screen(Point::new(i as f64 * step, j as f64 * step));
                        self.commands.push(DrawCommand::GridDot { at, color });
                    }
                }
            }
            GridStyle::None => {}
        }
    }

    fn render_element(&mut self, ctx: &RenderContext, element: &Element) {
        let camera = ctx.editor.camera();
        let corners = element.corners().map(|p| camera.world_to_screen(p));
        let mut outline = BezPath::new();
        outline.move_to(corners[0]);
        for corner in &corners[1..] {
            outline.line_to(*corner);
        }
        outline.close_path();

        self.commands.push(DrawCommand::Element {
            id: element.id,
            outline,
            fill: element.color.into(),
            stroke: ctx.stroke_color,
        });
        if ctx.show_labels && !element.label.is_empty() {
            self.commands.push(DrawCommand::Label {
                text: element.label.clone(),
                at: camera.world_to_screen(element.center()),
            });
        }
    }

    fn render_selection(&mut self, ctx: &RenderContext) {
        let editor = ctx.editor;
        let Some(element) = editor.selected_element() else {
            return;
        };
        self.commands.push(DrawCommand::SelectionBox {
            rect: floorplan_core::selection::selection_box(element, editor.camera()),
            color: ctx.selection_color,
        });
        for handle in editor.selection_handles() {
            self.commands.push(DrawCommand::Handle {
                kind: handle.kind,
                at: handle.position,
                radius: HANDLE_RADIUS_PX,
                color: ctx.selection_color,
            });
        }
    }
}

impl Renderer for SceneRecorder {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        let zoom = ctx.editor.camera().zoom;
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(RendererError::RenderFailed(format!("camera zoom {} is not usable", zoom)));
        }

        self.commands.clear();
        self.commands.push(DrawCommand::Clear(self.background_color(ctx)));
        self.render_grid(ctx);
        for element in ctx.editor.elements() {
            self.render_element(ctx, element);
        }
        self.render_selection(ctx);
        log::trace!("recorded {} draw commands", self.commands.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{Editor, ElementType};
    use kurbo::{Shape, Size};

    fn count<F: Fn(&DrawCommand) -> bool>(commands: &[DrawCommand], f: F) -> usize {
        commands.iter().filter(|c| f(c)).count()
    }

    #[test]
    fn test_empty_scene_has_background_and_grid() {
        let editor = Editor::default();
        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(100.0, 50.0));
        renderer.build_scene(&ctx).unwrap();
        assert!(matches!(renderer.commands()[0], DrawCommand::Clear(_)));
        // 0.5 m cells are 5 px at zoom 1, so the grid coarsens to 1 m = 10 px.
        let lines = count(renderer.commands(), |c| matches!(c, DrawCommand::GridLine { .. }));
        assert_eq!(lines, 11 + 6);
    }

    #[test]
    fn test_grid_none() {
        let editor = Editor::default();
        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(100.0, 100.0)).with_grid(GridStyle::None);
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(renderer.commands().len(), 1);
    }

    #[test]
    fn test_elements_in_draw_order_with_labels() {
        let mut editor = Editor::default();
        let rack = editor.place_element(ElementType::Rack, Point::new(1.0, 1.0)).unwrap();
        let zone = editor.place_element(ElementType::Zone, Point::ZERO).unwrap();
        editor.set_tool(floorplan_core::Tool::Select);

        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(200.0, 200.0)).with_grid(GridStyle::None);
        renderer.build_scene(&ctx).unwrap();
        let ids: Vec<ElementId> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Element { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![zone, rack]);
        assert_eq!(count(renderer.commands(), |c| matches!(c, DrawCommand::Label { .. })), 2);
    }

    #[test]
    fn test_element_outline_in_screen_space() {
        let mut editor = Editor::default();
        let id = editor.place_element(ElementType::Zone, Point::new(1.0, 2.0)).unwrap();
        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(400.0, 400.0)).with_grid(GridStyle::None).with_labels(false);
        renderer.build_scene(&ctx).unwrap();
        let outline = renderer
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Element { id: eid, outline, .. } if *eid == id => Some(outline.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(outline.bounding_box(), Rect::new(10.0, 20.0, 110.0, 120.0));
    }

    #[test]
    fn test_selection_draws_box_and_handles() {
        let mut editor = Editor::default();
        editor.place_element(ElementType::Zone, Point::ZERO).unwrap();
        editor.set_tool(floorplan_core::Tool::Select);
        let id = editor.elements()[0].id;
        editor.select_element(Some(id)).unwrap();

        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(200.0, 200.0)).with_grid(GridStyle::None);
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(count(renderer.commands(), |c| matches!(c, DrawCommand::SelectionBox { .. })), 1);
        assert_eq!(count(renderer.commands(), |c| matches!(c, DrawCommand::Handle { .. })), 9);
    }

    #[test]
    fn test_invalid_viewport_is_an_error() {
        let editor = Editor::default();
        let mut renderer = SceneRecorder::new();
        let ctx = RenderContext::new(&editor, Size::new(-1.0, 10.0));
        assert!(renderer.build_scene(&ctx).is_err());
    }
}
