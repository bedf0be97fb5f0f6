//! Replay recorded editor sessions.
//!
//! A script is a viewport plus a list of steps. Touch steps go through the
//! gesture controller exactly as live input would; the other steps call the
//! editor API the toolbar and property panel would use.

use crate::error::{AppError, AppResult};
use floorplan_core::{
    Camera, CameraPatch, Editor, EditorConfig, Effect, Element, ElementId, ElementPatch, FloorPlan, GestureController,
    Tool, TouchEvent,
};
use floorplan_render::{RenderContext, Renderer, SceneRecorder};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container size the session ran in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Touch { event: TouchEvent },
    SetTool { tool: Tool },
    ZoomIn,
    ZoomOut,
    FitToView,
    Resize { width: f64, height: f64 },
    SetCamera { camera: CameraPatch },
    Add { element: Element },
    Update { id: ElementId, patch: ElementPatch },
    Delete { id: ElementId },
    Select { id: Option<ElementId> },
    Rotate { id: ElementId },
    Undo,
    Redo,
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub plan: FloorPlan,
    pub camera: Camera,
    pub selection: Option<ElementId>,
    pub effects: Vec<Effect>,
    /// Draw commands in the final frame.
    pub draw_commands: usize,
    /// The plan changed and should be persisted.
    pub dirty: bool,
}

/// Run `script` against an editor over `plan`.
pub fn replay(plan: FloorPlan, config: EditorConfig, script: &Script) -> AppResult<ReplayReport> {
    let mut editor = Editor::with_plan(plan, config)?;
    let mut gestures = GestureController::new();
    let mut effects = Vec::new();
    let Viewport { width, height } = script.viewport;
    editor.on_container_resize(width, height);

    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("step {}: {:?}", index, step);
        apply_step(&mut editor, &mut gestures, step, &mut effects)?;
    }

    let mut recorder = SceneRecorder::new();
    let viewport = editor.viewport().unwrap_or(Size::new(width, height));
    recorder.build_scene(&RenderContext::new(&editor, viewport))?;

    let dirty = editor.take_dirty();
    log::info!("replayed {} steps, {} effects", script.steps.len(), effects.len());
    Ok(ReplayReport {
        plan: editor.plan().clone(),
        camera: editor.camera().clone(),
        selection: editor.selection(),
        effects,
        draw_commands: recorder.commands().len(),
        dirty,
    })
}

fn apply_step(
    editor: &mut Editor,
    gestures: &mut GestureController,
    step: &Step,
    effects: &mut Vec<Effect>,
) -> AppResult<()> {
    match step {
        Step::Touch { event } => effects.extend(gestures.handle(editor, event.clone())),
        Step::SetTool { tool } => editor.set_tool(*tool),
        Step::ZoomIn => {
            editor.zoom_in();
        }
        Step::ZoomOut => {
            editor.zoom_out();
        }
        Step::FitToView => {
            let Size { width, height } = editor.viewport().unwrap_or(Size::new(800.0, 600.0));
            editor.fit_to_view(width, height);
        }
        Step::Resize { width, height } => editor.on_container_resize(*width, *height),
        Step::SetCamera { camera } => editor.set_camera(camera),
        Step::Add { element } => {
            editor.add_element(element.clone())?;
        }
        Step::Update { id, patch } => editor.update_element(*id, patch)?,
        Step::Delete { id } => {
            editor.delete_element(*id)?;
        }
        Step::Select { id } => editor.select_element(*id)?,
        Step::Rotate { id } => {
            editor.rotate_element(*id)?;
        }
        Step::Undo => {
            editor.undo();
        }
        Step::Redo => {
            editor.redo();
        }
    }
    Ok(())
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io { path: path.to_path_buf(), source })
}

/// Load inputs from disk and replay. A missing config path uses defaults.
pub fn replay_files(blueprint: &Path, script: &Path, config: Option<&Path>) -> AppResult<ReplayReport> {
    let plan = FloorPlan::from_json(&read(blueprint)?)?;
    let script: Script = serde_json::from_str(&read(script)?)?;
    let config = match config {
        Some(path) => EditorConfig::from_json(&read(path)?)?,
        None => EditorConfig::default(),
    };
    replay(plan, config, &script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{ElementType, TouchPoint};
    use kurbo::Point;
    use std::fs;

    fn touch(id: u64, x: f64, y: f64) -> TouchPoint {
        TouchPoint::new(id, Point::new(x, y))
    }

    #[test]
    fn test_parse_script() {
        let json = r#"{
            "viewport": { "width": 400, "height": 300 },
            "steps": [
                { "op": "set_tool", "tool": { "tool": "place", "kind": "rack" } },
                { "op": "touch", "event": { "type": "start", "touches": [{ "id": 1, "x": 10, "y": 20 }] } },
                { "op": "touch", "event": { "type": "end", "touches": [] } },
                { "op": "touch", "event": { "type": "cancel" } },
                { "op": "zoom_in" }
            ]
        }"#;
        let script: Script = serde_json::from_str(json).unwrap();
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[0], Step::SetTool { tool: Tool::Place(ElementType::Rack) });
        assert_eq!(script.steps[3], Step::Touch { event: TouchEvent::Cancel });
    }

    #[test]
    fn test_replay_places_and_drags() {
        let script = Script {
            viewport: Viewport::default(),
            steps: vec![
                Step::SetTool { tool: Tool::Place(ElementType::Zone) },
                Step::Touch { event: TouchEvent::Start(vec![touch(1, 0.0, 0.0)]) },
                Step::Touch { event: TouchEvent::End(vec![]) },
                Step::SetTool { tool: Tool::Select },
                Step::Touch { event: TouchEvent::Start(vec![touch(1, 50.0, 50.0)]) },
                Step::Touch { event: TouchEvent::Move(vec![touch(1, 70.0, 60.0)]) },
                Step::Touch { event: TouchEvent::End(vec![]) },
            ],
        };
        let report = replay(FloorPlan::new(), EditorConfig::default(), &script).unwrap();
        assert_eq!(report.plan.len(), 1);
        let zone = report.plan.elements.values().next().unwrap();
        assert_eq!(zone.origin(), Point::new(2.0, 1.0));
        assert_eq!(zone.label, "Zone 1");
        assert!(report.dirty);
        assert!(report.effects.iter().any(|e| matches!(e, Effect::DragEnded { .. })));
        assert!(report.draw_commands > 1);
    }

    #[test]
    fn test_unknown_element_fails_replay() {
        let script = Script {
            viewport: Viewport::default(),
            steps: vec![Step::Delete { id: floorplan_core::new_element_id() }],
        };
        let result = replay(FloorPlan::new(), EditorConfig::default(), &script);
        assert!(matches!(result, Err(AppError::Editor(_))));
    }

    #[test]
    fn test_replay_files() {
        let dir = tempfile::tempdir().unwrap();
        let blueprint = dir.path().join("plan.json");
        let script = dir.path().join("script.json");
        let config = dir.path().join("config.json");

        let mut plan = FloorPlan::new();
        plan.add(Element::new(ElementType::Rack, Point::new(4.0, 4.0))).unwrap();
        fs::write(&blueprint, plan.to_json().unwrap()).unwrap();
        fs::write(&script, r#"{ "steps": [{ "op": "zoom_in" }] }"#).unwrap();
        fs::write(&config, r#"{ "zoom_step": 2.0 }"#).unwrap();

        let report = replay_files(&blueprint, &script, Some(&config)).unwrap();
        assert_eq!(report.plan.len(), 1);
        assert!(!report.dirty);
        let fitted = report.camera.fit_floor.unwrap();
        assert!((report.camera.zoom - (fitted * 2.0).min(report.camera.max_zoom.max(fitted))).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let result = replay_files(&missing, &missing, None);
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blueprint = dir.path().join("plan.json");
        let script = dir.path().join("script.json");
        let config = dir.path().join("config.json");
        fs::write(&blueprint, FloorPlan::new().to_json().unwrap()).unwrap();
        fs::write(&script, "{}").unwrap();
        fs::write(&config, r#"{ "min_zoom": -1.0 }"#).unwrap();
        let result = replay_files(&blueprint, &script, Some(&config));
        assert!(matches!(result, Err(AppError::Editor(floorplan_core::EditorError::InvalidConfig(_)))));
    }
}
