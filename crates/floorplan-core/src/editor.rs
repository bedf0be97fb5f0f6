//! Editor state: the plan, camera, selection, tool and undo history.
//!
//! The host owns one [`Editor`] and hands `&mut Editor` to whatever drives
//! it (the gesture controller, toolbar buttons, a property panel). Public
//! mutators snapshot for undo; gestures use the crate-private untracked
//! variants and take a single snapshot per drag.

use crate::camera::{Camera, CameraPatch};
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch, ElementType};
use crate::error::{EditorError, EditorResult};
use crate::hit;
use crate::plan::FloorPlan;
use crate::selection::{self, Handle, HandleKind};
use crate::snap::snap_to_grid;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Active tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "kind", rename_all = "lowercase")]
pub enum Tool {
    /// Select, drag and resize existing elements.
    #[default]
    Select,
    /// Tap on empty space places an element of this type.
    Place(ElementType),
}

/// A snapshot of editor state for undo/redo.
#[derive(Debug, Clone)]
struct Snapshot {
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
    selection: Option<ElementId>,
}

/// Floor-plan editor state.
#[derive(Debug, Clone)]
pub struct Editor {
    plan: FloorPlan,
    camera: Camera,
    selection: Option<ElementId>,
    tool: Tool,
    config: EditorConfig,
    /// Last known container size in pixels.
    viewport: Option<Size>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    dirty: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::build(FloorPlan::new(), EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor over an empty plan.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        Self::with_plan(FloorPlan::new(), config)
    }

    /// Create an editor over an existing plan.
    pub fn with_plan(plan: FloorPlan, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::build(plan, config))
    }

    fn build(plan: FloorPlan, config: EditorConfig) -> Self {
        Self {
            plan,
            camera: Camera::with_limits(config.min_zoom, config.max_zoom),
            selection: None,
            tool: Tool::Select,
            config,
            viewport: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            dirty: false,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.plan.get(id)
    }

    /// All elements in draw order.
    pub fn elements(&self) -> Vec<&Element> {
        self.plan.draw_order()
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.and_then(|id| self.plan.get(id))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    /// Topmost element under a screen point.
    pub fn hit_test(&self, screen_point: Point) -> Option<ElementId> {
        hit::hit_test(self.plan.draw_order(), &self.camera, screen_point, self.config.hit_tolerance_px)
    }

    /// Handles of the selected element (empty when nothing is selected, the
    /// box is too small, or a placement tool is active).
    pub fn selection_handles(&self) -> Vec<Handle> {
        match (self.tool, self.selected_element()) {
            (Tool::Select, Some(element)) => selection::handles(element, &self.camera, &self.config),
            _ => Vec::new(),
        }
    }

    /// Handle of the selected element under a screen point.
    pub fn handle_at(&self, screen_point: Point) -> Option<HandleKind> {
        selection::hit_test_handles(&self.selection_handles(), screen_point, self.config.handle_hit_radius_px)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Return and clear the "plan changed since last asked" flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── Element mutations ───────────────────────────────────────────

    /// Add an element. Fails if its id is already present.
    pub fn add_element(&mut self, element: Element) -> EditorResult<ElementId> {
        if self.plan.contains(element.id) {
            return Err(EditorError::DuplicateElement(element.id));
        }
        self.push_undo();
        let id = element.id;
        self.plan.add(element)?;
        self.dirty = true;
        log::debug!("added element {}", id);
        Ok(id)
    }

    /// Apply a sparse update to an element.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<()> {
        self.require(id)?;
        self.push_undo();
        self.apply_patch_untracked(id, patch)
    }

    /// Remove an element, deselecting it if selected.
    pub fn delete_element(&mut self, id: ElementId) -> EditorResult<Element> {
        self.require(id)?;
        self.push_undo();
        let element = self.plan.remove(id).ok_or(EditorError::ElementNotFound(id))?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.dirty = true;
        log::debug!("deleted element {}", id);
        Ok(element)
    }

    /// Select an element, or clear the selection with `None`.
    pub fn select_element(&mut self, id: Option<ElementId>) -> EditorResult<()> {
        if let Some(id) = id {
            self.require(id)?;
        }
        self.push_undo();
        self.selection = id;
        Ok(())
    }

    /// Apply one rotate-handle step. Returns the new rotation in degrees.
    pub fn rotate_element(&mut self, id: ElementId) -> EditorResult<f64> {
        let patch = selection::rotation_step(self.require(id)?);
        self.push_undo();
        self.apply_patch_untracked(id, &patch)?;
        Ok(self.plan.get(id).map_or(0.0, |e| e.rotation))
    }

    // ── Camera ──────────────────────────────────────────────────────

    pub fn set_camera(&mut self, patch: &CameraPatch) {
        self.camera.apply_patch(patch);
    }

    pub fn zoom_in(&mut self) -> bool {
        self.camera.zoom_by(self.zoom_anchor(), self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.camera.zoom_by(self.zoom_anchor(), 1.0 / self.config.zoom_step)
    }

    fn zoom_anchor(&self) -> Point {
        self.viewport
            .map_or(Point::ZERO, |size| Point::new(size.width / 2.0, size.height / 2.0))
    }

    /// Frame every element inside a `width` x `height` container.
    /// An empty plan resets the camera and its fit floor.
    pub fn fit_to_view(&mut self, width: f64, height: f64) {
        let viewport = Size::new(width, height);
        self.viewport = Some(viewport);
        match self.plan.bounds() {
            Some(bounds) => self.camera.fit_to_bounds(bounds, viewport, self.config.fit_padding_m),
            None => self.camera.reset(),
        }
    }

    /// Container size changed: remember it and re-fit.
    pub fn on_container_resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("ignoring container resize to {}x{}", width, height);
            return;
        }
        self.fit_to_view(width, height);
    }

    /// Switch tool; always clears the selection.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            log::debug!("tool {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        self.selection = None;
    }

    // ── Undo / redo ─────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.plan.elements.clone(),
            z_order: self.plan.z_order.clone(),
            selection: self.selection,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.plan.elements = snapshot.elements;
        self.plan.z_order = snapshot.z_order;
        self.selection = snapshot.selection.filter(|id| self.plan.contains(*id));
        self.dirty = true;
    }

    /// Push current state to the undo stack (call before making changes).
    pub(crate) fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                let current = self.snapshot();
                self.redo_stack.push(current);
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                let current = self.snapshot();
                self.undo_stack.push(current);
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // ── Untracked mutations used by gestures ────────────────────────

    fn require(&self, id: ElementId) -> EditorResult<&Element> {
        self.plan.get(id).ok_or(EditorError::ElementNotFound(id))
    }

    pub(crate) fn apply_patch_untracked(&mut self, id: ElementId, patch: &ElementPatch) -> EditorResult<()> {
        let element = self.plan.get_mut(id).ok_or(EditorError::ElementNotFound(id))?;
        element.apply_patch(patch);
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn move_element_untracked(&mut self, id: ElementId, origin: Point) -> EditorResult<()> {
        self.apply_patch_untracked(id, &ElementPatch::position(origin))
    }

    pub(crate) fn set_selection(&mut self, id: Option<ElementId>) {
        self.selection = id;
    }

    pub(crate) fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Place a new element of `kind` with its origin at the grid-snapped
    /// world point, label it and select it.
    pub fn place_element(&mut self, kind: ElementType, world: Point) -> EditorResult<ElementId> {
        let origin = snap_to_grid(world, self.config.grid_size);
        let element = Element::new(kind, origin).with_label(self.plan.next_label(kind));
        let id = self.add_element(element)?;
        self.selection = Some(id);
        log::info!("placed {} at ({}, {})", kind.display_name(), origin.x, origin.y);
        Ok(id)
    }
}
