//! Touch gesture state machine.
//!
//! [`GestureController`] consumes raw touch events and decides whether the
//! user is panning the camera, dragging an element, pinching to zoom, or
//! dragging a selection handle. Each event carries the touches that are
//! active *after* it happened, so the controller never has to guess which
//! finger went away.

use crate::editor::{Editor, Tool};
use crate::element::{Element, ElementId};
use crate::selection::{self, HandleKind};
use crate::snap::snap_to_grid;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Platform touch identifier.
pub type TouchId = u64;

/// One active touch in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: TouchId,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: TouchId, position: Point) -> Self {
        Self { id, x: position.x, y: position.y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A raw touch event with the touches still down afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "touches", rename_all = "lowercase")]
pub enum TouchEvent {
    Start(Vec<TouchPoint>),
    Move(Vec<TouchPoint>),
    End(Vec<TouchPoint>),
    Cancel,
}

/// Something the host may want to react to (re-render, persist, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    CameraChanged,
    SelectionChanged { id: Option<ElementId> },
    ElementMoved { id: ElementId, x: f64, y: f64 },
    ElementResized { id: ElementId },
    ElementRotated { id: ElementId, rotation: f64 },
    ElementPlaced { id: ElementId },
    /// A drag or resize finished; the plan is dirty.
    DragEnded { id: ElementId },
}

/// Observable gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    PanningCamera,
    DraggingElement,
    Pinching,
    DraggingHandle,
}

/// What a first touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTarget {
    Handle(HandleKind),
    Element(ElementId),
    Empty,
}

/// Transition table keyed by state, touch count, touch target and tool.
///
/// The target only matters for the first finger; more than two touches
/// never change the state.
pub fn transition(from: GestureState, touch_count: usize, target: TouchTarget, tool: Tool) -> GestureState {
    use GestureState::*;
    match (from, touch_count, target, tool) {
        (_, 0, _, _) => Idle,
        (Idle, 1, TouchTarget::Handle(_), Tool::Select) => DraggingHandle,
        (Idle, 1, TouchTarget::Element(_), Tool::Select) => DraggingElement,
        (Idle, 1, _, _) => PanningCamera,
        (Pinching, 1, _, _) => PanningCamera,
        (state, 1, _, _) => state,
        (_, 2, _, _) => Pinching,
        (state, _, _, _) => state,
    }
}

/// Per-gesture session data. Dropped on release or cancel.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    Panning {
        touch: TouchId,
        start: Point,
        last: Point,
        moved: bool,
        /// Started on empty space, so a tap may place an element.
        on_empty: bool,
    },
    Dragging {
        touch: TouchId,
        start: Point,
        id: ElementId,
        /// Touch world position minus element origin at touch-down.
        grab: Vec2,
        moved: bool,
    },
    Handle {
        touch: TouchId,
        start: Point,
        handle: HandleKind,
        original: Element,
        moved: bool,
    },
    Pinching {
        distance: f64,
        angle: f64,
    },
}

impl Gesture {
    fn state(&self) -> GestureState {
        match self {
            Gesture::Idle => GestureState::Idle,
            Gesture::Panning { .. } => GestureState::PanningCamera,
            Gesture::Dragging { .. } => GestureState::DraggingElement,
            Gesture::Handle { .. } => GestureState::DraggingHandle,
            Gesture::Pinching { .. } => GestureState::Pinching,
        }
    }

    fn tracked_touch(&self) -> Option<TouchId> {
        match self {
            Gesture::Panning { touch, .. } | Gesture::Dragging { touch, .. } | Gesture::Handle { touch, .. } => {
                Some(*touch)
            }
            Gesture::Idle | Gesture::Pinching { .. } => None,
        }
    }
}

/// Two-finger geometry, with touches ordered by id so the angle is stable.
struct PinchFrame {
    distance: f64,
    angle: f64,
    centroid: Point,
}

impl PinchFrame {
    fn from_touches(touches: &[TouchPoint]) -> Option<Self> {
        let [a, b] = touches else {
            return None;
        };
        let (a, b) = if a.id <= b.id { (a, b) } else { (b, a) };
        let span = b.position() - a.position();
        Some(Self {
            distance: span.hypot(),
            angle: span.atan2(),
            centroid: a.position().midpoint(b.position()),
        })
    }
}

/// Wrap an angle difference into `[-PI, PI]`.
fn wrap_angle(delta: f64) -> f64 {
    (delta + PI).rem_euclid(TAU) - PI
}

/// Turns touch events into camera and element mutations.
#[derive(Debug, Clone)]
pub struct GestureController {
    gesture: Gesture,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self { gesture: Gesture::Idle }
    }

    pub fn state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Feed one touch event. Returns what changed.
    pub fn handle(&mut self, editor: &mut Editor, event: TouchEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        let before = self.state();
        match event {
            TouchEvent::Start(touches) => self.on_start(editor, &touches, &mut effects),
            TouchEvent::Move(touches) => self.on_move(editor, &touches, &mut effects),
            TouchEvent::End(touches) => self.on_end(editor, &touches, &mut effects),
            TouchEvent::Cancel => self.on_cancel(editor, &mut effects),
        }
        let after = self.state();
        if before != after {
            log::debug!("gesture {:?} -> {:?}", before, after);
        }
        effects
    }

    fn on_start(&mut self, editor: &mut Editor, touches: &[TouchPoint], effects: &mut Vec<Effect>) {
        match touches {
            [] => log::warn!("touch start without touches"),
            [touch] => {
                if self.is_active() {
                    // The previous gesture never saw its release.
                    self.finish(editor, false, effects);
                }
                self.begin_single(editor, *touch, effects);
            }
            [_, _] => {
                if transition(self.state(), 2, TouchTarget::Empty, editor.tool()) == GestureState::Pinching {
                    self.end_drag(editor, effects);
                    self.begin_pinch(touches);
                }
            }
            _ => log::debug!("ignoring {} simultaneous touches", touches.len()),
        }
    }

    fn on_cancel(&mut self, editor: &mut Editor, effects: &mut Vec<Effect>) {
        if transition(self.state(), 0, TouchTarget::Empty, editor.tool()) == GestureState::Idle {
            self.finish(editor, false, effects);
        }
    }

    fn target_at(editor: &Editor, point: Point) -> TouchTarget {
        if editor.tool() == Tool::Select {
            if let Some(handle) = editor.handle_at(point) {
                return TouchTarget::Handle(handle);
            }
        }
        match editor.hit_test(point) {
            Some(id) => TouchTarget::Element(id),
            None => TouchTarget::Empty,
        }
    }

    fn begin_single(&mut self, editor: &mut Editor, touch: TouchPoint, effects: &mut Vec<Effect>) {
        let point = touch.position();
        let target = Self::target_at(editor, point);
        let next = transition(self.state(), 1, target, editor.tool());

        self.gesture = match (next, target) {
            (GestureState::DraggingHandle, TouchTarget::Handle(handle)) => match editor.selected_element().cloned() {
                Some(original) => Gesture::Handle { touch: touch.id, start: point, handle, original, moved: false },
                None => Self::begin_pan(editor, touch, false, effects),
            },
            (GestureState::DraggingElement, TouchTarget::Element(id)) => match editor.element(id).map(Element::origin) {
                Some(origin) => {
                    let grab = editor.camera().screen_to_world(point) - origin;
                    Self::select(editor, Some(id), effects);
                    Gesture::Dragging { touch: touch.id, start: point, id, grab, moved: false }
                }
                None => Self::begin_pan(editor, touch, false, effects),
            },
            _ => Self::begin_pan(editor, touch, target == TouchTarget::Empty, effects),
        };
    }

    fn begin_pan(editor: &mut Editor, touch: TouchPoint, on_empty: bool, effects: &mut Vec<Effect>) -> Gesture {
        Self::select(editor, None, effects);
        let point = touch.position();
        Gesture::Panning { touch: touch.id, start: point, last: point, moved: false, on_empty }
    }

    fn begin_pinch(&mut self, touches: &[TouchPoint]) {
        if let Some(frame) = PinchFrame::from_touches(touches) {
            self.gesture = Gesture::Pinching { distance: frame.distance, angle: frame.angle };
        }
    }

    fn select(editor: &mut Editor, id: Option<ElementId>, effects: &mut Vec<Effect>) {
        if editor.selection() != id {
            editor.set_selection(id);
            effects.push(Effect::SelectionChanged { id });
        }
    }

    fn on_move(&mut self, editor: &mut Editor, touches: &[TouchPoint], effects: &mut Vec<Effect>) {
        if touches.len() > 2 {
            return;
        }
        if let Gesture::Pinching { distance, angle } = &mut self.gesture {
            let Some(frame) = PinchFrame::from_touches(touches) else {
                return;
            };
            let distance_delta = frame.distance - *distance;
            let angle_delta = wrap_angle(frame.angle - *angle);
            *distance = frame.distance;
            *angle = frame.angle;
            // Zoom only when the fingers spread more than they twist.
            if distance_delta.abs() > angle_delta.abs() * frame.distance {
                let zoom = editor.camera().zoom + distance_delta * editor.config().pinch_sensitivity;
                if editor.camera_mut().zoom_at(frame.centroid, zoom) {
                    effects.push(Effect::CameraChanged);
                }
            }
            return;
        }

        let Some(tracked) = self.gesture.tracked_touch() else {
            return;
        };
        let Some(point) = touches.iter().find(|t| t.id == tracked).map(TouchPoint::position) else {
            return;
        };
        let config = editor.config().clone();

        match &mut self.gesture {
            Gesture::Panning { start, last, moved, .. } => {
                let delta = point - *last;
                *last = point;
                if (point - *start).hypot() > config.drag_threshold_px {
                    *moved = true;
                }
                if delta != Vec2::ZERO {
                    editor.camera_mut().pan(delta);
                    effects.push(Effect::CameraChanged);
                }
            }
            Gesture::Dragging { start, id, grab, moved, .. } => {
                if !*moved {
                    if (point - *start).hypot() <= config.drag_threshold_px {
                        return;
                    }
                    *moved = true;
                    editor.push_undo();
                }
                let origin = snap_to_grid(editor.camera().screen_to_world(point) - *grab, config.grid_size);
                let current = editor.element(*id).map(|e| e.origin());
                if current != Some(origin) {
                    match editor.move_element_untracked(*id, origin) {
                        Ok(()) => effects.push(Effect::ElementMoved { id: *id, x: origin.x, y: origin.y }),
                        Err(err) => log::warn!("drag target vanished: {}", err),
                    }
                }
            }
            Gesture::Handle { start, handle, original, moved, .. } => {
                let past_threshold = (point - *start).hypot() > config.handle_drag_threshold_px;
                if !*moved {
                    if !past_threshold {
                        return;
                    }
                    *moved = true;
                    if handle.is_resize() {
                        editor.push_undo();
                    }
                }
                let rate = config.handle_rate(editor.camera().zoom);
                if let Some(patch) = selection::resize_from_handle(original, *handle, point - *start, rate) {
                    match editor.apply_patch_untracked(original.id, &patch) {
                        Ok(()) => effects.push(Effect::ElementResized { id: original.id }),
                        Err(err) => log::warn!("resize target vanished: {}", err),
                    }
                }
            }
            Gesture::Idle | Gesture::Pinching { .. } => {}
        }
    }

    fn on_end(&mut self, editor: &mut Editor, touches: &[TouchPoint], effects: &mut Vec<Effect>) {
        let from = self.state();
        let count = match touches {
            // A lone finger we aren't following counts as a full release.
            [remaining] if from != GestureState::Pinching && self.gesture.tracked_touch() != Some(remaining.id) => 0,
            _ => touches.len(),
        };
        if count > 2 {
            return;
        }
        let next = transition(from, count, TouchTarget::Empty, editor.tool());
        match (next, touches) {
            (GestureState::Idle, _) => self.finish(editor, true, effects),
            (GestureState::PanningCamera, [remaining]) if from == GestureState::Pinching => {
                // Keep panning with the finger that stayed down.
                let point = remaining.position();
                self.gesture = Gesture::Panning {
                    touch: remaining.id,
                    start: point,
                    last: point,
                    moved: true,
                    on_empty: false,
                };
            }
            (GestureState::Pinching, [_, _]) => {
                self.end_drag(editor, effects);
                self.begin_pinch(touches);
            }
            _ => {}
        }
    }

    /// Close an element drag or resize in progress, if any.
    fn end_drag(&mut self, editor: &mut Editor, effects: &mut Vec<Effect>) {
        let ended = match &self.gesture {
            Gesture::Dragging { id, moved: true, .. } => Some(*id),
            Gesture::Handle { original, handle, moved: true, .. } if handle.is_resize() => Some(original.id),
            _ => None,
        };
        if let Some(id) = ended {
            editor.mark_dirty();
            effects.push(Effect::DragEnded { id });
            log::info!("drag ended on {}", id);
        }
        self.gesture = Gesture::Idle;
    }

    /// Release or cancel: apply tap actions (release only) and reset.
    fn finish(&mut self, editor: &mut Editor, release: bool, effects: &mut Vec<Effect>) {
        if release {
            match &self.gesture {
                Gesture::Handle { handle: HandleKind::Rotate, original, moved: false, .. } => {
                    match editor.rotate_element(original.id) {
                        Ok(rotation) => effects.push(Effect::ElementRotated { id: original.id, rotation }),
                        Err(err) => log::warn!("rotate failed: {}", err),
                    }
                }
                Gesture::Panning { moved: false, on_empty: true, last, .. } => {
                    if let Tool::Place(kind) = editor.tool() {
                        let world = editor.camera().screen_to_world(*last);
                        match editor.place_element(kind, world) {
                            Ok(id) => {
                                effects.push(Effect::ElementPlaced { id });
                                effects.push(Effect::SelectionChanged { id: Some(id) });
                            }
                            Err(err) => log::warn!("placement failed: {}", err),
                        }
                    }
                }
                _ => {}
            }
        }
        self.end_drag(editor, effects);
    }
}
