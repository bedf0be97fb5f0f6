//! End-to-end touch scenarios driven through the public API.

use floorplan_core::{
    Edge, Effect, Element, ElementKind, ElementType, Editor, GestureController, GestureState, GRID_SIZE, HandleKind,
    TouchEvent, TouchPoint,
};
use kurbo::{Point, Vec2};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn one(x: f64, y: f64) -> Vec<TouchPoint> {
    vec![TouchPoint::new(1, pt(x, y))]
}

fn two(a: Point, b: Point) -> Vec<TouchPoint> {
    vec![TouchPoint::new(1, a), TouchPoint::new(2, b)]
}

fn zone_editor() -> (Editor, floorplan_core::ElementId) {
    let mut editor = Editor::default();
    let zone = Element::new(ElementType::Zone, Point::ZERO).with_kind(ElementKind::Zone { width: 10.0, depth: 10.0 });
    let id = editor.add_element(zone).unwrap();
    (editor, id)
}

#[test]
fn test_pinch_doubles_zoom_around_zone_center() {
    let (mut editor, id) = zone_editor();
    let mut gestures = GestureController::new();
    let center = editor.camera().world_to_screen(editor.element(id).unwrap().center());
    assert_eq!(center, pt(50.0, 50.0));

    gestures.handle(&mut editor, TouchEvent::Start(two(center - Vec2::new(50.0, 0.0), center + Vec2::new(50.0, 0.0))));
    gestures.handle(&mut editor, TouchEvent::Move(two(center - Vec2::new(100.0, 0.0), center + Vec2::new(100.0, 0.0))));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));

    assert!((editor.camera().zoom - 2.0).abs() < 1e-9);
    let zone = editor.element(id).unwrap();
    let after = editor.camera().world_to_screen(zone.center());
    assert!((after - center).hypot() < 1e-9);
    let screen = editor.camera().world_rect_to_screen(zone.bounding_box());
    assert!((screen.width() - 200.0).abs() < 1e-9);
    assert!((screen.height() - 200.0).abs() < 1e-9);
}

#[test]
fn test_rotate_taps_return_rack_to_start() {
    let mut editor = Editor::default();
    let rack = Element::new(ElementType::Rack, pt(5.0, 5.0))
        .with_kind(ElementKind::Rack { width: 8.0, depth: 4.0, levels: 4, bins_per_shelf: 3 });
    let id = editor.add_element(rack).unwrap();
    editor.select_element(Some(id)).unwrap();
    let mut gestures = GestureController::new();

    // A 45 degree step per tap: eight taps make a full turn.
    for _ in 0..8 {
        let rotate = editor
            .selection_handles()
            .into_iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap()
            .position;
        gestures.handle(&mut editor, TouchEvent::Start(vec![TouchPoint::new(7, rotate)]));
        let effects = gestures.handle(&mut editor, TouchEvent::End(vec![]));
        assert!(matches!(effects.as_slice(), [Effect::ElementRotated { .. }]));
    }
    let rotation = editor.element(id).unwrap().rotation;
    assert!(rotation.rem_euclid(360.0).abs() < 1e-9);
}

#[test]
fn test_drag_snaps_to_grid_cells() {
    let (mut editor, id) = zone_editor();
    let mut gestures = GestureController::new();
    gestures.handle(&mut editor, TouchEvent::Start(one(50.0, 50.0)));
    assert_eq!(gestures.state(), GestureState::DraggingElement);
    // Wobble on the way, end 3 cells right and 2 down.
    gestures.handle(&mut editor, TouchEvent::Move(one(53.3, 51.7)));
    gestures.handle(&mut editor, TouchEvent::Move(one(58.9, 57.2)));
    gestures.handle(&mut editor, TouchEvent::Move(one(65.4, 60.3)));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));

    let origin = editor.element(id).unwrap().origin();
    assert_eq!(origin, pt(3.0 * GRID_SIZE, 2.0 * GRID_SIZE));
    assert!(editor.take_dirty());
}

#[test]
fn test_resize_never_below_minimum() {
    let (mut editor, id) = zone_editor();
    editor.select_element(Some(id)).unwrap();
    let mut gestures = GestureController::new();
    gestures.handle(&mut editor, TouchEvent::Start(one(100.0, 100.0)));
    gestures.handle(&mut editor, TouchEvent::Move(one(-5000.0, -5000.0)));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));
    let zone = editor.element(id).unwrap();
    assert!(zone.footprint().width >= floorplan_core::constants::MIN_DIMENSION);
    assert!(zone.footprint().height >= floorplan_core::constants::MIN_DIMENSION);
    assert_eq!(zone.origin(), Point::ZERO);
}

#[test]
fn test_tap_empty_deselects() {
    let (mut editor, id) = zone_editor();
    let mut gestures = GestureController::new();
    gestures.handle(&mut editor, TouchEvent::Start(one(20.0, 20.0)));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));
    assert_eq!(editor.selection(), Some(id));

    let effects = gestures.handle(&mut editor, TouchEvent::Start(one(400.0, 400.0)));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));
    assert_eq!(effects, vec![Effect::SelectionChanged { id: None }]);
    assert_eq!(editor.selection(), None);
}

#[test]
fn test_rotated_element_hit_testing_through_editor() {
    let mut editor = Editor::default();
    let zone = Element::new(ElementType::Zone, Point::ZERO)
        .with_kind(ElementKind::Zone { width: 10.0, depth: 10.0 })
        .with_rotation(45.0);
    let id = editor.add_element(zone).unwrap();
    assert_eq!(editor.hit_test(pt(50.0, 50.0)), Some(id));
    assert_eq!(editor.hit_test(pt(3.0, 3.0)), None);
}

#[test]
fn test_turned_rack_edge_drag_resizes_along_screen_axis() {
    let mut editor = Editor::default();
    let rack = Element::new(ElementType::Rack, pt(5.0, 5.0))
        .with_kind(ElementKind::Rack { width: 10.0, depth: 4.0, levels: 4, bins_per_shelf: 3 });
    let id = editor.add_element(rack).unwrap();
    editor.select_element(Some(id)).unwrap();
    let mut gestures = GestureController::new();
    let handle_at = |editor: &Editor, kind: HandleKind| {
        editor.selection_handles().into_iter().find(|h| h.kind == kind).unwrap().position
    };

    for _ in 0..2 {
        let rotate = handle_at(&editor, HandleKind::Rotate);
        gestures.handle(&mut editor, TouchEvent::Start(vec![TouchPoint::new(1, rotate)]));
        gestures.handle(&mut editor, TouchEvent::End(vec![]));
    }
    assert!((editor.element(id).unwrap().rotation - 90.0).abs() < 1e-9);

    let screen_box = |editor: &Editor| {
        let element = editor.element(id).unwrap();
        editor.camera().world_rect_to_screen(element.bounding_box())
    };
    let before = screen_box(&editor);
    let right = handle_at(&editor, HandleKind::Edge(Edge::Right));
    gestures.handle(&mut editor, TouchEvent::Start(vec![TouchPoint::new(1, right)]));
    gestures.handle(&mut editor, TouchEvent::Move(vec![TouchPoint::new(1, right + Vec2::new(20.0, 0.0))]));
    gestures.handle(&mut editor, TouchEvent::End(vec![]));

    let after = screen_box(&editor);
    assert!((after.x0 - before.x0).abs() < 1e-9);
    assert!((after.width() - (before.width() + 10.0)).abs() < 1e-9);
    assert!((after.y0 - before.y0).abs() < 1e-9);
    assert!((after.height() - before.height()).abs() < 1e-9);
}
