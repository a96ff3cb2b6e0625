//! Integration tests for gesture routing, box selection, and the
//! start-state-relative manipulation math.

use glam::Vec2;

use stage_editor::fixtures::{nested_group, three_sprites};
use stage_editor::manipulator::MIN_GIZMO_RADIUS;
use stage_editor::{DragKind, GestureEvent, GizmoHandle, TestHarness, VirtualModifier};

/// Honors RUST_LOG when debugging a failing gesture test.
fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_drag_moves_selection_by_exact_delta() {
    trace_init();
    let (mut h, [a, _, _]) = three_sprites();
    h.drag((0.0, 0.0), (25.0, -10.0));
    assert_eq!(h.position(&a), Vec2::new(25.0, -10.0));
    // One history state for the whole drag.
    assert!(h.editor.can_undo());
    h.editor.undo();
    assert_eq!(h.position(&a), Vec2::ZERO);
}

#[test]
fn test_drag_moves_whole_selection() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);

    // Grab a; b follows with the same delta.
    h.drag((0.0, 0.0), (5.0, 5.0));
    assert_eq!(h.position(&a), Vec2::new(5.0, 5.0));
    assert_eq!(h.position(&b), Vec2::new(45.0, 5.0));
}

#[test]
fn test_drag_unselected_node_makes_it_sole_selection() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.drag((40.0, 0.0), (50.0, 0.0));
    assert_eq!(h.selected_ids(), vec![b.clone()]);
    assert_eq!(h.position(&a), Vec2::ZERO);
    assert_eq!(h.position(&b), Vec2::new(50.0, 0.0));
}

#[test]
fn test_axis_lock_snaps_move() {
    let (mut h, [a, _, _]) = three_sprites();
    h.set_modifier(VirtualModifier::LockToInterval, true);
    h.drag((0.0, 0.0), (30.0, 8.0));
    assert_eq!(h.position(&a), Vec2::new(30.0, 0.0));

    // Tiny deltas collapse to zero instead of an axis.
    h.drag((27.0, 0.0), (28.0, 1.0));
    assert_eq!(h.position(&a), Vec2::new(30.0, 0.0));
}

#[test]
fn test_box_selection_scenario() {
    let (mut h, [a, b, c]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);

    // Box over b and c: covers one selected and one unselected child.
    h.drag((30.0, -20.0), (90.0, 20.0));
    let mut expected = vec![a.clone(), b.clone(), c.clone()];
    expected.sort();
    assert_eq!(h.selected_ids(), expected);
}

#[test]
fn test_box_selection_invert_scenario() {
    let (mut h, [a, b, c]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);

    h.set_modifier(VirtualModifier::InvertBoxSelection, true);
    h.drag((30.0, -20.0), (90.0, 20.0));
    // Covered-and-selected b flips off, covered-and-unselected c flips on,
    // uncovered a keeps its start membership.
    let mut expected = vec![a.clone(), c.clone()];
    expected.sort();
    assert_eq!(h.selected_ids(), expected);
}

#[test]
fn test_box_selection_invert_twice_restores_original() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);
    let original = h.selected_ids();

    h.set_modifier(VirtualModifier::InvertBoxSelection, true);
    h.drag((30.0, -20.0), (90.0, 20.0));
    assert_ne!(h.selected_ids(), original);
    h.drag((30.0, -20.0), (90.0, 20.0));
    assert_eq!(h.selected_ids(), original);
}

#[test]
fn test_box_selection_does_not_save_history() {
    let (mut h, _) = three_sprites();
    let states = h.editor.history_len();
    h.drag((-50.0, -50.0), (200.0, 50.0));
    assert_eq!(h.editor.history_len(), states);
    assert_eq!(h.selected_ids().len(), 3);
}

#[test]
fn test_locked_node_silently_excluded() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.scene.find_mut(&a).unwrap().locked = true;

    // Tap select, box select, and drag all skip the locked node quietly.
    h.tap(0.0, 0.0);
    assert!(h.selected_ids().is_empty());

    h.drag((-20.0, -20.0), (20.0, 20.0));
    assert!(h.selected_ids().is_empty());
    assert_eq!(h.position(&a), Vec2::ZERO);
}

#[test]
fn test_tap_toggle_with_append_modifier() {
    let (mut h, [a, b, _]) = three_sprites();
    h.tap(0.0, 0.0);
    assert_eq!(h.selected_ids(), vec![a.clone()]);

    h.set_modifier(VirtualModifier::AppendSelection, true);
    h.tap(40.0, 0.0);
    assert_eq!(h.selected_ids().len(), 2);
    h.tap(0.0, 0.0);
    assert_eq!(h.selected_ids(), vec![b.clone()]);

    // Without append, tapping empty space deselects everything.
    h.set_modifier(VirtualModifier::AppendSelection, false);
    h.tap(300.0, 300.0);
    assert!(h.selected_ids().is_empty());
}

#[test]
fn test_tap_on_selected_node_toggles_it_off() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);

    // No modifier held: the tapped member drops out, the rest stay.
    h.tap(0.0, 0.0);
    assert!(!h.editor.selection.is_selected(&a));
    assert!(h.editor.selection.is_selected(&b));
}

#[test]
fn test_space_tap_deselects_even_with_append_held() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.set_modifier(VirtualModifier::AppendSelection, true);
    h.tap(300.0, 300.0);
    assert!(h.selected_ids().is_empty());
    assert!(h.editor.scene.contains(&a));
}

#[test]
fn test_double_tap_edits_into_group_and_back() {
    let (mut h, group, inner) = nested_group();
    let root = h.editor.scene.root.id.clone();

    // The group sits at (100, 50) in root space.
    h.double_tap(100.0, 50.0);
    assert_eq!(h.editor.edited(), &group);

    // Inside the group, its child is at the local origin, view (100, 50).
    h.tap(100.0, 50.0);
    assert_eq!(h.selected_ids(), vec![inner.clone()]);

    h.double_tap(500.0, 500.0);
    assert_eq!(h.editor.edited(), &root);
}

#[test]
fn test_drag_inside_group_moves_in_subject_space() {
    let (mut h, group, inner) = nested_group();
    h.double_tap(100.0, 50.0);
    assert_eq!(h.editor.edited(), &group);

    h.drag((100.0, 50.0), (110.0, 50.0));
    // Ten view units equal ten subject units here, measured from the
    // group-local origin.
    assert!((h.position(&inner) - Vec2::new(10.0, 0.0)).length() < 1e-3);
}

#[test]
fn test_gizmo_rotation_orbits_selection() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.editor.selection.select(&h.editor.scene, &b);
    // Corner cloud of a and b centers at (20, 0).
    let center = Vec2::new(20.0, 0.0);

    h.gizmo_drag(
        GizmoHandle::Rotate,
        (center.x + 50.0, center.y),
        (center.x, center.y + 50.0),
    );

    let a_t = h.node(&a).transform;
    let b_t = h.node(&b).transform;
    assert!((a_t.rotation_degrees - 90.0).abs() < 1e-3);
    assert!((a_t.position - Vec2::new(20.0, -20.0)).length() < 1e-3);
    assert!((b_t.position - Vec2::new(20.0, 20.0)).length() < 1e-3);
}

#[test]
fn test_identity_rotation_gesture_is_bitwise_noop() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.scene.find_mut(&a).unwrap().transform.position = Vec2::new(17.3, -4.9);
    h.editor.scene.find_mut(&a).unwrap().transform.rotation_degrees = 31.25;
    h.editor.select_sole(&a);
    let before = h.node(&a).transform;

    let start = (17.3 + MIN_GIZMO_RADIUS, -4.9);
    h.event(GestureEvent::GizmoDragBegin {
        handle: GizmoHandle::Rotate,
        pos: Vec2::new(start.0, start.1),
    });
    // Swing away and come back to the exact start angle.
    h.event(GestureEvent::GizmoDragMove {
        pos: Vec2::new(17.3, -4.9 + MIN_GIZMO_RADIUS),
    });
    h.event(GestureEvent::GizmoDragMove {
        pos: Vec2::new(start.0, start.1),
    });
    h.event(GestureEvent::GizmoDragEnd {
        pos: Vec2::new(start.0, start.1),
    });

    let after = h.node(&a).transform;
    assert_eq!(before.position, after.position);
    assert_eq!(before.rotation_degrees, after.rotation_degrees);
}

#[test]
fn test_identity_scale_gesture_is_bitwise_noop() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.scene.find_mut(&a).unwrap().transform.scale = Vec2::new(1.5, 0.75);
    h.editor.select_sole(&a);
    let before = h.node(&a).transform;

    let grip = Vec2::new(MIN_GIZMO_RADIUS, 0.0);
    h.event(GestureEvent::GizmoDragBegin {
        handle: GizmoHandle::Scale,
        pos: grip,
    });
    h.event(GestureEvent::GizmoDragMove { pos: grip * 2.0 });
    h.event(GestureEvent::GizmoDragMove { pos: grip });
    h.event(GestureEvent::GizmoDragEnd { pos: grip });

    let after = h.node(&a).transform;
    assert_eq!(before.position, after.position);
    assert_eq!(before.scale, after.scale);
}

#[test]
fn test_gizmo_scale_snapping() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.set_modifier(VirtualModifier::LockToInterval, true);

    let grip = Vec2::new(MIN_GIZMO_RADIUS, 0.0);
    // 1.4x raw ratio snaps to 1.5.
    h.gizmo_drag(GizmoHandle::Scale, (grip.x, grip.y), (grip.x * 1.4, 0.0));
    assert_eq!(h.node(&a).transform.scale, Vec2::splat(1.5));
}

#[test]
fn test_gizmo_delete_removes_selection() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.gizmo_drag(GizmoHandle::Delete, (0.0, 0.0), (0.0, 0.0));
    assert!(!h.editor.scene.contains(&a));
    assert!(h.editor.scene.contains(&b));
    assert!(h.editor.can_undo());
}

#[test]
fn test_gizmo_tap_delete_removes_selection() {
    let (mut h, [a, b, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.event(GestureEvent::GizmoTapped {
        handle: GizmoHandle::Delete,
        pos: Vec2::ZERO,
    });
    assert!(!h.editor.scene.contains(&a));
    assert!(h.editor.scene.contains(&b));
}

#[test]
fn test_gizmo_tap_other_handles_is_noop() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.select_sole(&a);
    let history = h.editor.history_len();
    h.event(GestureEvent::GizmoTapped {
        handle: GizmoHandle::Rotate,
        pos: Vec2::ZERO,
    });
    assert!(h.editor.scene.contains(&a));
    assert_eq!(h.editor.history_len(), history);
}

#[test]
fn test_tear_away_drags_the_copy() {
    let (mut h, [a, _, _]) = three_sprites();
    h.editor.select_sole(&a);
    h.set_modifier(VirtualModifier::TearAwayCopy, true);

    let before = h.node_count();
    let states = h.editor.history_len();
    h.drag((0.0, 0.0), (15.0, 15.0));
    assert_eq!(h.node_count(), before + 1);
    // The original stays put; the selected copy moved.
    assert_eq!(h.position(&a), Vec2::ZERO);
    let copy = h.selected_ids()[0].clone();
    assert_ne!(copy, a);
    assert_eq!(h.position(&copy), Vec2::new(15.0, 15.0));

    // The copy and its move are one undo step.
    assert_eq!(h.editor.history_len(), states + 1);
    h.editor.undo();
    assert_eq!(h.node_count(), before);
    assert!(!h.editor.scene.contains(&copy));
}

#[test]
fn test_camera_pan_drag() {
    let (mut h, _) = three_sprites();
    h.set_modifier(VirtualModifier::CameraPan, true);
    h.drag((200.0, 200.0), (240.0, 200.0));
    assert_eq!(h.editor.view.pan, Vec2::new(-40.0, 0.0));
    // Camera moves are not undoable actions.
    assert_eq!(h.editor.history_len(), 4);
}

#[test]
fn test_wheel_zoom_keeps_anchor() {
    let (mut h, _) = three_sprites();
    let anchor = Vec2::new(80.0, 0.0);
    let before = h.editor.view.view_to_global_point(anchor);
    h.event(GestureEvent::Wheel {
        pos: anchor,
        delta: 3.0,
    });
    let after = h.editor.view.view_to_global_point(anchor);
    assert!((before - after).length() < 1e-3);
    assert!(h.editor.view.zoom > 1.0);
}

#[test]
fn test_new_gesture_force_ends_stale_drag() {
    let (mut h, [a, b, _]) = three_sprites();
    h.event(GestureEvent::DragBegin {
        pos: Vec2::ZERO,
    });
    h.event(GestureEvent::DragMove {
        pos: Vec2::new(10.0, 0.0),
    });
    assert_eq!(h.manipulator.current_drag_kind(), Some(DragKind::Subject));

    // The end event never arrives; a new drag finalizes the old one.
    h.event(GestureEvent::DragBegin {
        pos: Vec2::new(40.0, 0.0),
    });
    assert!(!h.editor.selection.is_selected(&a));
    assert!(h.editor.selection.is_selected(&b));
    assert_eq!(h.position(&a), Vec2::new(10.0, 0.0));
    h.event(GestureEvent::TouchEndedAnywhere);
    assert!(h.manipulator.current_drag_kind().is_none());
    assert!(!h.editor.is_changing());
}

#[test]
fn test_nodes_created_mid_box_drag_count_as_unselected() {
    let (mut h, _) = three_sprites();
    h.set_modifier(VirtualModifier::InvertBoxSelection, true);
    h.event(GestureEvent::DragBegin {
        pos: Vec2::new(-30.0, -30.0),
    });
    // A node appears while the box is open (for example via a command).
    let late = {
        let mut sprite = shared::SceneNode::sprite("late", Vec2::splat(10.0));
        sprite.transform.position = Vec2::new(-10.0, -10.0);
        let id = sprite.id.clone();
        let root = h.editor.scene.root.id.clone();
        h.editor.scene.add_child(&root, sprite).unwrap();
        id
    };
    h.event(GestureEvent::DragMove {
        pos: Vec2::new(-5.0, -5.0),
    });
    // Not in the start snapshot, covered, invert on: it selects.
    assert!(h.editor.selection.is_selected(&late));
    h.event(GestureEvent::DragEnd {
        pos: Vec2::new(-5.0, -5.0),
    });
}

#[test]
fn test_gizmo_drag_without_selection_is_ignored() {
    let mut h = TestHarness::new();
    h.gizmo_drag(GizmoHandle::Rotate, (10.0, 0.0), (0.0, 10.0));
    assert!(h.manipulator.current_drag_kind().is_none());
    assert!(!h.editor.is_changing());
}
