//! Gesture classification and routing.
//!
//! An upstream debounce turns raw touches into exactly one `Tapped` or one
//! `DragBegin → DragMove* → DragEnd` run. The router decides what a gesture
//! means from its target and the live modifier keys, then drives selection,
//! the camera, box selection, or a manipulation session. History is recorded
//! once per completed gesture, never per frame.

mod gizmo;
mod session;

pub use gizmo::{selection_gizmo, GizmoCircle, MAX_GIZMO_RADIUS, MIN_GIZMO_RADIUS};
pub use session::{ManipulationSession, StartState, AXIS_LOCK_DEAD_ZONE};

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use shared::{NodeId, Rect};

use crate::editor::Editor;
use crate::input::{ModifierKeys, VirtualModifier};
use session::{snap_to_interval, snap_to_major_axis};

/// Rotation drags snap to multiples of this when lock-to-interval is held.
pub const ROTATION_SNAP_DEGREES: f32 = 45.0;
/// Scale drags snap to multiples of this when lock-to-interval is held.
pub const SCALE_SNAP_STEP: f32 = 0.5;
/// A snapped scale never drops below this.
pub const MIN_SNAPPED_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoHandle {
    Rotate,
    Scale,
    Delete,
}

/// Input events after upstream tap/drag disambiguation. Positions are in
/// view space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    Tapped { pos: Vec2, count: u32 },
    DragBegin { pos: Vec2 },
    DragMove { pos: Vec2 },
    DragEnd { pos: Vec2 },
    GizmoDragBegin { handle: GizmoHandle, pos: Vec2 },
    GizmoDragMove { pos: Vec2 },
    GizmoDragEnd { pos: Vec2 },
    GizmoTapped { handle: GizmoHandle, pos: Vec2 },
    /// Global end-of-touch notification; finalizes any gesture still open.
    TouchEndedAnywhere,
    Wheel { pos: Vec2, delta: f32 },
}

/// What kind of drag is currently open, for callers that render feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Subject,
    Camera,
    BoxSelect,
    GizmoRotate,
    GizmoScale,
    GizmoDelete,
}

enum ActiveDrag {
    Camera {
        last_view: Vec2,
    },
    Subject {
        start_subject: Vec2,
        session: ManipulationSession,
    },
    BoxSelect {
        start_view: Vec2,
        start_selection: HashSet<NodeId>,
    },
    GizmoRotate {
        center_view: Vec2,
        center_subject: Vec2,
        start_angle: f32,
        session: ManipulationSession,
    },
    GizmoScale {
        center_view: Vec2,
        center_subject: Vec2,
        start_radius: f32,
        session: ManipulationSession,
    },
    GizmoDelete,
}

/// The gesture router. Holds at most one open drag.
#[derive(Default)]
pub struct Manipulator {
    drag: Option<ActiveDrag>,
}

impl Manipulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_drag_kind(&self) -> Option<DragKind> {
        self.drag.as_ref().map(|d| match d {
            ActiveDrag::Camera { .. } => DragKind::Camera,
            ActiveDrag::Subject { .. } => DragKind::Subject,
            ActiveDrag::BoxSelect { .. } => DragKind::BoxSelect,
            ActiveDrag::GizmoRotate { .. } => DragKind::GizmoRotate,
            ActiveDrag::GizmoScale { .. } => DragKind::GizmoScale,
            ActiveDrag::GizmoDelete => DragKind::GizmoDelete,
        })
    }

    pub fn handle_event(
        &mut self,
        editor: &mut Editor,
        modifiers: &dyn ModifierKeys,
        event: GestureEvent,
    ) {
        match event {
            GestureEvent::Tapped { pos, count } => {
                self.force_end(editor);
                self.on_tapped(editor, modifiers, pos, count);
            }
            GestureEvent::DragBegin { pos } => {
                self.force_end(editor);
                self.on_drag_begin(editor, modifiers, pos);
            }
            GestureEvent::GizmoDragBegin { handle, pos } => {
                self.force_end(editor);
                self.on_gizmo_begin(editor, handle, pos);
            }
            GestureEvent::DragMove { pos } | GestureEvent::GizmoDragMove { pos } => {
                self.on_drag_move(editor, modifiers, pos);
            }
            GestureEvent::DragEnd { pos } | GestureEvent::GizmoDragEnd { pos } => {
                self.on_drag_end(editor, pos);
            }
            GestureEvent::GizmoTapped { handle, pos: _ } => {
                self.force_end(editor);
                // Only the delete handle reacts to a bare tap.
                if handle == GizmoHandle::Delete && selection_gizmo(editor).is_some() {
                    editor.delete_selected();
                }
            }
            GestureEvent::TouchEndedAnywhere => self.force_end(editor),
            GestureEvent::Wheel { pos, delta } => {
                editor.zoom_view_about(pos, 1.1_f32.powf(delta));
            }
        }
    }

    /// Finalize a drag that never got its end event. An open session commits
    /// like a normal completion; a stale delete drag is dropped unfired.
    pub fn force_end(&mut self, editor: &mut Editor) {
        match self.drag.take() {
            Some(
                ActiveDrag::Subject { session, .. }
                | ActiveDrag::GizmoRotate { session, .. }
                | ActiveDrag::GizmoScale { session, .. },
            ) => {
                tracing::debug!("force-ending stale manipulation");
                session.end(editor);
                editor.save_history_state();
            }
            Some(_) | None => {}
        }
    }

    fn on_tapped(
        &mut self,
        editor: &mut Editor,
        modifiers: &dyn ModifierKeys,
        pos: Vec2,
        count: u32,
    ) {
        let hit = editor.pick(pos);
        if count >= 2 {
            match hit {
                // Double-tapping a leaf falls back to plain selection.
                Some(id) => {
                    if !editor.edit_child(&id) {
                        editor.select_sole(&id);
                    }
                }
                None => {
                    editor.edit_parent();
                }
            }
            return;
        }
        match hit {
            Some(id) => {
                // A tap always toggles its target. Without append, tapping
                // an unselected node replaces the selection first.
                if !modifiers.is_down(VirtualModifier::AppendSelection)
                    && !editor.selection.is_selected(&id)
                {
                    editor.deselect_all();
                }
                editor.toggle_selection(&id);
            }
            None => {
                editor.deselect_all();
            }
        }
    }

    fn on_drag_begin(&mut self, editor: &mut Editor, modifiers: &dyn ModifierKeys, pos: Vec2) {
        match editor.pick(pos) {
            Some(id) => {
                if !editor.selection.is_selected(&id) {
                    if modifiers.is_down(VirtualModifier::AppendSelection) {
                        editor.selection.select(&editor.scene, &id);
                    } else {
                        editor.select_sole(&id);
                    }
                }
                if modifiers.is_down(VirtualModifier::TearAwayCopy) {
                    // On failure the drag proceeds on the originals.
                    let _ = editor.duplicate_selected();
                }
                let start_subject = editor.spaces().view_to_subject_point(pos);
                let session = ManipulationSession::begin(editor);
                self.drag = Some(ActiveDrag::Subject {
                    start_subject,
                    session,
                });
            }
            None => {
                if modifiers.is_down(VirtualModifier::CameraPan) {
                    self.drag = Some(ActiveDrag::Camera { last_view: pos });
                } else {
                    self.drag = Some(ActiveDrag::BoxSelect {
                        start_view: pos,
                        start_selection: editor.selection.snapshot(),
                    });
                }
            }
        }
    }

    fn on_gizmo_begin(&mut self, editor: &mut Editor, handle: GizmoHandle, pos: Vec2) {
        let circle = match selection_gizmo(editor) {
            Some(circle) => circle,
            None => return,
        };
        match handle {
            GizmoHandle::Delete => {
                self.drag = Some(ActiveDrag::GizmoDelete);
            }
            GizmoHandle::Rotate => {
                let center_subject = editor.spaces().view_to_subject_point(circle.center);
                let start_angle = gizmo::angle_about(circle.center, pos);
                let session = ManipulationSession::begin(editor);
                self.drag = Some(ActiveDrag::GizmoRotate {
                    center_view: circle.center,
                    center_subject,
                    start_angle,
                    session,
                });
            }
            GizmoHandle::Scale => {
                let center_subject = editor.spaces().view_to_subject_point(circle.center);
                let start_radius = (pos - circle.center).length().max(1.0);
                let session = ManipulationSession::begin(editor);
                self.drag = Some(ActiveDrag::GizmoScale {
                    center_view: circle.center,
                    center_subject,
                    start_radius,
                    session,
                });
            }
        }
    }

    fn on_drag_move(&mut self, editor: &mut Editor, modifiers: &dyn ModifierKeys, pos: Vec2) {
        match &mut self.drag {
            Some(ActiveDrag::Camera { last_view }) => {
                let delta = pos - *last_view;
                *last_view = pos;
                editor.pan_view(delta);
            }
            Some(ActiveDrag::Subject {
                start_subject,
                session,
            }) => {
                let current = editor.spaces().view_to_subject_point(pos);
                let mut delta = current - *start_subject;
                if modifiers.is_down(VirtualModifier::LockToInterval) {
                    delta = if delta.length() < AXIS_LOCK_DEAD_ZONE {
                        Vec2::ZERO
                    } else {
                        snap_to_major_axis(delta)
                    };
                }
                session.apply_move(editor, delta);
            }
            Some(ActiveDrag::BoxSelect {
                start_view,
                start_selection,
            }) => {
                let rect_view = Rect::from_points(*start_view, pos);
                let rect_subject = editor.spaces().view_to_subject_rect(rect_view);
                let invert = modifiers.is_down(VirtualModifier::InvertBoxSelection);
                update_box_selection(editor, &rect_subject, start_selection, invert);
            }
            Some(ActiveDrag::GizmoRotate {
                center_view,
                center_subject,
                start_angle,
                session,
            }) => {
                let mut delta = gizmo::angle_about(*center_view, pos) - *start_angle;
                if modifiers.is_down(VirtualModifier::LockToInterval) {
                    delta = snap_to_interval(delta, ROTATION_SNAP_DEGREES);
                }
                session.apply_rotate(editor, *center_subject, delta);
            }
            Some(ActiveDrag::GizmoScale {
                center_view,
                center_subject,
                start_radius,
                session,
            }) => {
                let mut ratio = (pos - *center_view).length() / *start_radius;
                if modifiers.is_down(VirtualModifier::LockToInterval) {
                    ratio = snap_to_interval(ratio, SCALE_SNAP_STEP).max(MIN_SNAPPED_SCALE);
                }
                session.apply_scale(editor, *center_subject, ratio);
            }
            Some(ActiveDrag::GizmoDelete) | None => {}
        }
    }

    fn on_drag_end(&mut self, editor: &mut Editor, _pos: Vec2) {
        match self.drag.take() {
            Some(
                ActiveDrag::Subject { session, .. }
                | ActiveDrag::GizmoRotate { session, .. }
                | ActiveDrag::GizmoScale { session, .. },
            ) => {
                session.end(editor);
                editor.save_history_state();
            }
            Some(ActiveDrag::GizmoDelete) => {
                editor.delete_selected();
            }
            // Camera pans and box selections are not history actions.
            Some(ActiveDrag::Camera { .. } | ActiveDrag::BoxSelect { .. }) | None => {}
        }
    }
}

/// Box-selection membership rule. Covered nodes become selected (or flip
/// when inverting); uncovered nodes revert to their state at drag start.
/// Nodes that appeared after drag start count as not originally selected.
fn update_box_selection(
    editor: &mut Editor,
    rect_subject: &Rect,
    start_selection: &HashSet<NodeId>,
    invert: bool,
) {
    let candidates: Vec<(NodeId, bool)> = editor
        .edited_node()
        .children
        .iter()
        .filter(|c| c.visible && !c.locked)
        .map(|c| (c.id.clone(), rect_subject.intersects(&c.bounds_in_parent())))
        .collect();
    for (id, overlaps) in candidates {
        let was_in_start = start_selection.contains(&id);
        let selected = if overlaps {
            if invert {
                !was_in_start
            } else {
                true
            }
        } else {
            was_in_start
        };
        editor.selection.set_selected(&editor.scene, &id, selected);
    }
}
