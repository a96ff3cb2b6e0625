//! Start-state-relative manipulation math.
//!
//! A session snapshots each selected node's transform and color once at
//! gesture start. Every move/rotate/scale frame recomputes the node from that
//! cached start state, never from the live value, so a gesture whose net
//! delta is the identity leaves the node bit-for-bit unchanged.

use std::collections::HashMap;

use glam::Vec2;

use shared::{rotate_degrees, NodeId};

use crate::editor::Editor;

/// Below this subject-space drag distance a lock-to-interval move snaps to
/// zero instead of an axis.
pub const AXIS_LOCK_DEAD_ZONE: f32 = 4.0;

/// Transform and color of one node at gesture start.
#[derive(Debug, Clone)]
pub struct StartState {
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    pub color: [f32; 4],
}

/// One open manipulation gesture over the current selection.
#[derive(Debug)]
pub struct ManipulationSession {
    start_states: HashMap<NodeId, StartState>,
}

impl ManipulationSession {
    /// Open a session, snapshotting the selection. Only one session may be
    /// open at a time; a second begin is a logic error.
    pub fn begin(editor: &mut Editor) -> Self {
        editor.begin_touch_action();
        let mut start_states = HashMap::new();
        for id in editor.selection.iter() {
            if let Some(node) = editor.scene.find(id) {
                start_states.insert(
                    id.clone(),
                    StartState {
                        position: node.transform.position,
                        rotation_degrees: node.transform.rotation_degrees,
                        scale: node.transform.scale,
                        color: node.color,
                    },
                );
            }
        }
        tracing::debug!(nodes = start_states.len(), "manipulation session opened");
        Self { start_states }
    }

    /// Close the session. The caller records the history state afterwards.
    pub fn end(self, editor: &mut Editor) {
        editor.end_touch_action();
        tracing::debug!("manipulation session closed");
    }

    pub fn is_empty(&self) -> bool {
        self.start_states.is_empty()
    }

    /// Set each node's position to its start position plus a subject-space
    /// delta.
    pub fn apply_move(&self, editor: &mut Editor, delta_subject: Vec2) {
        for (id, start) in &self.start_states {
            if let Some(node) = editor.scene.find_mut(id) {
                node.transform.position = start.position + delta_subject;
            }
        }
    }

    /// Orbit each node around `center_subject` by `delta_degrees`, rotating
    /// the node itself by the same amount. Offsets come from the start state,
    /// so error never compounds across frames.
    pub fn apply_rotate(&self, editor: &mut Editor, center_subject: Vec2, delta_degrees: f32) {
        for (id, start) in &self.start_states {
            if let Some(node) = editor.scene.find_mut(id) {
                let offset = start.position - center_subject;
                node.transform.position = center_subject + rotate_degrees(offset, delta_degrees);
                node.transform.rotation_degrees = start.rotation_degrees + delta_degrees;
            }
        }
    }

    /// Scale each node's offset from `center_subject` and its own scale by
    /// `ratio`, both relative to the start state.
    pub fn apply_scale(&self, editor: &mut Editor, center_subject: Vec2, ratio: f32) {
        for (id, start) in &self.start_states {
            if let Some(node) = editor.scene.find_mut(id) {
                let offset = start.position - center_subject;
                node.transform.position = center_subject + offset * ratio;
                node.transform.scale = start.scale * ratio;
            }
        }
    }
}

/// Collapse a delta onto its dominant axis.
pub fn snap_to_major_axis(v: Vec2) -> Vec2 {
    if v.x.abs() >= v.y.abs() {
        Vec2::new(v.x, 0.0)
    } else {
        Vec2::new(0.0, v.y)
    }
}

/// Nearest multiple of `interval`.
pub fn snap_to_interval(value: f32, interval: f32) -> f32 {
    (value / interval).round() * interval
}
