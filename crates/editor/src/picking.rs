//! Pointer hit testing against the subject's children.

use glam::Vec2;
use shared::{NodeId, Scene};

/// Bounds padding in subject units so thin or tiny nodes stay grabbable.
pub const PICK_PAD: f32 = 6.0;

/// Topmost pickable child of `subject` under a subject-space point.
pub fn pick_child(scene: &Scene, subject: &str, p_subject: Vec2) -> Option<NodeId> {
    scene.hit_test_child(subject, p_subject, PICK_PAD)
}
