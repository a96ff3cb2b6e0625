//! Gizmo circle geometry.
//!
//! The gizmo is a circle around the selection; its handles drive rotate,
//! scale, and delete drags. The circle is computed in view space so the
//! on-screen radius clamps stay meaningful at any zoom.

use glam::Vec2;

use shared::Rect;

use crate::editor::Editor;

pub const MIN_GIZMO_RADIUS: f32 = 32.0;
pub const MAX_GIZMO_RADIUS: f32 = 400.0;

/// Selection gizmo circle in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// Circle enclosing the current selection, or `None` when nothing is
/// selected. Center is the midpoint of the selection's corner cloud; radius
/// is the farthest corner, clamped to the on-screen range.
pub fn selection_gizmo(editor: &Editor) -> Option<GizmoCircle> {
    let spaces = editor.spaces();
    let mut corners_view: Vec<Vec2> = Vec::new();
    for id in editor.selection.iter() {
        if let Some(bounds) = editor.scene.node_bounds_in_parent(id) {
            for corner in bounds.corners() {
                corners_view.push(spaces.subject_to_view_point(corner));
            }
        }
    }
    let cloud = Rect::from_point_cloud(corners_view.iter().copied())?;
    let center = cloud.center();
    let radius = corners_view
        .iter()
        .map(|c| (*c - center).length())
        .fold(0.0_f32, f32::max)
        .clamp(MIN_GIZMO_RADIUS, MAX_GIZMO_RADIUS);
    Some(GizmoCircle { center, radius })
}

/// Angle of a view point around the circle center, in degrees.
pub fn angle_about(center: Vec2, p: Vec2) -> f32 {
    let offset = p - center;
    offset.y.atan2(offset.x).to_degrees()
}
