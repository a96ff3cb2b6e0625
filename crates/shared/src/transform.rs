//! Node-local 2D transforms.
//!
//! A node's transform maps its local space into its parent's space as
//! translate(position) * rotate(rotation) * scale(scale) * translate(-pivot).

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// Rotate a vector by an angle in degrees.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Position, rotation, scale, and pivot of a scene node relative to its parent.
///
/// Rotation is stored in degrees. The pivot is the local-space point the node
/// rotates and scales around, and the point that `position` places in the
/// parent's space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    #[serde(default)]
    pub pivot: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        position: Vec2::ZERO,
        rotation_degrees: 0.0,
        scale: Vec2::ONE,
        pivot: Vec2::ZERO,
    };

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// The equivalent affine map, for callers that batch points.
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            self.scale,
            self.rotation_degrees.to_radians(),
            self.position,
        ) * Affine2::from_translation(-self.pivot)
    }

    /// Map a local-space point into the parent's space.
    pub fn local_to_parent_point(&self, p: Vec2) -> Vec2 {
        self.position + rotate_degrees(self.scale * (p - self.pivot), self.rotation_degrees)
    }

    /// Map a parent-space point into local space. Assumes non-zero scale.
    pub fn parent_to_local_point(&self, p: Vec2) -> Vec2 {
        rotate_degrees(p - self.position, -self.rotation_degrees) / self.scale + self.pivot
    }

    /// Map a local-space direction into the parent's space. Ignores position.
    pub fn local_to_parent_vector(&self, v: Vec2) -> Vec2 {
        rotate_degrees(self.scale * v, self.rotation_degrees)
    }

    /// Map a parent-space direction into local space. Ignores position.
    pub fn parent_to_local_vector(&self, v: Vec2) -> Vec2 {
        rotate_degrees(v, -self.rotation_degrees) / self.scale
    }

    /// Map a local-space angle (degrees) into the parent's space.
    ///
    /// Angles accumulate rotations only; non-uniform scale shear is ignored,
    /// which is what editing tools expect when composing gizmo rotations.
    pub fn local_to_parent_angle(&self, degrees: f32) -> f32 {
        degrees + self.rotation_degrees
    }

    /// Map a parent-space angle (degrees) into local space.
    pub fn parent_to_local_angle(&self, degrees: f32) -> f32 {
        degrees - self.rotation_degrees
    }
}
