//! Coordinate conversions between view, subject, and global space.
//!
//! View space is where raw input arrives. Subject space is the local space of
//! the node currently being edited; its children live there. Every view to
//! subject conversion composes strictly through global space, so it stays
//! exact no matter how many ancestor transforms sit above the subject.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shared::{Rect, Scene};

/// Pan/zoom of the viewport. `pan` is the global point under the view origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn view_to_global_point(&self, p: Vec2) -> Vec2 {
        self.pan + p / self.zoom
    }

    pub fn global_to_view_point(&self, p: Vec2) -> Vec2 {
        (p - self.pan) * self.zoom
    }

    pub fn view_to_global_vector(&self, v: Vec2) -> Vec2 {
        v / self.zoom
    }

    pub fn global_to_view_vector(&self, v: Vec2) -> Vec2 {
        v * self.zoom
    }
}

/// Borrowed conversion context for one subject node.
///
/// Angles are in degrees. The view never rotates, so view and global angles
/// coincide.
pub struct Spaces<'a> {
    scene: &'a Scene,
    view: &'a ViewTransform,
    subject: &'a str,
}

impl<'a> Spaces<'a> {
    pub fn new(scene: &'a Scene, view: &'a ViewTransform, subject: &'a str) -> Self {
        Self {
            scene,
            view,
            subject,
        }
    }

    fn subject_missing(&self) -> ! {
        panic!("subject node not in scene: {}", self.subject)
    }

    pub fn view_to_subject_point(&self, p: Vec2) -> Vec2 {
        let global = self.view.view_to_global_point(p);
        self.scene
            .global_to_local(self.subject, global)
            .unwrap_or_else(|| self.subject_missing())
    }

    pub fn subject_to_view_point(&self, p: Vec2) -> Vec2 {
        let global = self
            .scene
            .local_to_global(self.subject, p)
            .unwrap_or_else(|| self.subject_missing());
        self.view.global_to_view_point(global)
    }

    pub fn view_to_subject_vector(&self, v: Vec2) -> Vec2 {
        let global = self.view.view_to_global_vector(v);
        self.scene
            .global_to_local_vector(self.subject, global)
            .unwrap_or_else(|| self.subject_missing())
    }

    pub fn subject_to_view_vector(&self, v: Vec2) -> Vec2 {
        let global = self
            .scene
            .local_to_global_vector(self.subject, v)
            .unwrap_or_else(|| self.subject_missing());
        self.view.global_to_view_vector(global)
    }

    pub fn view_to_subject_angle(&self, degrees: f32) -> f32 {
        self.scene
            .global_to_local_angle(self.subject, degrees)
            .unwrap_or_else(|| self.subject_missing())
    }

    pub fn subject_to_view_angle(&self, degrees: f32) -> f32 {
        self.scene
            .local_to_global_angle(self.subject, degrees)
            .unwrap_or_else(|| self.subject_missing())
    }

    /// Axis-aligned bounds in subject space of a view-space rectangle. The
    /// conversion may rotate, so all four corners are mapped and re-boxed.
    pub fn view_to_subject_rect(&self, rect: Rect) -> Rect {
        let corners = rect.corners().map(|c| self.view_to_subject_point(c));
        Rect::from_point_cloud(corners).unwrap_or(Rect::ZERO)
    }

    pub fn subject_to_view_rect(&self, rect: Rect) -> Rect {
        let corners = rect.corners().map(|c| self.subject_to_view_point(c));
        Rect::from_point_cloud(corners).unwrap_or(Rect::ZERO)
    }

    pub fn subject_to_global_point(&self, p: Vec2) -> Vec2 {
        self.scene
            .local_to_global(self.subject, p)
            .unwrap_or_else(|| self.subject_missing())
    }

    pub fn global_to_subject_point(&self, p: Vec2) -> Vec2 {
        self.scene
            .global_to_local(self.subject, p)
            .unwrap_or_else(|| self.subject_missing())
    }
}
