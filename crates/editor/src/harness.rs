//! Headless harness driving the editor exactly the way an embedder would:
//! gesture events in, scene state out. Used by the command protocol and the
//! integration tests.

use glam::Vec2;

use shared::{CodecError, NodeId, Scene, SceneNode};

use crate::editor::Editor;
use crate::input::{KeyboardModifiers, VirtualModifier};
use crate::manipulator::{GestureEvent, GizmoHandle, Manipulator};

pub struct TestHarness {
    pub editor: Editor,
    pub manipulator: Manipulator,
    pub keys: KeyboardModifiers,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            editor: Editor::new(),
            manipulator: Manipulator::new(),
            keys: KeyboardModifiers::new(),
        }
    }

    /// Add a sprite to the current subject at a subject-space position.
    /// Leaves the selection empty so tests start from a clean slate.
    pub fn add_sprite(&mut self, name: &str, x: f32, y: f32, w: f32, h: f32) -> NodeId {
        let mut sprite = SceneNode::sprite(name, Vec2::new(w, h));
        sprite.transform.position = Vec2::new(x, y);
        let id = self.editor.spawn_node(sprite, None);
        self.editor.deselect_all();
        id
    }

    /// Add an empty group to the current subject.
    pub fn add_group(&mut self, name: &str) -> NodeId {
        let id = self.editor.spawn_node(SceneNode::group(name), None);
        self.editor.deselect_all();
        id
    }

    pub fn set_modifier(&mut self, modifier: VirtualModifier, down: bool) {
        self.keys.set(modifier, down);
    }

    pub fn event(&mut self, event: GestureEvent) {
        self.manipulator.handle_event(&mut self.editor, &self.keys, event);
    }

    pub fn tap(&mut self, x: f32, y: f32) {
        self.event(GestureEvent::Tapped {
            pos: Vec2::new(x, y),
            count: 1,
        });
    }

    pub fn double_tap(&mut self, x: f32, y: f32) {
        self.event(GestureEvent::Tapped {
            pos: Vec2::new(x, y),
            count: 2,
        });
    }

    /// A full drag: begin, a midpoint move, the final move, end.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32)) {
        let from = Vec2::new(from.0, from.1);
        let to = Vec2::new(to.0, to.1);
        self.event(GestureEvent::DragBegin { pos: from });
        self.event(GestureEvent::DragMove {
            pos: (from + to) * 0.5,
        });
        self.event(GestureEvent::DragMove { pos: to });
        self.event(GestureEvent::DragEnd { pos: to });
    }

    pub fn gizmo_drag(&mut self, handle: GizmoHandle, from: (f32, f32), to: (f32, f32)) {
        let from = Vec2::new(from.0, from.1);
        let to = Vec2::new(to.0, to.1);
        self.event(GestureEvent::GizmoDragBegin { handle, pos: from });
        self.event(GestureEvent::GizmoDragMove { pos: to });
        self.event(GestureEvent::GizmoDragEnd { pos: to });
    }

    pub fn node(&self, id: &str) -> &SceneNode {
        self.editor.scene.find(id).expect("node missing from scene")
    }

    pub fn position(&self, id: &str) -> Vec2 {
        self.node(id).transform.position
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.editor.selection.sorted_ids()
    }

    pub fn node_count(&self) -> usize {
        self.editor.scene.node_count()
    }

    pub fn export_scene(&self) -> Result<String, CodecError> {
        shared::serialize_scene(&self.editor.scene)
    }

    /// Replace the scene from a snapshot and restart history from it.
    pub fn load_scene_json(&mut self, snapshot: &str) -> Result<(), CodecError> {
        let scene: Scene = shared::deserialize_scene(snapshot)?;
        self.editor.replace_scene(scene);
        self.editor.clear_history();
        Ok(())
    }
}
