//! Editor context: the scene, the edited subject, selection, view, history,
//! and clipboard, with operations split across the submodules.

mod clipboard_ops;
mod history_ops;
mod structure_ops;

use std::sync::Arc;

use glam::Vec2;

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::history::ChangeHistory;
use crate::picking;
use crate::selection::SelectionSet;
use crate::spaces::{Spaces, ViewTransform};
use shared::{NodeId, Scene, SceneNode};

pub use clipboard_ops::EditorError;
pub use history_ops::HistoryState;

/// Everything a manipulation or command needs to act on, passed explicitly
/// rather than reached through globals.
pub struct Editor {
    pub scene: Scene,
    /// Id of the subject container. Always resolves to a container node.
    edited: NodeId,
    pub selection: SelectionSet,
    pub view: ViewTransform,
    pub(crate) history: ChangeHistory<Arc<HistoryState>>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    /// True strictly between a session's begin and end.
    changing: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    /// Build an editor around an existing scene. The root becomes the edited
    /// subject and the loaded state is recorded as the history baseline.
    pub fn with_scene(scene: Scene) -> Self {
        let edited = scene.root.id.clone();
        let mut editor = Self {
            scene,
            edited,
            selection: SelectionSet::new(),
            view: ViewTransform::default(),
            history: ChangeHistory::new(),
            clipboard: Box::new(MemoryClipboard::new()),
            changing: false,
        };
        editor.save_history_state();
        editor
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn edited(&self) -> &NodeId {
        &self.edited
    }

    pub fn edited_node(&self) -> &SceneNode {
        self.scene
            .find(&self.edited)
            .expect("edited subject missing from scene")
    }

    /// Replace the live scene wholesale, as done on load and undo. Resets the
    /// subject to the new root and prunes stale selection.
    pub fn replace_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.edited = self.scene.root.id.clone();
        self.selection.retain_existing(&self.scene);
    }

    /// Descend into a container child, making it the subject.
    pub fn edit_child(&mut self, id: &str) -> bool {
        match self.scene.find(id) {
            Some(node) if node.is_container() => {
                self.edited = id.to_string();
                self.selection.clear();
                tracing::debug!(subject = %self.edited, "edit into child");
                true
            }
            _ => false,
        }
    }

    /// Step the subject up to its parent. No-op at the root.
    pub fn edit_parent(&mut self) -> bool {
        match self.scene.parent_of(&self.edited) {
            Some(parent) => {
                self.edited = parent.id.clone();
                self.selection.clear();
                tracing::debug!(subject = %self.edited, "edit into parent");
                true
            }
            None => false,
        }
    }

    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(&self.scene, &self.view, &self.edited)
    }

    /// Topmost pickable child of the subject under a view-space point.
    pub fn pick(&self, view_point: Vec2) -> Option<NodeId> {
        let p_subject = self.spaces().view_to_subject_point(view_point);
        picking::pick_child(&self.scene, &self.edited, p_subject)
    }

    pub fn is_changing(&self) -> bool {
        self.changing
    }

    pub(crate) fn begin_touch_action(&mut self) {
        assert!(!self.changing, "manipulation session already open");
        self.changing = true;
    }

    pub(crate) fn end_touch_action(&mut self) {
        self.changing = false;
    }

    /// Select exactly this node, dropping any previous selection.
    pub fn select_sole(&mut self, id: &str) {
        self.selection.clear();
        self.selection.select(&self.scene, id);
    }

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.selection.toggle(&self.scene, id)
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Select every visible, unlocked direct child of the subject.
    pub fn select_all(&mut self) {
        self.selection.clear();
        let ids: Vec<NodeId> = self
            .edited_node()
            .children
            .iter()
            .filter(|c| c.visible && !c.locked)
            .map(|c| c.id.clone())
            .collect();
        for id in ids {
            self.selection.select(&self.scene, &id);
        }
    }

    /// Pan the view by a view-space delta.
    pub fn pan_view(&mut self, delta_view: Vec2) {
        self.view.pan -= delta_view / self.view.zoom;
    }

    /// Zoom about a view-space anchor so the point under it stays put.
    pub fn zoom_view_about(&mut self, anchor_view: Vec2, factor: f32) {
        let anchor_global = self.view.view_to_global_point(anchor_view);
        self.view.zoom = (self.view.zoom * factor).clamp(0.05, 20.0);
        self.view.pan = anchor_global - anchor_view / self.view.zoom;
    }
}
