//! Snapshot history for the editor.
//!
//! Every completed discrete action records the whole scene plus the identity
//! of the edited subject. Undo and redo rebuild the scene from the snapshot
//! and re-resolve that identity against the fresh graph, since deserializing
//! allocates new nodes.

use std::sync::Arc;

use shared::{deserialize_scene, serialize_scene, NodeId};

use super::Editor;

/// One undo/redo unit. Immutable once pushed.
#[derive(Debug)]
pub struct HistoryState {
    pub edited: NodeId,
    pub snapshot: String,
}

impl Editor {
    /// Record the current scene as a history state. Call exactly once per
    /// completed action, never while a gesture is live.
    pub fn save_history_state(&mut self) {
        assert!(
            !self.is_changing(),
            "history state saved mid-manipulation"
        );
        let snapshot =
            serialize_scene(&self.scene).expect("scene snapshot serialization failed");
        self.history.add_state(Arc::new(HistoryState {
            edited: self.edited.clone(),
            snapshot,
        }));
        tracing::debug!(
            states = self.history.len(),
            index = ?self.history.current_index(),
            "saved history state"
        );
    }

    pub fn can_undo(&self) -> bool {
        !self.is_changing() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_changing() && self.history.can_redo()
    }

    /// Step back one history state. Refused while a gesture is open or at
    /// the baseline.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        let state = self.history.undo();
        self.apply_history_state(&state);
        tracing::debug!(index = ?self.history.current_index(), "undo");
        true
    }

    /// Step forward one history state. Refused while a gesture is open or at
    /// the tip.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        let state = self.history.redo();
        self.apply_history_state(&state);
        tracing::debug!(index = ?self.history.current_index(), "redo");
        true
    }

    /// Drop all history and record the current scene as the new baseline.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.save_history_state();
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history.current_index()
    }

    /// Enact a history state. Snapshots are self-produced, so a parse or
    /// identity failure here means corrupt process state.
    fn apply_history_state(&mut self, state: &HistoryState) {
        let scene =
            deserialize_scene(&state.snapshot).expect("history snapshot failed to deserialize");
        self.scene = scene;
        assert!(
            self.scene.contains(&state.edited),
            "edited subject missing from history snapshot"
        );
        self.edited = state.edited.clone();
        self.selection.retain_existing(&self.scene);
    }
}
