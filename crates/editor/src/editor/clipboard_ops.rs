//! Cut, copy, paste, and duplication via opaque node manifests.
//!
//! A manifest is a JSON list of node subtrees. Pasting regenerates every id
//! in the payload so a manifest can be pasted any number of times without
//! colliding with live nodes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::{new_node_id, NodeId, SceneNode};

use super::Editor;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("clipboard is empty")]
    ClipboardEmpty,
    #[error("clipboard manifest parse failed: {0}")]
    ManifestParse(#[from] serde_json::Error),
}

const MANIFEST_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct NodeManifest {
    version: u32,
    nodes: Vec<SceneNode>,
}

impl Editor {
    /// Manifest string for the current selection, in subject child order.
    /// `None` when nothing is selected.
    pub fn selection_manifest(&self) -> Option<String> {
        let nodes: Vec<SceneNode> = self
            .edited_node()
            .children
            .iter()
            .filter(|c| self.selection.is_selected(&c.id))
            .cloned()
            .collect();
        if nodes.is_empty() {
            return None;
        }
        let manifest = NodeManifest {
            version: MANIFEST_VERSION,
            nodes,
        };
        match serde_json::to_string(&manifest) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(%err, "selection manifest serialization failed");
                None
            }
        }
    }

    /// Copy the selection to the clipboard. Not a history action.
    pub fn copy_selected(&mut self) -> bool {
        match self.selection_manifest() {
            Some(manifest) => {
                self.clipboard.set_text(manifest);
                true
            }
            None => false,
        }
    }

    /// Copy then delete. The deletion records the history state.
    pub fn cut_selected(&mut self) -> bool {
        if !self.copy_selected() {
            return false;
        }
        self.delete_selected() > 0
    }

    /// Paste the clipboard manifest into the subject. The pasted nodes
    /// replace the selection and the result is recorded in history. A bad
    /// manifest aborts the action leaving everything untouched.
    pub fn paste(&mut self) -> Result<Vec<NodeId>, EditorError> {
        let manifest = self.clipboard.text().ok_or(EditorError::ClipboardEmpty)?;
        let pasted = self.insert_manifest(&manifest)?;
        self.save_history_state();
        Ok(pasted)
    }

    /// Duplicate the selection in place and select the copies. Does not touch
    /// the clipboard and does not record history: a tear-away drag records one
    /// state at drag end covering both the copy and the move, so the caller
    /// owns the save.
    pub fn duplicate_selected(&mut self) -> Result<Vec<NodeId>, EditorError> {
        match self.selection_manifest() {
            Some(manifest) => self.insert_manifest(&manifest),
            None => Ok(Vec::new()),
        }
    }

    fn insert_manifest(&mut self, manifest: &str) -> Result<Vec<NodeId>, EditorError> {
        let parsed: NodeManifest = match serde_json::from_str(manifest) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(%err, "paste aborted, bad manifest");
                return Err(EditorError::ManifestParse(err));
            }
        };

        let subject = self.edited().clone();
        let mut pasted = Vec::with_capacity(parsed.nodes.len());
        for mut node in parsed.nodes {
            assign_fresh_ids(&mut node);
            pasted.push(node.id.clone());
            self.scene
                .add_child(&subject, node)
                .expect("edited subject is always a container");
        }

        self.selection.clear();
        for id in &pasted {
            self.selection.select(&self.scene, id);
        }
        tracing::debug!(count = pasted.len(), "pasted nodes");
        Ok(pasted)
    }
}

fn assign_fresh_ids(node: &mut SceneNode) {
    node.id = new_node_id();
    for child in &mut node.children {
        assign_fresh_ids(child);
    }
}
