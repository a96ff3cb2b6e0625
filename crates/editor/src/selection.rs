//! Selection membership.
//!
//! Nodes are tracked by id, not by reference, so a selection survives scene
//! reloads only where the ids still resolve. Locked nodes are silently
//! refused; that is policy, not an error.

use std::collections::HashSet;

use shared::{NodeId, Scene};

#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: HashSet<NodeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the selection. Locked or unknown nodes are ignored.
    /// Returns whether the node is selected afterwards.
    pub fn select(&mut self, scene: &Scene, id: &str) -> bool {
        match scene.find(id) {
            Some(node) if !node.locked => {
                self.ids.insert(id.to_string());
                true
            }
            _ => self.ids.contains(id),
        }
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Flip membership. Selecting still refuses locked nodes; deselecting a
    /// locked node that somehow got in always works.
    pub fn toggle(&mut self, scene: &Scene, id: &str) -> bool {
        if self.ids.contains(id) {
            self.ids.remove(id);
            false
        } else {
            self.select(scene, id)
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    /// Snapshot of the current membership, used as the box-selection start
    /// set and for iteration while mutating the scene.
    pub fn snapshot(&self) -> HashSet<NodeId> {
        self.ids.clone()
    }

    /// Membership in a stable order for protocol output and clipboard
    /// manifests.
    pub fn sorted_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop ids that no longer resolve, after a scene reload.
    pub fn retain_existing(&mut self, scene: &Scene) {
        self.ids.retain(|id| scene.contains(id));
    }

    /// Force membership to match `selected`, still refusing locked nodes on
    /// the way in. Used by box selection.
    pub fn set_selected(&mut self, scene: &Scene, id: &str, selected: bool) {
        if selected {
            self.select(scene, id);
        } else {
            self.deselect(id);
        }
    }
}
