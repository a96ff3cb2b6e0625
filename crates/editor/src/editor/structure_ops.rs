//! Structural edits: create, delete, nudge, lock, group, ungroup.
//!
//! Every operation here that changes the scene records exactly one history
//! state when it actually changed something.

use glam::Vec2;

use shared::{NodeId, SceneNode};

use super::Editor;

/// Subject-space distance of one arrow-key nudge.
pub const NUDGE_STEP: f32 = 1.25;

impl Editor {
    /// Add a node to the subject, optionally placed under a view point, and
    /// select it.
    pub fn spawn_node(&mut self, mut node: SceneNode, at_view: Option<Vec2>) -> NodeId {
        if let Some(view_point) = at_view {
            node.transform.position = self.spaces().view_to_subject_point(view_point);
        }
        let id = node.id.clone();
        let subject = self.edited().clone();
        self.scene
            .add_child(&subject, node)
            .expect("edited subject is always a container");
        self.select_sole(&id);
        self.save_history_state();
        id
    }

    /// Remove every selected node from the scene. Returns how many went.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.sorted_ids();
        let mut removed = 0;
        for id in &ids {
            if self.scene.remove_child(id).is_some() {
                removed += 1;
            }
        }
        self.selection.clear();
        if removed > 0 {
            self.save_history_state();
            tracing::debug!(removed, "deleted selection");
        }
        removed
    }

    /// Move every selected node one step along `direction` (unit axis
    /// vectors expected, but any direction works).
    pub fn nudge_selected(&mut self, direction: Vec2) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selection.sorted_ids() {
            if let Some(node) = self.scene.find_mut(&id) {
                node.transform.position += direction * NUDGE_STEP;
            }
        }
        self.save_history_state();
    }

    /// Lock the selected nodes. Locked nodes cannot stay selected, so the
    /// selection empties.
    pub fn lock_selected(&mut self) -> usize {
        let ids = self.selection.sorted_ids();
        let mut locked = 0;
        for id in &ids {
            if let Some(node) = self.scene.find_mut(id) {
                if !node.locked {
                    node.locked = true;
                    locked += 1;
                }
            }
        }
        self.selection.clear();
        if locked > 0 {
            self.save_history_state();
        }
        locked
    }

    /// Clear the locked flag on every direct child of the subject.
    pub fn unlock_all_children(&mut self) -> usize {
        let subject = self.edited().clone();
        let mut unlocked = 0;
        if let Some(node) = self.scene.find_mut(&subject) {
            for child in &mut node.children {
                if child.locked {
                    child.locked = false;
                    unlocked += 1;
                }
            }
        }
        if unlocked > 0 {
            self.save_history_state();
        }
        unlocked
    }

    /// Wrap the selected children of the subject in a new group. The group
    /// carries an identity transform, so the children keep their placement.
    pub fn group_selected(&mut self) -> Option<NodeId> {
        let subject = self.edited().clone();
        let member_ids: Vec<NodeId> = self
            .edited_node()
            .children
            .iter()
            .filter(|c| self.selection.is_selected(&c.id))
            .map(|c| c.id.clone())
            .collect();
        if member_ids.is_empty() {
            return None;
        }

        // The group takes the stacking slot of the bottom-most member.
        let slot = self
            .scene
            .child_index(&subject, &member_ids[0])
            .expect("selected child disappeared during grouping");
        let group = SceneNode::group("group");
        let group_id = group.id.clone();
        self.scene
            .add_child_at(&subject, slot, group)
            .expect("edited subject is always a container");

        for id in &member_ids {
            let node = self
                .scene
                .remove_child(id)
                .expect("selected child disappeared during grouping");
            self.scene
                .add_child(&group_id, node)
                .expect("freshly created group is a container");
        }

        self.select_sole(&group_id);
        self.save_history_state();
        tracing::debug!(members = member_ids.len(), "grouped selection");
        Some(group_id)
    }

    /// Dissolve selected groups, composing each group's transform into its
    /// children so nothing moves on screen. Returns the freed children, which
    /// become the new selection.
    pub fn ungroup_selected(&mut self) -> Vec<NodeId> {
        let subject = self.edited().clone();
        let group_ids: Vec<NodeId> = self
            .edited_node()
            .children
            .iter()
            .filter(|c| c.is_container() && self.selection.is_selected(&c.id))
            .map(|c| c.id.clone())
            .collect();

        let mut freed = Vec::new();
        for group_id in &group_ids {
            let slot = match self.scene.child_index(&subject, group_id) {
                Some(slot) => slot,
                None => continue,
            };
            let group = match self.scene.remove_child(group_id) {
                Some(group) => group,
                None => continue,
            };
            let group_t = group.transform;
            // Composing rotation and scale component-wise is exact only when
            // the group's scale is uniform or its rotation is zero. Groups
            // made by group_selected carry the identity transform, so both
            // hold there; anything fancier needs a matrix decompose.
            // Children slide into the group's old slot, keeping their order.
            for (offset, mut child) in group.children.into_iter().enumerate() {
                child.transform.position = group_t.local_to_parent_point(child.transform.position);
                child.transform.rotation_degrees += group_t.rotation_degrees;
                child.transform.scale *= group_t.scale;
                freed.push(child.id.clone());
                self.scene
                    .add_child_at(&subject, slot + offset, child)
                    .expect("edited subject is always a container");
            }
        }

        if !group_ids.is_empty() {
            self.selection.clear();
            for id in &freed {
                self.selection.select(&self.scene, id);
            }
            self.save_history_state();
            tracing::debug!(groups = group_ids.len(), freed = freed.len(), "ungrouped");
        }
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Transform2D;

    fn editor_with_two_sprites() -> (Editor, NodeId, NodeId) {
        let mut editor = Editor::new();
        let a = editor.spawn_node(SceneNode::sprite("a", Vec2::splat(10.0)), None);
        let b = editor.spawn_node(SceneNode::sprite("b", Vec2::splat(10.0)), None);
        (editor, a, b)
    }

    #[test]
    fn test_spawn_places_at_view_point() {
        let mut editor = Editor::new();
        let id = editor.spawn_node(
            SceneNode::sprite("s", Vec2::splat(8.0)),
            Some(Vec2::new(40.0, -10.0)),
        );
        assert_eq!(
            editor.scene.find(&id).unwrap().transform.position,
            Vec2::new(40.0, -10.0)
        );
        assert!(editor.selection.is_selected(&id));
    }

    #[test]
    fn test_delete_selected() {
        let (mut editor, a, b) = editor_with_two_sprites();
        editor.select_sole(&a);
        assert_eq!(editor.delete_selected(), 1);
        assert!(!editor.scene.contains(&a));
        assert!(editor.scene.contains(&b));
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_saves_nothing() {
        let mut editor = Editor::new();
        let history = editor.history_len();
        assert_eq!(editor.delete_selected(), 0);
        assert_eq!(editor.history_len(), history);
    }

    #[test]
    fn test_nudge_moves_by_step() {
        let (mut editor, a, _) = editor_with_two_sprites();
        editor.select_sole(&a);
        editor.nudge_selected(Vec2::new(1.0, 0.0));
        assert_eq!(
            editor.scene.find(&a).unwrap().transform.position,
            Vec2::new(NUDGE_STEP, 0.0)
        );
    }

    #[test]
    fn test_lock_clears_selection_and_blocks_reselect() {
        let (mut editor, a, _) = editor_with_two_sprites();
        editor.select_sole(&a);
        assert_eq!(editor.lock_selected(), 1);
        assert!(editor.selection.is_empty());
        assert!(editor.scene.find(&a).unwrap().locked);

        editor.select_sole(&a);
        assert!(editor.selection.is_empty());

        assert_eq!(editor.unlock_all_children(), 1);
        editor.select_sole(&a);
        assert!(editor.selection.is_selected(&a));
    }

    #[test]
    fn test_group_and_ungroup_preserve_placement() {
        let (mut editor, a, b) = editor_with_two_sprites();
        editor.scene.find_mut(&a).unwrap().transform.position = Vec2::new(10.0, 0.0);
        editor.scene.find_mut(&b).unwrap().transform.position = Vec2::new(0.0, 10.0);
        editor.select_all();

        let group_id = editor.group_selected().unwrap();
        assert!(editor.selection.is_selected(&group_id));
        assert_eq!(editor.scene.find(&group_id).unwrap().children.len(), 2);
        assert_eq!(
            editor.scene.find(&a).unwrap().transform.position,
            Vec2::new(10.0, 0.0)
        );

        // Move the group, then dissolve it; children absorb its offset.
        editor.scene.find_mut(&group_id).unwrap().transform =
            Transform2D::from_position(Vec2::new(5.0, 5.0));
        editor.select_sole(&group_id);
        let freed = editor.ungroup_selected();
        assert_eq!(freed.len(), 2);
        assert!(!editor.scene.contains(&group_id));
        assert_eq!(
            editor.scene.find(&a).unwrap().transform.position,
            Vec2::new(15.0, 5.0)
        );
        assert!(editor.selection.is_selected(&a));
        assert!(editor.selection.is_selected(&b));
    }

    #[test]
    fn test_group_and_ungroup_keep_stacking_order() {
        let (mut editor, a, _) = editor_with_two_sprites();
        let c = editor.spawn_node(SceneNode::sprite("c", Vec2::splat(10.0)), None);
        let root = editor.scene.root.id.clone();

        editor.selection.clear();
        editor.selection.select(&editor.scene, &a);
        editor.selection.select(&editor.scene, &c);
        let group_id = editor.group_selected().unwrap();
        // The group sits where its bottom-most member sat.
        assert_eq!(editor.scene.child_index(&root, &group_id), Some(0));

        editor.select_sole(&group_id);
        editor.ungroup_selected();
        assert_eq!(editor.scene.child_index(&root, &a), Some(0));
        assert_eq!(editor.scene.child_index(&root, &c), Some(1));
    }

    #[test]
    fn test_ungroup_leaf_selection_is_noop() {
        let (mut editor, a, _) = editor_with_two_sprites();
        editor.select_sole(&a);
        let history = editor.history_len();
        assert!(editor.ungroup_selected().is_empty());
        assert_eq!(editor.history_len(), history);
    }
}
