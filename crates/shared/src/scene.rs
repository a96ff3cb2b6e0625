//! Scene graph: a tree of transformable nodes with stable string ids.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Rect;
use crate::transform::Transform2D;

/// Stable node identifier. Survives snapshot round trips.
pub type NodeId = String;

/// Generate a fresh unique node id.
pub fn new_node_id() -> NodeId {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NotFound(NodeId),
    #[error("node is not a container: {0}")]
    NotAContainer(NodeId),
    #[error("child index {index} out of range in {parent}")]
    IndexOutOfRange { parent: NodeId, index: usize },
}

/// What a node is. Closed set; editors match on it rather than downcasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Pure container. Its bounds are the union of its children's.
    Group,
    /// Leaf with intrinsic size, centered on its local origin.
    Sprite { size: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub transform: Transform2D,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_true() -> bool {
    true
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn sprite(name: impl Into<String>, size: Vec2) -> Self {
        Self::with_kind(name, NodeKind::Sprite { size })
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: new_node_id(),
            name: name.into(),
            kind,
            transform: Transform2D::IDENTITY,
            color: default_color(),
            visible: true,
            locked: false,
            children: Vec::new(),
        }
    }

    /// Containers can hold children and serve as editing subjects.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// Bounds in the node's own space.
    pub fn local_bounds(&self) -> Rect {
        match self.kind {
            NodeKind::Sprite { size } => Rect::from_center_size(Vec2::ZERO, size),
            NodeKind::Group => {
                let mut bounds: Option<Rect> = None;
                for child in &self.children {
                    let child_bounds = child.bounds_in_parent();
                    bounds = Some(match bounds {
                        Some(b) => b.union(&child_bounds),
                        None => child_bounds,
                    });
                }
                bounds.unwrap_or(Rect::ZERO)
            }
        }
    }

    /// Axis-aligned bounds in the parent's space.
    pub fn bounds_in_parent(&self) -> Rect {
        let local = self.local_bounds();
        let corners = local
            .corners()
            .map(|c| self.transform.local_to_parent_point(c));
        Rect::from_point_cloud(corners).unwrap_or(Rect::ZERO)
    }
}

/// A scene is a single root container. Global space is the space above the
/// root, so the root's own transform participates in conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub root: SceneNode,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            root: SceneNode::group("root"),
        }
    }

    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        find_in(&self.root, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        find_in_mut(&mut self.root, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// The node whose children list holds `id`. `None` for the root or an
    /// unknown id.
    pub fn parent_of(&self, id: &str) -> Option<&SceneNode> {
        parent_in(&self.root, id)
    }

    pub fn parent_of_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        parent_in_mut(&mut self.root, id)
    }

    /// Ids from the root down to `id`, both inclusive.
    pub fn path_to(&self, id: &str) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        if collect_path(&self.root, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    pub fn add_child(&mut self, parent_id: &str, node: SceneNode) -> Result<(), SceneError> {
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| SceneError::NotFound(parent_id.to_string()))?;
        if !parent.is_container() {
            return Err(SceneError::NotAContainer(parent_id.to_string()));
        }
        parent.children.push(node);
        Ok(())
    }

    /// Insert a node at a position in the parent's child order. An index past
    /// the end appends.
    pub fn add_child_at(
        &mut self,
        parent_id: &str,
        index: usize,
        node: SceneNode,
    ) -> Result<(), SceneError> {
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| SceneError::NotFound(parent_id.to_string()))?;
        if !parent.is_container() {
            return Err(SceneError::NotAContainer(parent_id.to_string()));
        }
        let index = index.min(parent.children.len());
        parent.children.insert(index, node);
        Ok(())
    }

    /// Position of `id` within its parent's child order.
    pub fn child_index(&self, parent_id: &str, id: &str) -> Option<usize> {
        self.find(parent_id)?
            .children
            .iter()
            .position(|c| c.id == id)
    }

    /// Reorder a child within the same parent. Later children draw on top.
    pub fn move_child(&mut self, parent_id: &str, from: usize, to: usize) -> Result<(), SceneError> {
        let parent_key = parent_id.to_string();
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| SceneError::NotFound(parent_key.clone()))?;
        let len = parent.children.len();
        if from >= len {
            return Err(SceneError::IndexOutOfRange {
                parent: parent_key,
                index: from,
            });
        }
        let node = parent.children.remove(from);
        parent.children.insert(to.min(len - 1), node);
        Ok(())
    }

    /// Detach a node from its parent and return it. `None` for the root or an
    /// unknown id.
    pub fn remove_child(&mut self, id: &str) -> Option<SceneNode> {
        let parent = self.parent_of_mut(id)?;
        let index = parent.children.iter().position(|c| c.id == id)?;
        Some(parent.children.remove(index))
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    pub fn visit(&self, f: &mut impl FnMut(&SceneNode)) {
        visit_in(&self.root, f);
    }

    /// Map a point in `id`'s local space to global space.
    pub fn local_to_global(&self, id: &str, p: Vec2) -> Option<Vec2> {
        self.fold_up(id, p, |t, p| t.local_to_parent_point(p))
    }

    /// Map a global-space point into `id`'s local space.
    pub fn global_to_local(&self, id: &str, p: Vec2) -> Option<Vec2> {
        self.fold_down(id, p, |t, p| t.parent_to_local_point(p))
    }

    pub fn local_to_global_vector(&self, id: &str, v: Vec2) -> Option<Vec2> {
        self.fold_up(id, v, |t, v| t.local_to_parent_vector(v))
    }

    pub fn global_to_local_vector(&self, id: &str, v: Vec2) -> Option<Vec2> {
        self.fold_down(id, v, |t, v| t.parent_to_local_vector(v))
    }

    pub fn local_to_global_angle(&self, id: &str, degrees: f32) -> Option<f32> {
        self.fold_up(id, degrees, |t, a| t.local_to_parent_angle(a))
    }

    pub fn global_to_local_angle(&self, id: &str, degrees: f32) -> Option<f32> {
        self.fold_down(id, degrees, |t, a| t.parent_to_local_angle(a))
    }

    /// Bounds of `id` in its parent's space.
    pub fn node_bounds_in_parent(&self, id: &str) -> Option<Rect> {
        self.find(id).map(SceneNode::bounds_in_parent)
    }

    /// Topmost child of `container_id` whose padded bounds contain `p`
    /// (in the container's local space). Invisible and locked children are
    /// skipped. Later children draw on top, so iteration runs back to front.
    pub fn hit_test_child(&self, container_id: &str, p: Vec2, pad: f32) -> Option<NodeId> {
        let container = self.find(container_id)?;
        for child in container.children.iter().rev() {
            if !child.visible || child.locked {
                continue;
            }
            let mut bounds = child.bounds_in_parent();
            bounds.min -= Vec2::splat(pad);
            bounds.max += Vec2::splat(pad);
            if bounds.contains(p) {
                return Some(child.id.clone());
            }
        }
        None
    }

    fn fold_up<V: Copy>(
        &self,
        id: &str,
        value: V,
        apply: impl Fn(&Transform2D, V) -> V,
    ) -> Option<V> {
        let path = self.path_to(id)?;
        let mut value = value;
        for node_id in path.iter().rev() {
            let node = self.find(node_id)?;
            value = apply(&node.transform, value);
        }
        Some(value)
    }

    fn fold_down<V: Copy>(
        &self,
        id: &str,
        value: V,
        apply: impl Fn(&Transform2D, V) -> V,
    ) -> Option<V> {
        let path = self.path_to(id)?;
        let mut value = value;
        for node_id in &path {
            let node = self.find(node_id)?;
            value = apply(&node.transform, value);
        }
        Some(value)
    }
}

fn find_in<'a>(node: &'a SceneNode, id: &str) -> Option<&'a SceneNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|c| find_in(c, id))
}

fn find_in_mut<'a>(node: &'a mut SceneNode, id: &str) -> Option<&'a mut SceneNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter_mut().find_map(|c| find_in_mut(c, id))
}

fn parent_in<'a>(node: &'a SceneNode, id: &str) -> Option<&'a SceneNode> {
    if node.children.iter().any(|c| c.id == id) {
        return Some(node);
    }
    node.children.iter().find_map(|c| parent_in(c, id))
}

fn parent_in_mut<'a>(node: &'a mut SceneNode, id: &str) -> Option<&'a mut SceneNode> {
    if node.children.iter().any(|c| c.id == id) {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|c| parent_in_mut(c, id))
}

fn collect_path(node: &SceneNode, id: &str, path: &mut Vec<NodeId>) -> bool {
    path.push(node.id.clone());
    if node.id == id {
        return true;
    }
    for child in &node.children {
        if collect_path(child, id, path) {
            return true;
        }
    }
    path.pop();
    false
}

fn visit_in(node: &SceneNode, f: &mut impl FnMut(&SceneNode)) {
    f(node);
    for child in &node.children {
        visit_in(child, f);
    }
}
