//! Prebuilt harness scenes for tests.

use glam::Vec2;

use shared::{NodeId, SceneNode};

use crate::harness::TestHarness;

/// Three 10x10 sprites on the root, spaced 40 apart along x.
pub fn three_sprites() -> (TestHarness, [NodeId; 3]) {
    let mut h = TestHarness::new();
    let a = h.add_sprite("a", 0.0, 0.0, 10.0, 10.0);
    let b = h.add_sprite("b", 40.0, 0.0, 10.0, 10.0);
    let c = h.add_sprite("c", 80.0, 0.0, 10.0, 10.0);
    (h, [a, b, c])
}

/// A group offset at (100, 50) holding one sprite at its origin.
pub fn nested_group() -> (TestHarness, NodeId, NodeId) {
    let mut h = TestHarness::new();
    let group = h.add_group("group");
    h.editor
        .scene
        .find_mut(&group)
        .expect("group just added")
        .transform
        .position = Vec2::new(100.0, 50.0);
    let sprite = SceneNode::sprite("inner", Vec2::splat(10.0));
    let sprite_id = sprite.id.clone();
    h.editor
        .scene
        .add_child(&group, sprite)
        .expect("group accepts children");
    h.editor.save_history_state();
    (h, group, sprite_id)
}
