//! Virtual modifier keys.
//!
//! The router samples modifiers live through the `ModifierKeys` trait, so an
//! embedder can back them with real keyboard state while tests and the
//! command protocol use the map-based `KeyboardModifiers`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Named modifiers the manipulation core cares about. Embedders decide which
/// physical keys map to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualModifier {
    /// Drag on empty space pans the camera instead of box-selecting.
    CameraPan,
    /// Drag on a selected node duplicates the selection and drags the copy.
    TearAwayCopy,
    /// Taps add to the selection instead of replacing it.
    AppendSelection,
    /// Box selection inverts membership of covered nodes.
    InvertBoxSelection,
    /// Move/rotate/scale deltas snap to axis, 45 degrees, or 0.5 steps.
    LockToInterval,
}

pub trait ModifierKeys {
    fn is_down(&self, modifier: VirtualModifier) -> bool;
}

/// Simple held-set implementation of `ModifierKeys`.
#[derive(Debug, Default)]
pub struct KeyboardModifiers {
    down: HashSet<VirtualModifier>,
}

impl KeyboardModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, modifier: VirtualModifier, down: bool) {
        if down {
            self.down.insert(modifier);
        } else {
            self.down.remove(&modifier);
        }
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

impl ModifierKeys for KeyboardModifiers {
    fn is_down(&self, modifier: VirtualModifier) -> bool {
        self.down.contains(&modifier)
    }
}
