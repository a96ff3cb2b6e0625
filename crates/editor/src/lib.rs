//! Manipulation core of an interactive 2D scene editor.
//!
//! Gesture events route through the [`manipulator`] into selection, camera,
//! and start-state-relative move/rotate/scale edits on a [`shared::Scene`].
//! Each completed action snapshots the whole scene into a linear
//! [`history::ChangeHistory`]; undo and redo reload the scene from a snapshot
//! and re-resolve the edited subject by id. The [`harness`] and [`command`]
//! modules drive all of it headlessly over JSON.

pub mod clipboard;
pub mod command;
pub mod editor;
pub mod fixtures;
pub mod harness;
pub mod history;
pub mod input;
pub mod manipulator;
pub mod picking;
pub mod selection;
pub mod spaces;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use editor::{Editor, EditorError, HistoryState};
pub use harness::TestHarness;
pub use input::{KeyboardModifiers, ModifierKeys, VirtualModifier};
pub use manipulator::{DragKind, GestureEvent, GizmoHandle, Manipulator};
pub use selection::SelectionSet;
pub use spaces::{Spaces, ViewTransform};
