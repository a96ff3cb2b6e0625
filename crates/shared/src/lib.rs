//! Scene model shared by the editor core and its embedders.
//!
//! Holds the scene graph, 2D transforms, bounds geometry, and the snapshot
//! codec. No editor state lives here.

pub mod codec;
pub mod geometry;
pub mod scene;
pub mod transform;

pub use codec::{deserialize_scene, serialize_scene, CodecError};
pub use geometry::Rect;
pub use scene::{new_node_id, NodeId, NodeKind, Scene, SceneError, SceneNode};
pub use transform::{rotate_degrees, Transform2D};
