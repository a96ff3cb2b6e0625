//! Scene snapshot codec.
//!
//! Snapshots are self-contained JSON documents. Node ids are serialized with
//! the rest of the node state, so a node edited before a snapshot can be found
//! again by id after the snapshot is restored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snapshot parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Current snapshot document revision.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    scene: Scene,
}

/// Serialize a scene to a snapshot string. Infallible for well-formed scenes;
/// a serializer error here means the process state is already corrupt.
pub fn serialize_scene(scene: &Scene) -> Result<String, CodecError> {
    let doc = SnapshotDocument {
        version: SNAPSHOT_VERSION,
        scene: scene.clone(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Rebuild a scene from a snapshot string. Produces fresh node structures;
/// callers holding ids must re-resolve them against the returned scene.
pub fn deserialize_scene(snapshot: &str) -> Result<Scene, CodecError> {
    let doc: SnapshotDocument = serde_json::from_str(snapshot)?;
    Ok(doc.scene)
}
