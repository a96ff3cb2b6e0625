//! JSON command protocol for driving the editor headlessly.
//!
//! Commands arrive as single JSON objects or arrays of them, run against a
//! `TestHarness`, and answer with a uniform `CommandResponse`. Recoverable
//! action failures (an empty clipboard, a bad manifest) come back as
//! unsuccessful responses, never panics.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared::SceneNode;

use crate::harness::TestHarness;
use crate::input::VirtualModifier;
use crate::manipulator::GestureEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSpec {
    Sprite { width: f32, height: f32 },
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    Inspect,
    CreateNode {
        name: String,
        node: NodeSpec,
        #[serde(default)]
        position: Option<[f32; 2]>,
    },
    Select {
        ids: Vec<String>,
    },
    ToggleSelect {
        id: String,
    },
    SelectAll,
    ClearSelection,
    DeleteSelected,
    CopySelected,
    CutSelected,
    Paste,
    DuplicateSelected,
    GroupSelected,
    UngroupSelected,
    LockSelected,
    UnlockAll,
    Nudge {
        dx: f32,
        dy: f32,
    },
    Undo,
    Redo,
    EditChild {
        id: String,
    },
    EditParent,
    SetModifier {
        modifier: VirtualModifier,
        down: bool,
    },
    Gesture {
        #[serde(flatten)]
        event: GestureEvent,
    },
    ExportScene,
    LoadScene {
        snapshot: String,
    },
    Clear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn ok_empty() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            data: None,
        }
    }
}

/// Parse and run one command. The outer `Err` is reserved for JSON that is
/// not a command at all.
pub fn execute_json(h: &mut TestHarness, json_str: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand = serde_json::from_str(json_str)
        .map_err(|e| format!("Invalid command JSON: {}", e))?;
    Ok(execute(h, cmd))
}

/// Parse and run a JSON array of commands, in order.
pub fn execute_json_batch(
    h: &mut TestHarness,
    json_str: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> = serde_json::from_str(json_str)
        .map_err(|e| format!("Invalid command JSON: {}", e))?;
    Ok(cmds.into_iter().map(|cmd| execute(h, cmd)).collect())
}

pub fn execute(h: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    tracing::debug!(?cmd, "executing command");
    match cmd {
        AgentCommand::Inspect => inspect(h),
        AgentCommand::CreateNode {
            name,
            node,
            position,
        } => {
            let node = match node {
                NodeSpec::Sprite { width, height } => {
                    SceneNode::sprite(name, Vec2::new(width, height))
                }
                NodeSpec::Group => SceneNode::group(name),
            };
            let at_view = position.map(|[x, y]| Vec2::new(x, y));
            let id = h.editor.spawn_node(node, at_view);
            CommandResponse::ok(json!({ "id": id }))
        }
        AgentCommand::Select { ids } => {
            h.editor.deselect_all();
            for id in &ids {
                h.editor.selection.select(&h.editor.scene, id);
            }
            CommandResponse::ok(json!({ "selected": h.selected_ids() }))
        }
        AgentCommand::ToggleSelect { id } => {
            let selected = h.editor.toggle_selection(&id);
            CommandResponse::ok(json!({ "selected": selected }))
        }
        AgentCommand::SelectAll => {
            h.editor.select_all();
            CommandResponse::ok(json!({ "selected": h.selected_ids() }))
        }
        AgentCommand::ClearSelection => {
            h.editor.deselect_all();
            CommandResponse::ok_empty()
        }
        AgentCommand::DeleteSelected => {
            let removed = h.editor.delete_selected();
            CommandResponse::ok(json!({ "removed": removed }))
        }
        AgentCommand::CopySelected => {
            let copied = h.editor.copy_selected();
            CommandResponse::ok(json!({ "copied": copied }))
        }
        AgentCommand::CutSelected => {
            let cut = h.editor.cut_selected();
            CommandResponse::ok(json!({ "cut": cut }))
        }
        AgentCommand::Paste => match h.editor.paste() {
            Ok(ids) => CommandResponse::ok(json!({ "pasted": ids })),
            Err(err) => CommandResponse::err(err.to_string()),
        },
        AgentCommand::DuplicateSelected => match h.editor.duplicate_selected() {
            Ok(ids) => {
                // Standalone duplication is its own undo step.
                if !ids.is_empty() {
                    h.editor.save_history_state();
                }
                CommandResponse::ok(json!({ "duplicated": ids }))
            }
            Err(err) => CommandResponse::err(err.to_string()),
        },
        AgentCommand::GroupSelected => match h.editor.group_selected() {
            Some(id) => CommandResponse::ok(json!({ "group": id })),
            None => CommandResponse::err("nothing selected to group"),
        },
        AgentCommand::UngroupSelected => {
            let freed = h.editor.ungroup_selected();
            CommandResponse::ok(json!({ "freed": freed }))
        }
        AgentCommand::LockSelected => {
            let locked = h.editor.lock_selected();
            CommandResponse::ok(json!({ "locked": locked }))
        }
        AgentCommand::UnlockAll => {
            let unlocked = h.editor.unlock_all_children();
            CommandResponse::ok(json!({ "unlocked": unlocked }))
        }
        AgentCommand::Nudge { dx, dy } => {
            h.editor.nudge_selected(Vec2::new(dx, dy));
            CommandResponse::ok_empty()
        }
        AgentCommand::Undo => {
            let undone = h.editor.undo();
            CommandResponse::ok(json!({ "undone": undone }))
        }
        AgentCommand::Redo => {
            let redone = h.editor.redo();
            CommandResponse::ok(json!({ "redone": redone }))
        }
        AgentCommand::EditChild { id } => {
            if h.editor.edit_child(&id) {
                CommandResponse::ok(json!({ "edited": id }))
            } else {
                CommandResponse::err(format!("not an editable container: {}", id))
            }
        }
        AgentCommand::EditParent => {
            h.editor.edit_parent();
            CommandResponse::ok(json!({ "edited": h.editor.edited() }))
        }
        AgentCommand::SetModifier { modifier, down } => {
            h.set_modifier(modifier, down);
            CommandResponse::ok_empty()
        }
        AgentCommand::Gesture { event } => {
            h.event(event);
            CommandResponse::ok_empty()
        }
        AgentCommand::ExportScene => match h.export_scene() {
            Ok(snapshot) => CommandResponse::ok(json!({ "snapshot": snapshot })),
            Err(err) => CommandResponse::err(err.to_string()),
        },
        AgentCommand::LoadScene { snapshot } => match h.load_scene_json(&snapshot) {
            Ok(()) => CommandResponse::ok_empty(),
            Err(err) => CommandResponse::err(err.to_string()),
        },
        AgentCommand::Clear => {
            h.editor.replace_scene(shared::Scene::new());
            h.editor.clear_history();
            CommandResponse::ok_empty()
        }
    }
}

fn inspect(h: &TestHarness) -> CommandResponse {
    let children: Vec<Value> = h
        .editor
        .edited_node()
        .children
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "position": [c.transform.position.x, c.transform.position.y],
                "rotation": c.transform.rotation_degrees,
                "scale": [c.transform.scale.x, c.transform.scale.y],
                "visible": c.visible,
                "locked": c.locked,
                "container": c.is_container(),
            })
        })
        .collect();
    CommandResponse::ok(json!({
        "node_count": h.node_count(),
        "edited": h.editor.edited(),
        "children": children,
        "selection": h.selected_ids(),
        "history": {
            "states": h.editor.history_len(),
            "index": h.editor.history_index(),
        },
        "view": {
            "pan": [h.editor.view.pan.x, h.editor.view.pan.y],
            "zoom": h.editor.view.zoom,
        },
    }))
}
