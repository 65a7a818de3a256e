//! JSON command protocol for headless driving and AI agents.
//!
//! One JSON object per request, tagged by `command`; a JSON array is a batch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared::SceneObject;

use crate::state::{object_display_name, EditorState, Feedback};

/// A command the agent can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Dispatch a tool action with optional parameters
    Tool {
        action: String,
        #[serde(default)]
        params: Option<Map<String, Value>>,
    },
    /// Free text, parsed like a chat message
    Say { text: String },
    /// Select one object by id
    Select { id: String },
    ClearSelection,
    /// Remove every object
    Clear,
    /// Summary of objects, selection and history
    Inspect,
    /// The live collection as scene JSON
    ExportScene,
    /// Replace the collection with the given objects
    LoadScene { objects: Vec<SceneObject> },
    /// The tool catalogue
    ListTools,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn err_with_data(msg: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: Some(data),
        }
    }
}

fn to_data(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Execute a single command on the editor.
pub fn execute_command(state: &mut EditorState, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::Tool { action, params } => {
            let outcome = state.execute_tool_action(&action, params.as_ref());
            if outcome.is_rejected() {
                CommandResponse::err_with_data(outcome.describe(), to_data(&outcome))
            } else {
                CommandResponse::ok_with_data(to_data(&outcome))
            }
        }

        AgentCommand::Say { text } => match state.submit_text(&text) {
            Feedback::Command { outcome } if outcome.is_rejected() => {
                CommandResponse::err_with_data(outcome.describe(), to_data(&outcome))
            }
            feedback => CommandResponse::ok_with_data(to_data(&feedback)),
        },

        AgentCommand::Select { id } => {
            if state.scene.select(Some(&id)) {
                CommandResponse::ok_with_data(json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("no object with id '{id}'"))
            }
        }

        AgentCommand::ClearSelection => {
            state.scene.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::Clear => {
            let cleared = state.scene.clear();
            CommandResponse::ok_with_data(json!({ "cleared": cleared }))
        }

        AgentCommand::Inspect => {
            let objects: Vec<Value> = state
                .scene
                .objects()
                .iter()
                .map(|obj| {
                    json!({
                        "id": obj.id,
                        "label": object_display_name(obj),
                        "type": obj.kind,
                        "position": obj.position,
                        "rotation": obj.rotation,
                        "scale": obj.scale,
                        "color": obj.color,
                        "visible": obj.visible,
                        "locked": obj.locked,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected_id": state.scene.selected_id(),
                "history_len": state.scene.history().len(),
                "history_index": state.scene.history_index(),
                "view": state.view,
            }))
        }

        AgentCommand::ExportScene => match state.scene.export_json() {
            Ok(json) => CommandResponse::ok_with_data(json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(format!("export failed: {e}")),
        },

        AgentCommand::LoadScene { objects } => match state.scene.load_objects(objects) {
            Ok(count) => CommandResponse::ok_with_data(json!({ "loaded": count })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ListTools => {
            CommandResponse::ok_with_data(to_data(state.registry.categories()))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(state: &mut EditorState, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(state, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    state: &mut EditorState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(state, cmd))
        .collect())
}
