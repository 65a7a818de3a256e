//! Integration tests for the agent JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use conceivin_studio_lib::command::{execute_json, execute_json_batch};
use conceivin_studio_lib::fixtures::*;
use conceivin_studio_lib::state::EditorState;

#[test]
fn test_command_tool_with_params() {
    let mut state = editor_two_boxes();
    let resp = execute_json(
        &mut state,
        r#"{"command": "tool", "action": "move", "params": {"position": [4, 5, 6]}}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(state.scene.get("a").unwrap().position, [4.0, 5.0, 6.0]);
    assert_eq!(state.scene.history().len(), 1);
}

#[test]
fn test_command_tool_invalid_params() {
    let mut state = editor_two_boxes();
    let resp = execute_json(
        &mut state,
        r#"{"command": "tool", "action": "change-color", "params": {"color": "sort of teal"}}"#,
    )
    .unwrap();
    assert!(!resp.success);
    assert_eq!(resp.data.unwrap()["outcome"], "rejected");
    assert!(state.scene.history().is_empty());
}

#[test]
fn test_command_say() {
    let mut state = EditorState::new();
    let resp = execute_json(&mut state, r#"{"command": "say", "text": "add a purple cone"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["kind"], "command");
    assert_eq!(data["outcome"]["tool"], "add-cone");

    let resp = execute_json(&mut state, r#"{"command": "say", "text": "thanks!"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["kind"], "conversation");
}

#[test]
fn test_command_select_then_delete() {
    let mut state = editor_two_boxes();
    let responses = execute_json_batch(
        &mut state,
        r#"[
            {"command": "select", "id": "b"},
            {"command": "tool", "action": "delete-selected"},
            {"command": "inspect"}
        ]"#,
    )
    .unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.success));
    let data = responses[2].data.as_ref().unwrap();
    assert_eq!(data["object_count"], 1);
    assert!(data["selected_id"].is_null());
}

#[test]
fn test_command_export_and_load_scene() {
    let mut source = editor_two_boxes();
    let resp = execute_json(&mut source, r#"{"command": "export_scene"}"#).unwrap();
    let scene_json = resp.data.unwrap()["scene_json"].as_str().unwrap().to_string();
    assert!(scene_json.contains("\"objects\""));

    let file: serde_json::Value = serde_json::from_str(&scene_json).unwrap();
    let request = serde_json::json!({"command": "load_scene", "objects": file["objects"]});
    let mut target = EditorState::new();
    let resp = execute_json(&mut target, &request.to_string()).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["loaded"], 2);
    assert!(target.scene.contains("a") && target.scene.contains("b"));
}

#[test]
fn test_command_load_scene_duplicate_ids() {
    let mut state = EditorState::new();
    let obj = serde_json::to_value(box_at("dup", [0.0; 3])).unwrap();
    let request = serde_json::json!({"command": "load_scene", "objects": [obj.clone(), obj]});
    let resp = execute_json(&mut state, &request.to_string()).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("dup"));
}

#[test]
fn test_command_undo_redo_via_tools() {
    let mut state = EditorState::new();
    execute_json(&mut state, r#"{"command": "tool", "action": "add-plane"}"#).unwrap();
    assert_eq!(state.scene.len(), 2);

    let resp = execute_json(&mut state, r#"{"command": "tool", "action": "undo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["outcome"], "applied");
    assert_eq!(state.scene.len(), 1);

    let resp = execute_json(&mut state, r#"{"command": "tool", "action": "undo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["outcome"], "unchanged");

    execute_json(&mut state, r#"{"command": "tool", "action": "redo"}"#).unwrap();
    assert_eq!(state.scene.len(), 2);
}

#[test]
fn test_command_clear_and_list_tools() {
    let mut state = EditorState::new();
    let resp = execute_json(&mut state, r#"{"command": "clear"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["cleared"], true);
    assert!(state.scene.is_empty());

    let resp = execute_json(&mut state, r#"{"command": "list_tools"}"#).unwrap();
    let categories = resp.data.unwrap();
    assert_eq!(categories[0]["name"], "Shapes");
}

#[test]
fn test_batch_invalid_json() {
    let mut state = EditorState::new();
    assert!(execute_json_batch(&mut state, r#"[{"command": "nope"}]"#).is_err());
}
