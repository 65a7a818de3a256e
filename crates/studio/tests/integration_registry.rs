//! Integration tests tying the tool registry to the vocabulary and dispatcher.

use conceivin_studio_lib::dispatch::DispatchOutcome;
use conceivin_studio_lib::parser::parse_command;
use conceivin_studio_lib::registry::ToolRegistry;
use conceivin_studio_lib::state::EditorState;
use shared::ToolName;

#[test]
fn test_every_tool_name_registered() {
    let registry = ToolRegistry::new();
    for tool in ToolName::ALL {
        assert!(registry.find(tool).is_some(), "{tool} missing from registry");
    }
}

#[test]
fn test_parser_output_is_registered() {
    let registry = ToolRegistry::new();
    let phrases = [
        "add a box",
        "delete it",
        "make it red",
        "bigger",
        "smaller",
        "move to [1, 2, 3]",
        "wireframe",
        "shaded",
        "reset camera",
        "undo",
        "redo",
        "duplicate",
        "measure the volume",
        "surface area",
        "distance",
    ];
    for phrase in phrases {
        let cmd = parse_command(phrase).unwrap_or_else(|| panic!("{phrase:?} not parsed"));
        assert!(registry.contains(cmd.tool_name()), "{phrase:?}");
    }
}

#[test]
fn test_registered_tools_dispatch_by_name() {
    for tool in ToolRegistry::new().tools() {
        let mut state = EditorState::new();
        let outcome = state.execute_tool_action(tool.action.as_str(), None);
        if tool.action.is_implemented() {
            assert!(
                !matches!(outcome, DispatchOutcome::Unsupported { .. }),
                "{} reported unsupported",
                tool.action
            );
        } else {
            assert_eq!(outcome, DispatchOutcome::Unsupported { tool: tool.action });
        }
    }
}
