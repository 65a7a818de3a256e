//! Tool dispatch
//!
//! Maps validated commands onto store, view and measurement operations.
//! Dispatch is total: every input, including unknown action names from AI
//! output, produces a [`DispatchOutcome`] and never panics.

use serde::Serialize;
use serde_json::{Map, Value};
use shared::{
    AxisValues, Command, MeasureKind, MeasureParams, ObjectId, ScaleParams, ToolCall, ToolName,
};

use crate::measure::{self, Measurement};
use crate::state::scene::TransformField;
use crate::state::EditorState;

/// What happened when a command was dispatched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The object collection changed and one snapshot was recorded
    Applied {
        tool: ToolName,
        #[serde(skip_serializing_if = "Option::is_none")]
        object_id: Option<ObjectId>,
    },
    /// A precondition failed (no selection, locked object, history boundary)
    Unchanged { tool: ToolName, reason: String },
    Measured {
        tool: ToolName,
        measurement: Measurement,
    },
    /// Presentation-only tool; `changed` reports whether view state moved
    View { tool: ToolName, changed: bool },
    /// Declared tool without a handler
    Unsupported { tool: ToolName },
    /// Unknown action or unusable parameters
    Rejected { action: String, reason: String },
}

impl DispatchOutcome {
    /// Whether the object collection changed
    pub fn mutated(&self) -> bool {
        matches!(self, DispatchOutcome::Applied { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, DispatchOutcome::Rejected { .. })
    }

    /// One-line summary for chat feedback
    pub fn describe(&self) -> String {
        match self {
            DispatchOutcome::Applied { tool, .. } => format!("Done: {tool}"),
            DispatchOutcome::Unchanged { tool, reason } => format!("{tool}: {reason}"),
            DispatchOutcome::Measured { measurement, .. } => {
                format!("{:?}: {:.3}", measurement.kind, measurement.value)
            }
            DispatchOutcome::View { tool, .. } => format!("View: {tool}"),
            DispatchOutcome::Unsupported { tool } => format!("{tool} is not available yet"),
            DispatchOutcome::Rejected { action, reason } => {
                format!("Could not run '{action}': {reason}")
            }
        }
    }
}

/// Dispatch a named tool with a loose parameter bag
pub fn execute_tool_action(
    state: &mut EditorState,
    name: &str,
    params: Option<&Map<String, Value>>,
) -> DispatchOutcome {
    let action: ToolName = match name.parse() {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!("Ignoring tool action: {e}");
            return DispatchOutcome::Rejected {
                action: name.trim().to_string(),
                reason: e.to_string(),
            };
        }
    };
    if !state.registry.contains(action) {
        tracing::warn!("Ignoring tool action {action}: not in the tool registry");
        return DispatchOutcome::Rejected {
            action: action.to_string(),
            reason: "not in the tool registry".into(),
        };
    }

    let call = ToolCall {
        action,
        params: params.cloned().unwrap_or_default(),
    };
    match Command::from_call(&call) {
        Ok(cmd) => execute_as(state, action, &cmd),
        Err(e) => {
            tracing::warn!("Ignoring tool action: {e}");
            DispatchOutcome::Rejected {
                action: action.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Dispatch an already validated command
pub fn execute(state: &mut EditorState, cmd: &Command) -> DispatchOutcome {
    execute_as(state, cmd.tool_name(), cmd)
}

fn applied_if(tool: ToolName, applied: bool, reason: &str) -> DispatchOutcome {
    if applied {
        DispatchOutcome::Applied {
            tool,
            object_id: None,
        }
    } else {
        DispatchOutcome::Unchanged {
            tool,
            reason: reason.to_string(),
        }
    }
}

const NO_TARGET: &str = "no editable object selected";

/// Dispatch `cmd`, reporting it under `tool` (e.g. `move-x` rather than `move`)
fn execute_as(state: &mut EditorState, tool: ToolName, cmd: &Command) -> DispatchOutcome {
    let scene = &mut state.scene;
    let outcome = match cmd {
        Command::Add {
            shape,
            color,
            position,
        } => {
            let id = scene.add_object_with(*shape, color.as_deref(), *position);
            DispatchOutcome::Applied {
                tool,
                object_id: Some(id),
            }
        }
        Command::DeleteSelected => applied_if(tool, scene.delete_selected(), NO_TARGET),
        Command::DuplicateSelected => match scene.duplicate_selected(state.settings.duplicate_offset) {
            Some(id) => DispatchOutcome::Applied {
                tool,
                object_id: Some(id),
            },
            None => applied_if(tool, false, "nothing selected"),
        },
        Command::Move(values) => applied_if(
            tool,
            scene.set_transform(TransformField::Position, values),
            NO_TARGET,
        ),
        Command::Rotate(degrees) => {
            let radians = AxisValues {
                x: degrees.x.map(f64::to_radians),
                y: degrees.y.map(f64::to_radians),
                z: degrees.z.map(f64::to_radians),
            };
            applied_if(
                tool,
                scene.set_transform(TransformField::Rotation, &radians),
                NO_TARGET,
            )
        }
        Command::Scale(ScaleParams::Absolute(values)) => applied_if(
            tool,
            scene.set_transform(TransformField::Scale, values),
            NO_TARGET,
        ),
        Command::Scale(ScaleParams::Uniform(value)) => applied_if(
            tool,
            scene.set_transform(TransformField::Scale, &AxisValues::all([*value; 3])),
            NO_TARGET,
        ),
        Command::Scale(ScaleParams::Factor(factor)) => {
            applied_if(tool, scene.scale_by(*factor), NO_TARGET)
        }
        Command::ChangeColor(color) => applied_if(tool, scene.update_color(color), NO_TARGET),
        Command::Undo => applied_if(tool, scene.undo(), "nothing to undo"),
        Command::Redo => applied_if(tool, scene.redo(), "nothing to redo"),
        Command::Measure { kind, params } => measure_scene(state, tool, *kind, params),
        Command::View(action) => DispatchOutcome::View {
            tool,
            changed: state.view.apply(action),
        },
        Command::Geometry { tool, .. } => {
            tracing::warn!("{tool} is declared but has no handler yet");
            DispatchOutcome::Unsupported { tool: *tool }
        }
    };

    match &outcome {
        DispatchOutcome::Applied { .. } => tracing::debug!("{tool} applied"),
        DispatchOutcome::Unchanged { reason, .. } => tracing::debug!("{tool} skipped: {reason}"),
        _ => {}
    }
    outcome
}

fn measure_scene(
    state: &EditorState,
    tool: ToolName,
    kind: MeasureKind,
    params: &MeasureParams,
) -> DispatchOutcome {
    let scene = &state.scene;
    let unchanged = |reason: String| DispatchOutcome::Unchanged { tool, reason };

    let from = params
        .from
        .as_deref()
        .or_else(|| scene.selected_id().map(String::as_str));
    let Some(a) = from.and_then(|id| scene.get(id)) else {
        return unchanged("no object to measure".into());
    };

    let (value, objects) = match kind {
        MeasureKind::Volume | MeasureKind::Area => {
            let value = if kind == MeasureKind::Volume {
                measure::volume(a)
            } else {
                measure::area(a)
            };
            match value {
                Some(v) => (v, vec![a.id.clone()]),
                None => return unchanged(format!("{kind:?} is not defined for {}", a.kind)),
            }
        }
        MeasureKind::Distance => {
            let b = match params.to.as_deref() {
                Some(id) => scene.get(id),
                None => measure::nearest(a, scene.objects()),
            };
            match b {
                Some(b) if b.id != a.id => (measure::distance(a, b), vec![a.id.clone(), b.id.clone()]),
                _ => return unchanged("no second object to measure to".into()),
            }
        }
    };

    DispatchOutcome::Measured {
        tool,
        measurement: Measurement {
            kind,
            value,
            objects,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{box_at, editor_with};
    use serde_json::json;
    use shared::ObjectType;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_every_tool_has_defined_outcome() {
        for tool in ToolName::ALL {
            let mut state = EditorState::new();
            let id = state.scene.objects()[0].id.clone();
            state.scene.select(Some(&id));
            // Must not panic, with and without params
            let _ = execute_tool_action(&mut state, tool.as_str(), None);
            let _ = execute_tool_action(&mut state, tool.as_str(), Some(&params(json!({"value": 1}))));
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut state = EditorState::new();
        let before = state.scene.objects().to_vec();
        let outcome = execute_tool_action(&mut state, "launch-rocket", None);
        assert!(outcome.is_rejected());
        assert_eq!(state.scene.objects(), before.as_slice());
    }

    #[test]
    fn test_add_reports_new_id() {
        let mut state = EditorState::new();
        let outcome = execute_tool_action(&mut state, "add-sphere", None);
        match outcome {
            DispatchOutcome::Applied {
                tool: ToolName::AddSphere,
                object_id: Some(id),
            } => assert_eq!(state.scene.selected_id(), Some(&id)),
            other => panic!("Expected Applied, got {other:?}"),
        }
    }

    #[test]
    fn test_rotate_converts_degrees() {
        let mut state = editor_with(vec![box_at("a", [0.0; 3])]);
        state.scene.select(Some("a"));
        let outcome = execute_tool_action(&mut state, "rotate-y", Some(&params(json!({"value": 90}))));
        assert!(matches!(outcome, DispatchOutcome::Applied { tool: ToolName::RotateY, .. }));
        let rot = state.scene.get("a").unwrap().rotation;
        assert!((rot[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_change_color_without_color_is_rejected() {
        let mut state = editor_with(vec![box_at("a", [0.0; 3])]);
        state.scene.select(Some("a"));
        let outcome = execute_tool_action(&mut state, "change-color", None);
        assert!(outcome.is_rejected());
        assert!(state.scene.history().is_empty());
    }

    #[test]
    fn test_precondition_failures_are_unchanged() {
        let mut state = EditorState::new();
        assert!(matches!(
            execute_tool_action(&mut state, "delete-selected", None),
            DispatchOutcome::Unchanged { .. }
        ));
        assert!(matches!(
            execute_tool_action(&mut state, "undo", None),
            DispatchOutcome::Unchanged { .. }
        ));
        assert!(state.scene.history().is_empty());
    }

    #[test]
    fn test_view_tools_do_not_touch_history() {
        let mut state = EditorState::new();
        let outcome = execute_tool_action(&mut state, "view-wireframe", None);
        assert_eq!(
            outcome,
            DispatchOutcome::View {
                tool: ToolName::ViewWireframe,
                changed: true
            }
        );
        execute_tool_action(&mut state, "reset-camera", None);
        assert!(state.scene.history().is_empty());
        assert_eq!(state.view.camera_resets, 1);
    }

    #[test]
    fn test_geometry_tools_unsupported() {
        let mut state = EditorState::new();
        let outcome = execute_tool_action(&mut state, "union", None);
        assert_eq!(outcome, DispatchOutcome::Unsupported { tool: ToolName::Union });
        assert!(state.scene.history().is_empty());
    }

    #[test]
    fn test_measure_defaults_to_selection_and_nearest() {
        let mut state = editor_with(vec![
            box_at("a", [0.0, 0.0, 0.0]),
            box_at("b", [0.0, 0.0, 2.0]),
            box_at("c", [10.0, 0.0, 0.0]),
        ]);
        state.scene.select(Some("a"));
        match execute_tool_action(&mut state, "measure-distance", None) {
            DispatchOutcome::Measured { measurement, .. } => {
                assert_eq!(measurement.value, 2.0);
                assert_eq!(measurement.objects, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected Measured, got {other:?}"),
        }

        let explicit = params(json!({"from": "b", "to": "c"}));
        match execute_tool_action(&mut state, "measure-distance", Some(&explicit)) {
            DispatchOutcome::Measured { measurement, .. } => {
                assert!((measurement.value - 104f64.sqrt()).abs() < 1e-12)
            }
            other => panic!("Expected Measured, got {other:?}"),
        }

        match execute(
            &mut state,
            &Command::Measure {
                kind: MeasureKind::Volume,
                params: MeasureParams::default(),
            },
        ) {
            DispatchOutcome::Measured { measurement, .. } => assert_eq!(measurement.value, 1.0),
            other => panic!("Expected Measured, got {other:?}"),
        }
        assert!(state.scene.history().is_empty());
    }

    #[test]
    fn test_measure_without_target() {
        let mut state = EditorState::new();
        assert!(matches!(
            execute_tool_action(&mut state, "measure-area", None),
            DispatchOutcome::Unchanged { .. }
        ));
    }

    #[test]
    fn test_duplicate_uses_configured_offset() {
        let mut state = editor_with(vec![box_at("a", [0.0, 0.5, 0.0])]);
        state.settings.duplicate_offset = 2.0;
        state.scene.select(Some("a"));
        match execute_tool_action(&mut state, "duplicate-selected", None) {
            DispatchOutcome::Applied {
                object_id: Some(id),
                ..
            } => {
                let copy = state.scene.get(&id).unwrap();
                assert_eq!(copy.position, [2.0, 0.5, 0.0]);
                assert_eq!(copy.kind, ObjectType::Box);
            }
            other => panic!("Expected Applied, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(DispatchOutcome::Unsupported {
            tool: ToolName::Bisect,
        })
        .unwrap();
        assert_eq!(json, json!({"outcome": "unsupported", "tool": "bisect"}));
    }
}
