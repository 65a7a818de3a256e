//! Command vocabulary: the closed set of tool names, the wire-level
//! `{action, params}` call and the strongly typed `Command` union.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color::resolve_color;
use crate::{Axis, ObjectId, ObjectType, Vec3};

/// Every action the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolName {
    // ── Creation ──
    AddBox,
    AddSphere,
    AddCylinder,
    AddCone,
    AddTorus,
    AddPlane,
    AddWedge,

    // ── Lifecycle ──
    DeleteSelected,
    DuplicateSelected,

    // ── Transform ──
    Move,
    MoveX,
    MoveY,
    MoveZ,
    #[serde(rename = "move-3d")]
    Move3d,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    ScaleX,
    ScaleY,
    ScaleZ,
    ScaleUniform,
    ChangeColor,

    // ── History ──
    Undo,
    Redo,

    // ── Measurement ──
    MeasureDistance,
    MeasureVolume,
    MeasureArea,

    // ── View ──
    ResetCamera,
    ViewWireframe,
    ViewShaded,
    AnimateScene,
    ChangeCamera,

    // ── Help & UI ──
    ShowHelp,
    DisplayProperties,

    // ── Geometry operations ──
    Union,
    Subtract,
    Intersect,
    DuplicateThenBoolean,
    Extrude,
    ExtrudeEdges,
    Bevel,
    BevelEdges,
    Fillet,
    Revolve,
    LoopCutAndSlide,
    OffsetEdgeSlide,
    KnifeTopologyTool,
    Bisect,
    RotateEdgeCw,
    RotateEdgeCcw,
    EdgeCrease,
    EdgeBevelWeight,
    MarkSeam,
    ClearSeam,
    MarkSharp,
    ClearSharp,
    SetSharpnessByAngle,

    // ── Mesh editing ──
    Subdivide,
    UnSubdivide,
    EdgeSplit,
    EdgeCollapse,
    EdgeLoop,
    BridgeEdges,
    BridgeEdgeLoops,
    DissolveEdges,
    Split,
    Separate,
    DeleteEdges,
    BridgeCurves,
    ImprintCurve,
}

/// Conceptual grouping of tool names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolGroup {
    Creation,
    Lifecycle,
    Transform,
    History,
    Measurement,
    View,
    Help,
    Geometry,
    MeshEditing,
}

impl ToolName {
    pub const ALL: [ToolName; 72] = [
        ToolName::AddBox,
        ToolName::AddSphere,
        ToolName::AddCylinder,
        ToolName::AddCone,
        ToolName::AddTorus,
        ToolName::AddPlane,
        ToolName::AddWedge,
        ToolName::DeleteSelected,
        ToolName::DuplicateSelected,
        ToolName::Move,
        ToolName::MoveX,
        ToolName::MoveY,
        ToolName::MoveZ,
        ToolName::Move3d,
        ToolName::Rotate,
        ToolName::RotateX,
        ToolName::RotateY,
        ToolName::RotateZ,
        ToolName::Scale,
        ToolName::ScaleX,
        ToolName::ScaleY,
        ToolName::ScaleZ,
        ToolName::ScaleUniform,
        ToolName::ChangeColor,
        ToolName::Undo,
        ToolName::Redo,
        ToolName::MeasureDistance,
        ToolName::MeasureVolume,
        ToolName::MeasureArea,
        ToolName::ResetCamera,
        ToolName::ViewWireframe,
        ToolName::ViewShaded,
        ToolName::AnimateScene,
        ToolName::ChangeCamera,
        ToolName::ShowHelp,
        ToolName::DisplayProperties,
        ToolName::Union,
        ToolName::Subtract,
        ToolName::Intersect,
        ToolName::DuplicateThenBoolean,
        ToolName::Extrude,
        ToolName::ExtrudeEdges,
        ToolName::Bevel,
        ToolName::BevelEdges,
        ToolName::Fillet,
        ToolName::Revolve,
        ToolName::LoopCutAndSlide,
        ToolName::OffsetEdgeSlide,
        ToolName::KnifeTopologyTool,
        ToolName::Bisect,
        ToolName::RotateEdgeCw,
        ToolName::RotateEdgeCcw,
        ToolName::EdgeCrease,
        ToolName::EdgeBevelWeight,
        ToolName::MarkSeam,
        ToolName::ClearSeam,
        ToolName::MarkSharp,
        ToolName::ClearSharp,
        ToolName::SetSharpnessByAngle,
        ToolName::Subdivide,
        ToolName::UnSubdivide,
        ToolName::EdgeSplit,
        ToolName::EdgeCollapse,
        ToolName::EdgeLoop,
        ToolName::BridgeEdges,
        ToolName::BridgeEdgeLoops,
        ToolName::DissolveEdges,
        ToolName::Split,
        ToolName::Separate,
        ToolName::DeleteEdges,
        ToolName::BridgeCurves,
        ToolName::ImprintCurve,
    ];

    /// Kebab-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AddBox => "add-box",
            ToolName::AddSphere => "add-sphere",
            ToolName::AddCylinder => "add-cylinder",
            ToolName::AddCone => "add-cone",
            ToolName::AddTorus => "add-torus",
            ToolName::AddPlane => "add-plane",
            ToolName::AddWedge => "add-wedge",
            ToolName::DeleteSelected => "delete-selected",
            ToolName::DuplicateSelected => "duplicate-selected",
            ToolName::Move => "move",
            ToolName::MoveX => "move-x",
            ToolName::MoveY => "move-y",
            ToolName::MoveZ => "move-z",
            ToolName::Move3d => "move-3d",
            ToolName::Rotate => "rotate",
            ToolName::RotateX => "rotate-x",
            ToolName::RotateY => "rotate-y",
            ToolName::RotateZ => "rotate-z",
            ToolName::Scale => "scale",
            ToolName::ScaleX => "scale-x",
            ToolName::ScaleY => "scale-y",
            ToolName::ScaleZ => "scale-z",
            ToolName::ScaleUniform => "scale-uniform",
            ToolName::ChangeColor => "change-color",
            ToolName::Undo => "undo",
            ToolName::Redo => "redo",
            ToolName::MeasureDistance => "measure-distance",
            ToolName::MeasureVolume => "measure-volume",
            ToolName::MeasureArea => "measure-area",
            ToolName::ResetCamera => "reset-camera",
            ToolName::ViewWireframe => "view-wireframe",
            ToolName::ViewShaded => "view-shaded",
            ToolName::AnimateScene => "animate-scene",
            ToolName::ChangeCamera => "change-camera",
            ToolName::ShowHelp => "show-help",
            ToolName::DisplayProperties => "display-properties",
            ToolName::Union => "union",
            ToolName::Subtract => "subtract",
            ToolName::Intersect => "intersect",
            ToolName::DuplicateThenBoolean => "duplicate-then-boolean",
            ToolName::Extrude => "extrude",
            ToolName::ExtrudeEdges => "extrude-edges",
            ToolName::Bevel => "bevel",
            ToolName::BevelEdges => "bevel-edges",
            ToolName::Fillet => "fillet",
            ToolName::Revolve => "revolve",
            ToolName::LoopCutAndSlide => "loop-cut-and-slide",
            ToolName::OffsetEdgeSlide => "offset-edge-slide",
            ToolName::KnifeTopologyTool => "knife-topology-tool",
            ToolName::Bisect => "bisect",
            ToolName::RotateEdgeCw => "rotate-edge-cw",
            ToolName::RotateEdgeCcw => "rotate-edge-ccw",
            ToolName::EdgeCrease => "edge-crease",
            ToolName::EdgeBevelWeight => "edge-bevel-weight",
            ToolName::MarkSeam => "mark-seam",
            ToolName::ClearSeam => "clear-seam",
            ToolName::MarkSharp => "mark-sharp",
            ToolName::ClearSharp => "clear-sharp",
            ToolName::SetSharpnessByAngle => "set-sharpness-by-angle",
            ToolName::Subdivide => "subdivide",
            ToolName::UnSubdivide => "un-subdivide",
            ToolName::EdgeSplit => "edge-split",
            ToolName::EdgeCollapse => "edge-collapse",
            ToolName::EdgeLoop => "edge-loop",
            ToolName::BridgeEdges => "bridge-edges",
            ToolName::BridgeEdgeLoops => "bridge-edge-loops",
            ToolName::DissolveEdges => "dissolve-edges",
            ToolName::Split => "split",
            ToolName::Separate => "separate",
            ToolName::DeleteEdges => "delete-edges",
            ToolName::BridgeCurves => "bridge-curves",
            ToolName::ImprintCurve => "imprint-curve",
        }
    }

    pub fn group(&self) -> ToolGroup {
        use ToolName::*;
        match self {
            AddBox | AddSphere | AddCylinder | AddCone | AddTorus | AddPlane | AddWedge => {
                ToolGroup::Creation
            }
            DeleteSelected | DuplicateSelected => ToolGroup::Lifecycle,
            Move | MoveX | MoveY | MoveZ | Move3d | Rotate | RotateX | RotateY | RotateZ
            | Scale | ScaleX | ScaleY | ScaleZ | ScaleUniform | ChangeColor => ToolGroup::Transform,
            Undo | Redo => ToolGroup::History,
            MeasureDistance | MeasureVolume | MeasureArea => ToolGroup::Measurement,
            ResetCamera | ViewWireframe | ViewShaded | AnimateScene | ChangeCamera => {
                ToolGroup::View
            }
            ShowHelp | DisplayProperties => ToolGroup::Help,
            Union | Subtract | Intersect | DuplicateThenBoolean | Extrude | ExtrudeEdges
            | Bevel | BevelEdges | Fillet | Revolve | LoopCutAndSlide | OffsetEdgeSlide
            | KnifeTopologyTool | Bisect | RotateEdgeCw | RotateEdgeCcw | EdgeCrease
            | EdgeBevelWeight | MarkSeam | ClearSeam | MarkSharp | ClearSharp
            | SetSharpnessByAngle => ToolGroup::Geometry,
            Subdivide | UnSubdivide | EdgeSplit | EdgeCollapse | EdgeLoop | BridgeEdges
            | BridgeEdgeLoops | DissolveEdges | Split | Separate | DeleteEdges | BridgeCurves
            | ImprintCurve => ToolGroup::MeshEditing,
        }
    }

    /// Whether dispatching this tool can change the object collection
    pub fn mutates_scene(&self) -> bool {
        matches!(
            self.group(),
            ToolGroup::Creation | ToolGroup::Lifecycle | ToolGroup::Transform | ToolGroup::History
        )
    }

    /// Geometry and mesh-editing tools are declared but have no handler yet
    pub fn is_implemented(&self) -> bool {
        !matches!(self.group(), ToolGroup::Geometry | ToolGroup::MeshEditing)
    }

    /// The primitive created by an `add-*` tool
    pub fn creates(&self) -> Option<ObjectType> {
        match self {
            ToolName::AddBox => Some(ObjectType::Box),
            ToolName::AddSphere => Some(ObjectType::Sphere),
            ToolName::AddCylinder => Some(ObjectType::Cylinder),
            ToolName::AddCone => Some(ObjectType::Cone),
            ToolName::AddTorus => Some(ObjectType::Torus),
            ToolName::AddPlane => Some(ObjectType::Plane),
            ToolName::AddWedge => Some(ObjectType::Wedge),
            _ => None,
        }
    }

    /// The `add-*` tool for a primitive type, if it has one
    pub fn add_tool_for(kind: ObjectType) -> Option<ToolName> {
        match kind {
            ObjectType::Box => Some(ToolName::AddBox),
            ObjectType::Sphere => Some(ToolName::AddSphere),
            ObjectType::Cylinder => Some(ToolName::AddCylinder),
            ObjectType::Cone => Some(ToolName::AddCone),
            ObjectType::Torus => Some(ToolName::AddTorus),
            ObjectType::Plane => Some(ToolName::AddPlane),
            ObjectType::Wedge => Some(ToolName::AddWedge),
            _ => None,
        }
    }

    /// The fixed axis of a per-axis transform tool
    fn fixed_axis(&self) -> Option<Axis> {
        match self {
            ToolName::MoveX | ToolName::RotateX | ToolName::ScaleX => Some(Axis::X),
            ToolName::MoveY | ToolName::RotateY | ToolName::ScaleY => Some(Axis::Y),
            ToolName::MoveZ | ToolName::RotateZ | ToolName::ScaleZ => Some(Axis::Z),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ToolName::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CommandError::UnknownAction(needle.to_string()))
    }
}

/// Failures at the command boundary (parsing AI output or agent JSON)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("command has no 'action' or 'name' field")]
    MissingAction,
    #[error("command payload must be a JSON object")]
    NotAnObject,
    #[error("invalid parameters for '{action}': {reason}")]
    InvalidParams { action: ToolName, reason: String },
}

/// Wire form of a command: `{ "action": ..., "params": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(alias = "name")]
    pub action: ToolName,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl ToolCall {
    pub fn new(action: ToolName) -> Self {
        Self {
            action,
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Read a call out of loosely shaped JSON.
    ///
    /// Accepts `action` or `name` for the tool and `params`, `parameters` or
    /// `arguments` for the parameter bag. A missing or `null` bag is empty.
    pub fn from_value(value: &Value) -> Result<Self, CommandError> {
        let obj = value.as_object().ok_or(CommandError::NotAnObject)?;
        let name = obj
            .get("action")
            .or_else(|| obj.get("name"))
            .ok_or(CommandError::MissingAction)?;
        let name = name
            .as_str()
            .ok_or_else(|| CommandError::UnknownAction(name.to_string()))?;
        let action: ToolName = name.parse()?;

        let bag = ["params", "parameters", "arguments"]
            .iter()
            .find_map(|key| obj.get(*key));
        let params = match bag {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            // Some providers send arguments as a JSON-encoded string
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => map,
                _ => {
                    return Err(CommandError::InvalidParams {
                        action,
                        reason: "parameters are not an object".into(),
                    })
                }
            },
            Some(_) => {
                return Err(CommandError::InvalidParams {
                    action,
                    reason: "parameters are not an object".into(),
                })
            }
        };

        Ok(Self { action, params })
    }
}

// ============================================================================
// Typed commands
// ============================================================================

/// Subset of x/y/z components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisValues {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AxisValues {
    pub fn all(v: Vec3) -> Self {
        Self {
            x: Some(v[0]),
            y: Some(v[1]),
            z: Some(v[2]),
        }
    }

    pub fn single(axis: Axis, value: f64) -> Self {
        let mut out = Self::default();
        out.set(axis, value);
        out
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = Some(value),
            Axis::Y => self.y = Some(value),
            Axis::Z => self.z = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Present components as `(axis, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(move |axis| self.get(axis).map(|v| (axis, v)))
    }

    fn to_params(self, params: &mut Map<String, Value>) {
        for (axis, v) in self.iter() {
            let key = match axis {
                Axis::X => "x",
                Axis::Y => "y",
                Axis::Z => "z",
            };
            params.insert(key.to_string(), v.into());
        }
    }
}

/// How a scale command sets the selected object's scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleParams {
    /// Set the given components
    Absolute(AxisValues),
    /// Multiply every component by a factor
    Factor(f64),
    /// Set every component to the same value
    Uniform(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    Distance,
    Volume,
    Area,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasureParams {
    pub from: Option<ObjectId>,
    pub to: Option<ObjectId>,
}

/// Presentation-only actions
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    ResetCamera,
    Wireframe,
    Shaded,
    Animate,
    ChangeCamera { preset: Option<String> },
    ShowHelp,
    DisplayProperties,
}

/// A command with its parameters checked against the action's contract
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        shape: ObjectType,
        color: Option<String>,
        position: Option<Vec3>,
    },
    DeleteSelected,
    DuplicateSelected,
    /// Absolute position components
    Move(AxisValues),
    /// Absolute rotation components in degrees
    Rotate(AxisValues),
    Scale(ScaleParams),
    ChangeColor(String),
    Undo,
    Redo,
    Measure {
        kind: MeasureKind,
        params: MeasureParams,
    },
    View(ViewAction),
    /// Declared geometry/mesh tool without a handler
    Geometry {
        tool: ToolName,
        params: Map<String, Value>,
    },
}

impl Command {
    /// Validate a wire-level call and convert it to a typed command
    pub fn from_call(call: &ToolCall) -> Result<Command, CommandError> {
        let action = call.action;
        let p = Params {
            action,
            map: &call.params,
        };

        if let Some(shape) = action.creates() {
            let color = match p.string("color")? {
                Some(c) => Some(resolve_color(&c).ok_or_else(|| p.invalid(format!("unusable colour '{c}'")))?),
                None => None,
            };
            return Ok(Command::Add {
                shape,
                color,
                position: p.triple("position")?,
            });
        }

        let cmd = match action {
            ToolName::DeleteSelected => Command::DeleteSelected,
            ToolName::DuplicateSelected => Command::DuplicateSelected,
            ToolName::Move | ToolName::Move3d => Command::Move(p.axis_values("position")?),
            ToolName::MoveX | ToolName::MoveY | ToolName::MoveZ => {
                Command::Move(p.fixed_axis_value()?)
            }
            ToolName::Rotate => Command::Rotate(p.axis_values("rotation")?),
            ToolName::RotateX | ToolName::RotateY | ToolName::RotateZ => {
                Command::Rotate(p.fixed_axis_value()?)
            }
            ToolName::Scale => Command::Scale(p.scale()?),
            ToolName::ScaleX | ToolName::ScaleY | ToolName::ScaleZ => {
                Command::Scale(ScaleParams::Absolute(p.fixed_axis_value()?))
            }
            ToolName::ScaleUniform => {
                if let Some(factor) = p.number("factor")? {
                    Command::Scale(ScaleParams::Factor(p.positive(factor)?))
                } else {
                    let value = p
                        .number("value")?
                        .ok_or_else(|| p.invalid("expected 'value' or 'factor'"))?;
                    Command::Scale(ScaleParams::Uniform(value))
                }
            }
            ToolName::ChangeColor => {
                let raw = p
                    .string("color")?
                    .ok_or_else(|| p.invalid("missing 'color'"))?;
                let hex =
                    resolve_color(&raw).ok_or_else(|| p.invalid(format!("unusable colour '{raw}'")))?;
                Command::ChangeColor(hex)
            }
            ToolName::Undo => Command::Undo,
            ToolName::Redo => Command::Redo,
            ToolName::MeasureDistance | ToolName::MeasureVolume | ToolName::MeasureArea => {
                let kind = match action {
                    ToolName::MeasureDistance => MeasureKind::Distance,
                    ToolName::MeasureVolume => MeasureKind::Volume,
                    _ => MeasureKind::Area,
                };
                Command::Measure {
                    kind,
                    params: MeasureParams {
                        from: p.string("from")?,
                        to: p.string("to")?,
                    },
                }
            }
            ToolName::ResetCamera => Command::View(ViewAction::ResetCamera),
            ToolName::ViewWireframe => Command::View(ViewAction::Wireframe),
            ToolName::ViewShaded => Command::View(ViewAction::Shaded),
            ToolName::AnimateScene => Command::View(ViewAction::Animate),
            ToolName::ChangeCamera => Command::View(ViewAction::ChangeCamera {
                preset: p.string("preset")?,
            }),
            ToolName::ShowHelp => Command::View(ViewAction::ShowHelp),
            ToolName::DisplayProperties => Command::View(ViewAction::DisplayProperties),
            tool => Command::Geometry {
                tool,
                params: call.params.clone(),
            },
        };
        Ok(cmd)
    }

    /// Parse loosely shaped JSON (e.g. AI output) straight into a command
    pub fn from_value(value: &Value) -> Result<Command, CommandError> {
        Command::from_call(&ToolCall::from_value(value)?)
    }

    /// Canonical tool name of this command
    pub fn tool_name(&self) -> ToolName {
        match self {
            Command::Add { shape, .. } => {
                ToolName::add_tool_for(*shape).unwrap_or(ToolName::AddBox)
            }
            Command::DeleteSelected => ToolName::DeleteSelected,
            Command::DuplicateSelected => ToolName::DuplicateSelected,
            Command::Move(_) => ToolName::Move,
            Command::Rotate(_) => ToolName::Rotate,
            Command::Scale(_) => ToolName::Scale,
            Command::ChangeColor(_) => ToolName::ChangeColor,
            Command::Undo => ToolName::Undo,
            Command::Redo => ToolName::Redo,
            Command::Measure { kind, .. } => match kind {
                MeasureKind::Distance => ToolName::MeasureDistance,
                MeasureKind::Volume => ToolName::MeasureVolume,
                MeasureKind::Area => ToolName::MeasureArea,
            },
            Command::View(view) => match view {
                ViewAction::ResetCamera => ToolName::ResetCamera,
                ViewAction::Wireframe => ToolName::ViewWireframe,
                ViewAction::Shaded => ToolName::ViewShaded,
                ViewAction::Animate => ToolName::AnimateScene,
                ViewAction::ChangeCamera { .. } => ToolName::ChangeCamera,
                ViewAction::ShowHelp => ToolName::ShowHelp,
                ViewAction::DisplayProperties => ToolName::DisplayProperties,
            },
            Command::Geometry { tool, .. } => *tool,
        }
    }

    /// Wire form of this command
    pub fn to_call(&self) -> ToolCall {
        let mut call = ToolCall::new(self.tool_name());
        match self {
            Command::Add {
                color, position, ..
            } => {
                if let Some(c) = color {
                    call.params.insert("color".into(), c.clone().into());
                }
                if let Some(p) = position {
                    call.params.insert("position".into(), serde_json::json!(p));
                }
            }
            Command::Move(values) | Command::Rotate(values) => values.to_params(&mut call.params),
            Command::Scale(ScaleParams::Absolute(values)) => values.to_params(&mut call.params),
            Command::Scale(ScaleParams::Factor(f)) => {
                call.params.insert("factor".into(), (*f).into());
            }
            Command::Scale(ScaleParams::Uniform(v)) => {
                call.params.insert("scale".into(), serde_json::json!([v, v, v]));
            }
            Command::ChangeColor(c) => {
                call.params.insert("color".into(), c.clone().into());
            }
            Command::Measure { params, .. } => {
                if let Some(from) = &params.from {
                    call.params.insert("from".into(), from.clone().into());
                }
                if let Some(to) = &params.to {
                    call.params.insert("to".into(), to.clone().into());
                }
            }
            Command::View(ViewAction::ChangeCamera { preset: Some(preset) }) => {
                call.params.insert("preset".into(), preset.clone().into());
            }
            Command::Geometry { params, .. } => call.params = params.clone(),
            _ => {}
        }
        call
    }
}

/// Typed accessors over a parameter bag
struct Params<'a> {
    action: ToolName,
    map: &'a Map<String, Value>,
}

impl Params<'_> {
    fn invalid(&self, reason: impl Into<String>) -> CommandError {
        CommandError::InvalidParams {
            action: self.action,
            reason: reason.into(),
        }
    }

    fn as_number(&self, key: &str, value: &Value) -> Result<f64, CommandError> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(format!("'{key}' is not a number")))
    }

    fn number(&self, key: &str) -> Result<Option<f64>, CommandError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => self.as_number(key, v).map(Some),
        }
    }

    fn string(&self, key: &str) -> Result<Option<String>, CommandError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(format!("'{key}' is not a string"))),
        }
    }

    fn triple(&self, key: &str) -> Result<Option<Vec3>, CommandError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) if items.len() == 3 => {
                let mut out = [0.0; 3];
                for (slot, item) in out.iter_mut().zip(items) {
                    *slot = self.as_number(key, item)?;
                }
                Ok(Some(out))
            }
            Some(_) => Err(self.invalid(format!("'{key}' must be an [x, y, z] array"))),
        }
    }

    fn axis(&self) -> Result<Option<Axis>, CommandError> {
        match self.string("axis")? {
            None => Ok(None),
            Some(a) => Axis::parse(&a)
                .map(Some)
                .ok_or_else(|| self.invalid(format!("unknown axis '{a}'"))),
        }
    }

    fn positive(&self, factor: f64) -> Result<f64, CommandError> {
        if factor > 0.0 {
            Ok(factor)
        } else {
            Err(self.invalid("'factor' must be positive"))
        }
    }

    /// `<triple_key>: [x,y,z]`, else any of `x`/`y`/`z`, else `axis` + `value`
    fn axis_values(&self, triple_key: &str) -> Result<AxisValues, CommandError> {
        if let Some(t) = self.triple(triple_key)? {
            return Ok(AxisValues::all(t));
        }
        let values = AxisValues {
            x: self.number("x")?,
            y: self.number("y")?,
            z: self.number("z")?,
        };
        if !values.is_empty() {
            return Ok(values);
        }
        if let (Some(axis), Some(value)) = (self.axis()?, self.number("value")?) {
            return Ok(AxisValues::single(axis, value));
        }
        Err(self.invalid(format!(
            "expected '{triple_key}', x/y/z components or 'axis' + 'value'"
        )))
    }

    /// Per-axis tools take `value` (or the axis-named key)
    fn fixed_axis_value(&self) -> Result<AxisValues, CommandError> {
        let Some(axis) = self.action.fixed_axis() else {
            return Err(self.invalid("tool has no fixed axis"));
        };
        let key = match axis {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        let value = match self.number("value")? {
            Some(v) => v,
            None => self
                .number(key)?
                .ok_or_else(|| self.invalid("missing 'value'"))?,
        };
        Ok(AxisValues::single(axis, value))
    }

    fn scale(&self) -> Result<ScaleParams, CommandError> {
        if let Some(t) = self.triple("scale")? {
            return Ok(ScaleParams::Absolute(AxisValues::all(t)));
        }
        if let Some(factor) = self.number("factor")? {
            return Ok(ScaleParams::Factor(self.positive(factor)?));
        }
        self.axis_values("scale").map(ScaleParams::Absolute).map_err(|_| {
            self.invalid("expected 'scale' array, 'factor', x/y/z components or 'axis' + 'value'")
        })
    }
}
