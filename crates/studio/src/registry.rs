//! Tool catalogue
//!
//! Static toolbar/menu metadata. Every [`ToolName`] has exactly one entry;
//! the dispatcher refuses actions that are missing here.

use serde::Serialize;
use shared::ToolName;

/// Kind of a tool as shown in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Shape,
    Operation,
    Transform,
    Measure,
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tool {
    pub name: &'static str,
    /// Icon identifier for the UI icon set
    pub icon: &'static str,
    pub action: ToolName,
    #[serde(rename = "type")]
    pub kind: ToolKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub expanded: bool,
    pub tools: &'static [Tool],
}

const fn tool(name: &'static str, icon: &'static str, action: ToolName, kind: ToolKind) -> Tool {
    Tool {
        name,
        icon,
        action,
        kind,
    }
}

use ToolKind::{Measure, Operation, Shape, Transform, View};

const SHAPES: &[Tool] = &[
    tool("Box", "box", ToolName::AddBox, Shape),
    tool("Sphere", "circle", ToolName::AddSphere, Shape),
    tool("Cylinder", "cylinder", ToolName::AddCylinder, Shape),
    tool("Cone", "triangle", ToolName::AddCone, Shape),
    tool("Torus", "torus", ToolName::AddTorus, Shape),
    tool("Plane", "square", ToolName::AddPlane, Shape),
    tool("Wedge", "corner-down-right", ToolName::AddWedge, Shape),
];

const OPERATIONS: &[Tool] = &[
    tool("Union", "plus", ToolName::Union, Operation),
    tool("Subtract", "minus", ToolName::Subtract, Operation),
    tool("Intersect", "scissors", ToolName::Intersect, Operation),
    tool("Duplicate then Boolean", "copy-plus", ToolName::DuplicateThenBoolean, Operation),
    tool("Extrude", "arrow-up-from-square", ToolName::Extrude, Operation),
    tool("Revolve", "rotate-3d", ToolName::Revolve, Operation),
    tool("Fillet", "corner-up-right", ToolName::Fillet, Operation),
    tool("Bevel", "zap", ToolName::Bevel, Operation),
];

const TRANSFORM: &[Tool] = &[
    tool("Move", "move", ToolName::Move, Transform),
    tool("Move X", "move-horizontal", ToolName::MoveX, Transform),
    tool("Move Y", "move-vertical", ToolName::MoveY, Transform),
    tool("Move Z", "move-diagonal", ToolName::MoveZ, Transform),
    tool("Move 3D", "move-3d", ToolName::Move3d, Transform),
    tool("Rotate", "rotate-cw", ToolName::Rotate, Transform),
    tool("Rotate X", "rotate-cw", ToolName::RotateX, Transform),
    tool("Rotate Y", "rotate-cw", ToolName::RotateY, Transform),
    tool("Rotate Z", "rotate-cw", ToolName::RotateZ, Transform),
    tool("Scale", "maximize", ToolName::Scale, Transform),
    tool("Scale X", "maximize-2", ToolName::ScaleX, Transform),
    tool("Scale Y", "maximize-2", ToolName::ScaleY, Transform),
    tool("Scale Z", "maximize-2", ToolName::ScaleZ, Transform),
    tool("Uniform Scale", "scale-3d", ToolName::ScaleUniform, Transform),
    tool("Color", "palette", ToolName::ChangeColor, Transform),
];

const MEASURE: &[Tool] = &[
    tool("Distance", "ruler", ToolName::MeasureDistance, Measure),
    tool("Volume", "box-select", ToolName::MeasureVolume, Measure),
    tool("Area", "square-dashed", ToolName::MeasureArea, Measure),
];

const VIEW: &[Tool] = &[
    tool("Reset Camera", "camera", ToolName::ResetCamera, View),
    tool("Wireframe", "grid-3x3", ToolName::ViewWireframe, View),
    tool("Shaded", "layers", ToolName::ViewShaded, View),
    tool("Animation", "play", ToolName::AnimateScene, View),
    tool("Change Camera", "video", ToolName::ChangeCamera, View),
    tool("Help", "help-circle", ToolName::ShowHelp, View),
    tool("Properties", "info", ToolName::DisplayProperties, View),
];

const EDIT: &[Tool] = &[
    tool("Delete", "trash-2", ToolName::DeleteSelected, Operation),
    tool("Duplicate", "copy", ToolName::DuplicateSelected, Operation),
    tool("Undo", "undo", ToolName::Undo, Operation),
    tool("Redo", "redo", ToolName::Redo, Operation),
];

const MESH_EDITING: &[Tool] = &[
    tool("Extrude Edges", "arrow-up-right", ToolName::ExtrudeEdges, Operation),
    tool("Bevel Edges", "zap", ToolName::BevelEdges, Operation),
    tool("Loop Cut and Slide", "scissors", ToolName::LoopCutAndSlide, Operation),
    tool("Offset Edge Slide", "move-horizontal", ToolName::OffsetEdgeSlide, Operation),
    tool("Knife Topology Tool", "slice", ToolName::KnifeTopologyTool, Operation),
    tool("Bisect", "split-square-horizontal", ToolName::Bisect, Operation),
    tool("Rotate Edge CW", "rotate-cw", ToolName::RotateEdgeCw, Operation),
    tool("Rotate Edge CCW", "rotate-ccw", ToolName::RotateEdgeCcw, Operation),
    tool("Edge Crease", "spline", ToolName::EdgeCrease, Operation),
    tool("Edge Bevel Weight", "weight", ToolName::EdgeBevelWeight, Operation),
    tool("Mark Seam", "link-2", ToolName::MarkSeam, Operation),
    tool("Clear Seam", "link-2-off", ToolName::ClearSeam, Operation),
    tool("Mark Sharp", "triangle-right", ToolName::MarkSharp, Operation),
    tool("Clear Sharp", "eraser", ToolName::ClearSharp, Operation),
    tool("Set Sharpness by Angle", "angle", ToolName::SetSharpnessByAngle, Operation),
    tool("Subdivide", "grid-2x2", ToolName::Subdivide, Operation),
    tool("Un-Subdivide", "square", ToolName::UnSubdivide, Operation),
    tool("Edge Split", "git-fork", ToolName::EdgeSplit, Operation),
    tool("Edge Collapse", "git-merge", ToolName::EdgeCollapse, Operation),
    tool("Edge Loop", "repeat", ToolName::EdgeLoop, Operation),
    tool("Bridge Edges", "git-pull-request", ToolName::BridgeEdges, Operation),
    tool("Bridge Edge Loops", "git-compare", ToolName::BridgeEdgeLoops, Operation),
    tool("Dissolve Edges", "eraser", ToolName::DissolveEdges, Operation),
    tool("Split", "split", ToolName::Split, Operation),
    tool("Separate", "ungroup", ToolName::Separate, Operation),
    tool("Delete Edges", "trash", ToolName::DeleteEdges, Operation),
    tool("Bridge Curves", "spline", ToolName::BridgeCurves, Operation),
    tool("Imprint Curve", "stamp", ToolName::ImprintCurve, Operation),
];

/// Default toolbar layout
pub const DEFAULT_CATEGORIES: &[ToolCategory] = &[
    ToolCategory { name: "Shapes", icon: "shapes", expanded: true, tools: SHAPES },
    ToolCategory { name: "Operations", icon: "git-merge", expanded: false, tools: OPERATIONS },
    ToolCategory { name: "Transform", icon: "move", expanded: true, tools: TRANSFORM },
    ToolCategory { name: "Measure", icon: "ruler", expanded: false, tools: MEASURE },
    ToolCategory { name: "View", icon: "eye", expanded: false, tools: VIEW },
    ToolCategory { name: "Edit", icon: "pencil", expanded: true, tools: EDIT },
    ToolCategory { name: "Mesh Editing", icon: "hexagon", expanded: false, tools: MESH_EDITING },
];

/// Tool catalogue with per-session expanded/collapsed state
#[derive(Debug, Clone, Serialize)]
pub struct ToolRegistry {
    categories: Vec<ToolCategory>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.to_vec(),
        }
    }

    pub fn categories(&self) -> &[ToolCategory] {
        &self.categories
    }

    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.categories.iter().flat_map(|c| c.tools.iter())
    }

    pub fn find(&self, action: ToolName) -> Option<&Tool> {
        self.tools().find(|t| t.action == action)
    }

    pub fn contains(&self, action: ToolName) -> bool {
        self.find(action).is_some()
    }

    /// Category that lists `action`
    pub fn category_of(&self, action: ToolName) -> Option<&ToolCategory> {
        self.categories
            .iter()
            .find(|c| c.tools.iter().any(|t| t.action == action))
    }

    /// Flip a category open/closed. Returns the new state, `None` if unknown.
    pub fn toggle_expanded(&mut self, category: &str) -> Option<bool> {
        let cat = self
            .categories
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(category))?;
        cat.expanded = !cat.expanded;
        Some(cat.expanded)
    }

    /// Vocabulary entries with no registry entry
    pub fn missing_tools(&self) -> Vec<ToolName> {
        ToolName::ALL
            .iter()
            .copied()
            .filter(|t| !self.contains(*t))
            .collect()
    }
}
