//! Scene data model and command vocabulary shared by the editor and its
//! collaborators.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod color;
pub mod tool;

pub use color::{hsl_to_hex, named_color, normalize_hex, resolve_color, DEFAULT_COLOR};
pub use tool::{
    AxisValues, Command, CommandError, MeasureKind, MeasureParams, ScaleParams,
    ToolCall, ToolGroup, ToolName, ViewAction,
};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// (x, y, z) triple used for position, rotation and scale
pub type Vec3 = [f64; 3];

/// Smallest scale component an object may have
pub const MIN_SCALE: f64 = 0.1;

/// Primitive type of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Wedge,
    CustomMesh,
    Extrusion,
    Revolution,
    Sweep,
}

impl ObjectType {
    pub const ALL: [ObjectType; 11] = [
        ObjectType::Box,
        ObjectType::Sphere,
        ObjectType::Cylinder,
        ObjectType::Cone,
        ObjectType::Torus,
        ObjectType::Plane,
        ObjectType::Wedge,
        ObjectType::CustomMesh,
        ObjectType::Extrusion,
        ObjectType::Revolution,
        ObjectType::Sweep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Box => "box",
            ObjectType::Sphere => "sphere",
            ObjectType::Cylinder => "cylinder",
            ObjectType::Cone => "cone",
            ObjectType::Torus => "torus",
            ObjectType::Plane => "plane",
            ObjectType::Wedge => "wedge",
            ObjectType::CustomMesh => "custom-mesh",
            ObjectType::Extrusion => "extrusion",
            ObjectType::Revolution => "revolution",
            ObjectType::Sweep => "sweep",
        }
    }

    /// Parse a type name, rejecting anything outside the closed set
    pub fn parse(candidate: &str) -> Option<ObjectType> {
        let candidate = candidate.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(candidate))
    }

    /// Membership test against the closed type enumeration
    pub fn is_valid_type(candidate: &str) -> bool {
        Self::parse(candidate).is_some()
    }

    /// Types that have a matching `add-*` creation tool
    pub fn is_creatable(&self) -> bool {
        matches!(
            self,
            ObjectType::Box
                | ObjectType::Sphere
                | ObjectType::Cylinder
                | ObjectType::Cone
                | ObjectType::Torus
                | ObjectType::Plane
                | ObjectType::Wedge
        )
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate axis of a transform tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn parse(s: &str) -> Option<Axis> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Clamp a scale component to the minimum floor
pub fn clamp_scale(value: f64) -> f64 {
    // NaN compares false against everything, so it falls to the floor too
    if value >= MIN_SCALE {
        value
    } else {
        MIN_SCALE
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn default_scale() -> Vec3 {
    [1.0, 1.0, 1.0]
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A single parametric primitive in the editable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: Vec3,
    /// Radians
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default = "default_color")]
    pub color: String,

    // ── Shape parameters (meaning depends on `kind`) ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tube_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrude_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillet_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_angle: Option<f64>,

    // ── Presentation flags ──
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub wireframe: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Weak reference to a grouping parent; `None` means root level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,

    pub created_at: u64,
    pub updated_at: u64,
}

impl SceneObject {
    /// Object of `kind` at the origin-ish default pose with shape defaults filled in
    pub fn new(kind: ObjectType, position: Vec3, color: impl Into<String>) -> Self {
        let now = now_millis();
        let mut obj = Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            name: None,
            position,
            rotation: [0.0; 3],
            scale: default_scale(),
            color: color.into(),
            height: None,
            radius: None,
            radius_top: None,
            radius_bottom: None,
            tube_radius: None,
            extrude_depth: None,
            fillet_radius: None,
            chamfer_angle: None,
            visible: true,
            locked: false,
            wireframe: false,
            opacity: 1.0,
            parent_id: None,
            created_at: now,
            updated_at: now,
        };
        obj.apply_shape_defaults();
        obj
    }

    /// Fresh object of `kind` with a random position and random colour
    pub fn create_default(kind: ObjectType) -> Self {
        let mut rng = rand::thread_rng();
        let position = [rng.gen_range(-2.0..=2.0), 0.5, rng.gen_range(-2.0..=2.0)];
        let color = hsl_to_hex(rng.gen_range(0.0..360.0), 0.7, 0.6);
        Self::new(kind, position, color)
    }

    fn apply_shape_defaults(&mut self) {
        match self.kind {
            ObjectType::Box | ObjectType::Wedge => {
                self.height = Some(1.0);
            }
            ObjectType::Sphere => {
                self.radius = Some(0.5);
            }
            ObjectType::Cylinder => {
                self.height = Some(1.0);
                self.radius_top = Some(0.5);
                self.radius_bottom = Some(0.5);
            }
            ObjectType::Cone => {
                self.height = Some(1.0);
                self.radius_top = Some(0.0);
                self.radius_bottom = Some(0.5);
            }
            ObjectType::Torus => {
                self.radius = Some(0.5);
                self.tube_radius = Some(0.2);
            }
            ObjectType::Extrusion => {
                self.extrude_depth = Some(1.0);
            }
            ObjectType::Plane
            | ObjectType::CustomMesh
            | ObjectType::Revolution
            | ObjectType::Sweep => {}
        }
    }

    /// Refresh `updated_at`, never moving it backwards
    pub fn touch(&mut self) {
        self.updated_at = self.updated_at.max(now_millis());
    }

    /// Copy with a fresh id and timestamps
    pub fn duplicate(&self) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Bring an externally supplied object back inside the model invariants
    pub fn sanitize(&mut self) {
        for s in &mut self.scale {
            *s = clamp_scale(*s);
        }
        self.opacity = if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        };
        if let Some(hex) = normalize_hex(&self.color) {
            self.color = hex;
        } else {
            self.color = default_color();
        }
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
        }
    }
}
