//! Factory functions for creating test data.
//!
//! Objects get fixed ids and positions so tests can refer to them by name.

use shared::{ObjectType, SceneObject, Vec3, DEFAULT_COLOR};

use crate::state::{EditorState, SceneStore};

// ── Object factories ────────────────────────────────────────────

/// Object of `kind` with a fixed id at `position`
pub fn object_at(id: &str, kind: ObjectType, position: Vec3) -> SceneObject {
    let mut obj = SceneObject::new(kind, position, DEFAULT_COLOR);
    obj.id = id.to_string();
    obj
}

/// Unit box with a fixed id
pub fn box_at(id: &str, position: Vec3) -> SceneObject {
    object_at(id, ObjectType::Box, position)
}

pub fn sphere_at(id: &str, position: Vec3) -> SceneObject {
    object_at(id, ObjectType::Sphere, position)
}

// ── Store / editor factories ────────────────────────────────────

/// Store whose baseline is exactly `objects`
pub fn store_with(objects: Vec<SceneObject>) -> SceneStore {
    SceneStore::from_objects(objects)
}

/// Editor with default settings whose scene is exactly `objects`
pub fn editor_with(objects: Vec<SceneObject>) -> EditorState {
    let mut state = EditorState::new();
    state.scene = store_with(objects);
    state
}

/// Editor holding boxes `a` and `b`, with `a` selected
pub fn editor_two_boxes() -> EditorState {
    let mut state = editor_with(vec![
        box_at("a", [0.0, 0.5, 0.0]),
        box_at("b", [2.0, 0.5, 0.0]),
    ]);
    state.scene.select(Some("a"));
    state
}
