//! Object lifecycle, per-object flags and scene import/export

use serde::{Deserialize, Serialize};
use shared::{ObjectId, ObjectType, SceneObject, Vec3};

use super::SceneStore;

/// Failures when importing a scene file
#[derive(Debug, thiserror::Error)]
pub enum SceneLoadError {
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate object id '{0}'")]
    DuplicateId(String),
    #[error("object '{id}' has an invalid parent '{parent}'")]
    InvalidParent { id: String, parent: String },
}

/// On-disk scene document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "scene_file_version")]
    pub version: u32,
    pub objects: Vec<SceneObject>,
}

fn scene_file_version() -> u32 {
    1
}

/// Scene documents may also be a bare object array
#[derive(Deserialize)]
#[serde(untagged)]
enum SceneInput {
    File(SceneFile),
    Bare(Vec<SceneObject>),
}

impl SceneStore {
    /// Append a default object of `kind` and select it
    pub fn add_object(&mut self, kind: ObjectType) -> ObjectId {
        self.add_object_with(kind, None, None)
    }

    /// Append a default object with an optional colour and position override.
    ///
    /// An unusable colour is ignored and the random default kept.
    pub fn add_object_with(
        &mut self,
        kind: ObjectType,
        color: Option<&str>,
        position: Option<Vec3>,
    ) -> ObjectId {
        let mut obj = SceneObject::create_default(kind);
        if let Some(c) = color {
            match shared::normalize_hex(c) {
                Some(hex) => obj.color = hex,
                None => tracing::warn!("add {kind}: ignoring unusable colour '{c}'"),
            }
        }
        if let Some(p) = position.filter(|p| p.iter().all(|v| v.is_finite())) {
            obj.position = p;
        }
        let id = obj.id.clone();
        self.objects.push(obj);
        self.record();
        self.selection.select(id.clone());
        tracing::debug!("added {kind} {id}");
        id
    }

    /// Selected object id, if it exists and is not locked
    pub(super) fn editable_selected(&mut self, op: &str) -> Option<ObjectId> {
        let Some(id) = self.selection.primary().cloned() else {
            tracing::debug!("{op}: nothing selected");
            return None;
        };
        match self.get(&id) {
            None => {
                tracing::warn!("{op}: selected object {id} no longer exists");
                self.selection.clear();
                None
            }
            Some(obj) if obj.locked => {
                tracing::warn!("{op}: object {id} is locked");
                None
            }
            Some(_) => Some(id),
        }
    }

    /// Remove the selected object. Children are re-parented to the root.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.editable_selected("delete") else {
            return false;
        };
        self.objects.retain(|o| o.id != id);
        for child in self
            .objects
            .iter_mut()
            .filter(|o| o.parent_id.as_deref() == Some(id.as_str()))
        {
            child.parent_id = None;
            child.touch();
        }
        self.selection.clear();
        self.record();
        tracing::debug!("deleted {id}");
        true
    }

    /// Clone the selected object offset along x and select the copy
    pub fn duplicate_selected(&mut self, offset: f64) -> Option<ObjectId> {
        let Some(source) = self.selected().cloned() else {
            tracing::debug!("duplicate: nothing selected");
            return None;
        };
        let mut copy = source.duplicate();
        copy.position[0] += if offset.is_finite() { offset } else { 0.0 };
        copy.locked = false;
        let id = copy.id.clone();
        self.objects.push(copy);
        self.record();
        self.selection.select(id.clone());
        tracing::debug!("duplicated {} -> {id}", source.id);
        Some(id)
    }

    /// Remove every object
    pub fn clear(&mut self) -> bool {
        if self.objects.is_empty() {
            return false;
        }
        self.objects.clear();
        self.selection.clear();
        self.record();
        true
    }

    // ── Per-object flags ────────────────────────────────────────

    fn update_object(&mut self, id: &str, op: &str, f: impl FnOnce(&mut SceneObject)) -> bool {
        let Some(obj) = self.get_mut(id) else {
            tracing::warn!("{op}: no object with id {id}");
            return false;
        };
        f(obj);
        obj.touch();
        self.record();
        true
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.update_object(id, "set_visible", |o| o.visible = visible)
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        self.update_object(id, "set_locked", |o| o.locked = locked)
    }

    pub fn set_wireframe(&mut self, id: &str, wireframe: bool) -> bool {
        self.update_object(id, "set_wireframe", |o| o.wireframe = wireframe)
    }

    /// Set opacity, clamped to [0, 1]
    pub fn set_opacity(&mut self, id: &str, opacity: f64) -> bool {
        if opacity.is_nan() {
            tracing::warn!("set_opacity: NaN rejected");
            return false;
        }
        self.update_object(id, "set_opacity", |o| o.opacity = opacity.clamp(0.0, 1.0))
    }

    /// Set or clear the display name (blank clears)
    pub fn rename(&mut self, id: &str, name: Option<&str>) -> bool {
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        self.update_object(id, "rename", |o| o.name = name)
    }

    /// Re-parent `id` under `parent`, or move it to the root.
    ///
    /// The parent must be another existing object and must not be a
    /// descendant of `id`.
    pub fn set_parent(&mut self, id: &str, parent: Option<&str>) -> bool {
        if self.get(id).is_some_and(|o| o.locked) {
            tracing::warn!("set_parent: object {id} is locked");
            return false;
        }
        if let Some(p) = parent {
            if p == id || !self.contains(p) {
                tracing::warn!("set_parent: invalid parent {p} for {id}");
                return false;
            }
            if self.is_ancestor(id, p) {
                tracing::warn!("set_parent: {p} descends from {id}, would form a cycle");
                return false;
            }
        }
        let parent = parent.map(String::from);
        self.update_object(id, "set_parent", |o| o.parent_id = parent)
    }

    /// Whether `ancestor` appears on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut current = self.get(id).and_then(|o| o.parent_id.as_deref());
        // Bounded walk: a corrupt chain cannot loop forever
        for _ in 0..self.objects.len() {
            match current {
                Some(p) if p == ancestor => return true,
                Some(p) => current = self.get(p).and_then(|o| o.parent_id.as_deref()),
                None => return false,
            }
        }
        false
    }

    /// Objects whose parent is `id`
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| o.parent_id.as_deref() == Some(id))
    }

    // ── Import / export ─────────────────────────────────────────

    /// Replace the collection with validated objects as one undoable step.
    ///
    /// Scale, opacity and colour are sanitized, dangling parents dropped.
    /// Duplicate ids and parent cycles are rejected without touching the store.
    pub fn load_objects(&mut self, mut objects: Vec<SceneObject>) -> Result<usize, SceneLoadError> {
        let mut seen = std::collections::HashSet::new();
        for obj in &objects {
            if !seen.insert(obj.id.as_str()) {
                return Err(SceneLoadError::DuplicateId(obj.id.clone()));
            }
        }
        let ids: std::collections::HashSet<String> =
            objects.iter().map(|o| o.id.clone()).collect();
        for obj in &mut objects {
            obj.sanitize();
            if let Some(p) = &obj.parent_id {
                if p == &obj.id {
                    return Err(SceneLoadError::InvalidParent {
                        id: obj.id.clone(),
                        parent: p.clone(),
                    });
                }
                if !ids.contains(p) {
                    tracing::warn!("load: dropping dangling parent {p} of {}", obj.id);
                    obj.parent_id = None;
                }
            }
        }

        let candidate = SceneStore::from_objects(objects);
        for obj in candidate.objects() {
            if candidate.is_ancestor(&obj.id, &obj.id) {
                return Err(SceneLoadError::InvalidParent {
                    id: obj.id.clone(),
                    parent: obj.parent_id.clone().unwrap_or_default(),
                });
            }
        }

        let count = candidate.objects.len();
        self.objects = candidate.objects;
        self.selection.clear();
        self.record();
        tracing::info!("loaded {count} objects");
        Ok(count)
    }

    /// Parse a scene document (`{"objects": [...]}` or a bare array) and load it
    pub fn load_json(&mut self, json: &str) -> Result<usize, SceneLoadError> {
        let objects = match serde_json::from_str::<SceneInput>(json)? {
            SceneInput::File(file) => file.objects,
            SceneInput::Bare(objects) => objects,
        };
        self.load_objects(objects)
    }

    /// Pretty JSON of the live collection
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let file = SceneFile {
            version: scene_file_version(),
            objects: self.objects.clone(),
        };
        serde_json::to_string_pretty(&file)
    }
}
