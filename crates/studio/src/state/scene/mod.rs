//! Scene store
//!
//! Owns the live object collection, the single selection and the linear
//! undo/redo history. Every transition is total: rejected commands are
//! logged no-ops and never leave the store inconsistent.

mod display;
mod history;
mod object_ops;
mod transform_ops;

pub use display::{object_display_name, object_icon, short_id};
pub use object_ops::{SceneFile, SceneLoadError};
pub use transform_ops::TransformField;

use shared::{ObjectId, ObjectType, SceneObject, DEFAULT_COLOR};

use super::selection::SelectionState;

/// Snapshots retained before the oldest is folded into the baseline
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Object collection with selection and snapshot history
#[derive(Debug, Clone)]
pub struct SceneStore {
    pub(crate) objects: Vec<SceneObject>,
    pub(crate) selection: SelectionState,
    /// `history[i]` is the collection after the i-th recorded mutation
    pub(crate) history: Vec<Vec<SceneObject>>,
    /// Index of the live snapshot; -1 means the baseline
    pub(crate) history_index: isize,
    /// Collection before the first retained snapshot
    pub(crate) baseline: Vec<SceneObject>,
    pub(crate) history_limit: usize,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// One default box at the origin, no selection, empty history
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_COLOR, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_settings(default_color: &str, history_limit: usize) -> Self {
        let color = shared::normalize_hex(default_color).unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let initial = SceneObject::new(ObjectType::Box, [0.0, 0.5, 0.0], color);
        let mut store = Self::from_objects(vec![initial]);
        store.history_limit = history_limit.max(1);
        store
    }

    /// Store whose baseline is `objects` (no sanitizing, ids assumed unique)
    pub fn from_objects(objects: Vec<SceneObject>) -> Self {
        Self {
            baseline: objects.clone(),
            objects,
            selection: SelectionState::default(),
            history: Vec::new(),
            history_index: -1,
            history_limit: DEFAULT_HISTORY_LIMIT,
            version: 0,
        }
    }

    // ── Read accessors ──────────────────────────────────────────

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn selected_id(&self) -> Option<&ObjectId> {
        self.selection.primary()
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selected_id().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Current scene version (increments on every change of the live collection)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    // ── Selection ───────────────────────────────────────────────

    /// Select `id`, or clear the selection.
    ///
    /// An id not present in the collection is treated as `None`. Returns
    /// whether an object ended up selected.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.contains(id) => {
                self.selection.select(id.to_string());
                true
            }
            Some(id) => {
                tracing::warn!("select: no object with id {id}, clearing selection");
                self.selection.clear();
                false
            }
            None => {
                self.selection.clear();
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Recording ───────────────────────────────────────────────

    /// Record the live collection as a new snapshot.
    ///
    /// Truncates any redo future, advances the index and folds the oldest
    /// snapshot into the baseline once the limit is exceeded.
    pub(crate) fn record(&mut self) {
        let keep = (self.history_index + 1) as usize;
        self.history.truncate(keep);
        self.history.push(self.objects.clone());
        while self.history.len() > self.history_limit {
            self.baseline = self.history.remove(0);
        }
        self.history_index = self.history.len() as isize - 1;
        self.version += 1;
    }

    /// Clear a selection left dangling by a collection swap
    pub(crate) fn reconcile_selection(&mut self) {
        let objects = &self.objects;
        if self
            .selection
            .retain_if(|id| objects.iter().any(|o| o.id == id))
        {
            tracing::debug!("selection cleared: selected object no longer exists");
        }
    }
}
