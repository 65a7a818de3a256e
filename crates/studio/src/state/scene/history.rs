//! Undo/redo functionality

use shared::SceneObject;

use super::SceneStore;

impl SceneStore {
    /// Recorded snapshots, oldest first
    pub fn history(&self) -> &[Vec<SceneObject>] {
        &self.history
    }

    /// Index of the live snapshot, -1 when at the baseline
    pub fn history_index(&self) -> isize {
        self.history_index
    }

    /// Collection restored when undoing past the first retained snapshot
    pub fn baseline(&self) -> &[SceneObject] {
        &self.baseline
    }

    /// Step back one snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            tracing::debug!("undo: nothing to undo");
            return false;
        }
        self.history_index -= 1;
        self.objects = self.snapshot_at(self.history_index).to_vec();
        self.reconcile_selection();
        self.version += 1;
        tracing::debug!("undo -> index {}", self.history_index);
        true
    }

    /// Step forward one snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            tracing::debug!("redo: nothing to redo");
            return false;
        }
        self.history_index += 1;
        self.objects = self.snapshot_at(self.history_index).to_vec();
        self.reconcile_selection();
        self.version += 1;
        tracing::debug!("redo -> index {}", self.history_index);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history_index >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.history_index + 1 < self.history.len() as isize
    }

    /// Make the live collection the new baseline and forget all snapshots
    pub fn reset_history(&mut self) {
        self.baseline = self.objects.clone();
        self.history.clear();
        self.history_index = -1;
        self.reconcile_selection();
    }

    fn snapshot_at(&self, index: isize) -> &[SceneObject] {
        if index < 0 {
            &self.baseline
        } else {
            &self.history[index as usize]
        }
    }
}
