use shared::ObjectId;

/// Single-object selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Option<ObjectId>,
}

impl SelectionState {
    /// Currently selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Select a single object (replaces previous selection)
    pub fn select(&mut self, id: ObjectId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it no longer names a live object
    pub fn retain_if(&mut self, exists: impl Fn(&str) -> bool) -> bool {
        match &self.selected {
            Some(id) if !exists(id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}
