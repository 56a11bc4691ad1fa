//! Tracks which node the editor has entered for in-place editing.

use std::sync::{Arc, RwLock};

use crate::model::Room;
use crate::tree::{self, MAX_DEPTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEntry {
    pub owner: String,
    /// Room `ID` or component `ID` acting as the edit root.
    pub root_id: String,
}

#[derive(Debug, Default)]
pub struct EditRegistry {
    inner: RwLock<Option<EditEntry>>,
}

impl EditRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, owner: impl Into<String>, root_id: impl Into<String>) {
        let entry = EditEntry {
            owner: owner.into(),
            root_id: root_id.into(),
        };
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(entry);
        }
    }

    /// Leave edit mode; ignored unless `owner` entered it.
    pub fn leave(&self, owner: &str) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.as_ref().map(|e| e.owner.as_str()) == Some(owner) {
                *guard = None;
            }
        }
    }

    pub fn current(&self) -> Option<EditEntry> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    pub fn root_id(&self) -> Option<String> {
        self.current().map(|entry| entry.root_id)
    }

    /// Whether `node_id` sits inside the entered edit root.
    pub fn can_edit_component(&self, forest: &[Room], node_id: &str) -> bool {
        self.can_edit_component_within(forest, node_id, MAX_DEPTH)
    }

    pub fn can_edit_component_within(&self, forest: &[Room], node_id: &str, max_depth: usize) -> bool {
        self.root_id()
            .is_some_and(|root| tree::editable_within(forest, node_id, &root, max_depth))
    }

    /// Whether `node_id` is the entered edit root itself.
    pub fn can_edit_container(&self, forest: &[Room], node_id: &str) -> bool {
        self.can_edit_container_within(forest, node_id, MAX_DEPTH)
    }

    pub fn can_edit_container_within(&self, forest: &[Room], node_id: &str, max_depth: usize) -> bool {
        self.root_id()
            .is_some_and(|root| tree::is_edit_root_within(forest, node_id, &root, max_depth))
    }
}

pub type SharedEdit = Arc<EditRegistry>;

/// Per-owner handle used by an editor surface.
pub struct EditController {
    owner: String,
    registry: SharedEdit,
}

impl EditController {
    pub fn new(owner: impl Into<String>, registry: SharedEdit) -> Self {
        Self {
            owner: owner.into(),
            registry,
        }
    }

    pub fn enter(&self, root_id: impl Into<String>) {
        self.registry.enter(&self.owner, root_id);
    }

    pub fn leave(&self) {
        self.registry.leave(&self.owner);
    }

    pub fn current(&self) -> Option<EditEntry> {
        self.registry.current()
    }
}
