//! Stateful owner of the room forest.
//!
//! Holds the authoritative flat list, the structured view derived from it and
//! the room currently entered. Every structural change goes through
//! [`StructureService::modify_rooms`]; every write through
//! [`StructureService::save_rooms`].

use std::sync::Arc;

use crate::config::StructureConfig;
use crate::edit::{EditRegistry, SharedEdit};
use crate::error::{Result, StructureError};
use crate::logging::{LogEvent, LogLevel, SERVICE_TARGET};
use crate::model::{Component, Node, Room, RoomId};
use crate::persistence::{PersistenceBridge, SettingsStore};
use crate::position::{Dimensions, commit_position};
use crate::reconcile::{
    CommitOutcome, PrunedReference, commit_structured_edits, derive_structured_view,
};
use crate::tree::{self, ComponentEntry, InsertionTarget};
use crate::uid::new_uid;

pub struct StructureService<S> {
    bridge: PersistenceBridge<S>,
    rooms: Vec<Room>,
    structured: Vec<Room>,
    current: Option<RoomId>,
    edit: SharedEdit,
}

impl<S: SettingsStore> StructureService<S> {
    pub fn new(store: S, config: StructureConfig) -> Self {
        Self {
            bridge: PersistenceBridge::new(store, config),
            rooms: Vec::new(),
            structured: Vec::new(),
            current: None,
            edit: Arc::new(EditRegistry::new()),
        }
    }

    /// Share an edit registry owned by the editor surface.
    pub fn with_edit_registry(mut self, edit: SharedEdit) -> Self {
        self.edit = edit;
        self
    }

    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    pub fn edit_registry(&self) -> SharedEdit {
        Arc::clone(&self.edit)
    }

    /// Hydrate the flat list from the store and derive the structured view.
    pub async fn load_rooms(&mut self) -> Result<&[Room]> {
        self.rooms = self.bridge.load().await?;
        self.reselect_current();
        self.refresh_structure();
        Ok(&self.rooms)
    }

    /// Persist the flat list and adopt the store's acknowledged copy.
    pub async fn save_rooms(&mut self) -> Result<&[Room]> {
        self.rooms = self.bridge.save(&self.rooms).await?;
        self.reselect_current();
        self.refresh_structure();
        Ok(&self.rooms)
    }

    /// Fold the (edited) structured view back into the flat list.
    ///
    /// Rooms missing from the structured view are deleted and every room is
    /// renumbered in display order. The structured view contributes order,
    /// grouping and room fields; component lists always come from the flat
    /// list, so component edits made since the last refresh survive. Nothing
    /// is persisted here.
    pub fn modify_rooms(&mut self) -> CommitOutcome {
        let mut structured = std::mem::take(&mut self.structured);
        for room in structured.iter_mut() {
            if let Some(flat) = self.rooms.iter().find(|flat| flat.id == room.id) {
                room.components = flat.components.clone();
            }
        }
        let current_uid = self.current_room().map(|room| room.uid.clone());

        let outcome = commit_structured_edits(structured, &self.rooms);
        self.rooms = outcome.rooms.clone();
        self.current = current_uid.and_then(|uid| {
            self.rooms
                .iter()
                .find(|room| room.uid == uid)
                .map(|room| room.id)
        });

        let config = self.bridge.config();
        config.record(|metrics| {
            metrics.record_commit();
            metrics.record_pruned(outcome.pruned.len());
        });
        self.emit(
            LogEvent::new(LogLevel::Info, SERVICE_TARGET, "rooms_committed")
                .with("rooms", self.rooms.len())
                .with("pruned", outcome.pruned.len()),
        );
        self.refresh_structure();
        outcome
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Direct access for in-place edits; commit with [`Self::save_rooms`].
    pub fn rooms_mut(&mut self) -> &mut Vec<Room> {
        &mut self.rooms
    }

    pub fn structured_rooms(&self) -> &[Room] {
        &self.structured
    }

    /// Editor-side view; reorder, group or drop rooms here, then call
    /// [`Self::modify_rooms`].
    pub fn structured_rooms_mut(&mut self) -> &mut Vec<Room> {
        &mut self.structured
    }

    /// Re-derive the structured view, returning any references pruned.
    pub fn refresh_structure(&mut self) -> Vec<PrunedReference> {
        let view = derive_structured_view(&mut self.rooms);
        self.structured = view.rooms;
        if !view.pruned.is_empty() {
            self.bridge
                .config()
                .record(|metrics| metrics.record_pruned(view.pruned.len()));
            self.emit(
                LogEvent::new(LogLevel::Warn, SERVICE_TARGET, "group_references_pruned")
                    .with("count", view.pruned.len()),
            );
        }
        view.pruned
    }

    /// Enter the room with the given `ID`.
    pub fn select_room(&mut self, id: RoomId) -> Result<&Room> {
        let room = self
            .rooms
            .iter()
            .find(|room| room.id == id)
            .ok_or(StructureError::RoomNotFound(id))?;
        self.current = Some(id);
        Ok(room)
    }

    pub fn current_room(&self) -> Option<&Room> {
        let id = self.current?;
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Append a new room with a fresh `UID` and the next free `ID`.
    pub fn new_room(&mut self, name: impl Into<String>, icon: impl Into<String>) -> &Room {
        let id = self.rooms.iter().map(|room| room.id + 1).max().unwrap_or(0);
        self.rooms.push(Room::new(id, new_uid(), name).with_icon(icon));
        self.refresh_structure();
        let idx = self.rooms.len() - 1;
        &self.rooms[idx]
    }

    pub fn find(&self, id: &str) -> Option<Node<'_>> {
        tree::find_by_id_within(&self.rooms, id, self.max_depth())
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        tree::find_component_within(&self.rooms, id, self.max_depth())
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        let max_depth = self.max_depth();
        tree::find_component_mut_within(&mut self.rooms, id, max_depth)
    }

    /// List a widget factory should append a new component to.
    ///
    /// The list belongs to the flat room list; [`Self::modify_rooms`] keeps
    /// whatever is appended here.
    pub fn insertion_target(&mut self, handle: &str) -> Option<InsertionTarget<'_>> {
        let max_depth = self.max_depth();
        tree::find_owning_container_within(&mut self.rooms, handle, max_depth)
    }

    pub fn all_components(&self) -> Vec<ComponentEntry<'_>> {
        tree::collect_all_within(&self.rooms, self.max_depth())
    }

    /// Apply `modify` to every component of every room.
    pub fn modify_components<F>(&mut self, modify: F)
    where
        F: FnMut(&mut Component),
    {
        let max_depth = self.max_depth();
        tree::visit_forest_within(&mut self.rooms, max_depth, modify);
    }

    pub fn can_edit_component(&self, id: &str) -> bool {
        self.edit
            .can_edit_component_within(&self.rooms, id, self.max_depth())
    }

    pub fn can_edit_container(&self, id: &str) -> bool {
        self.edit
            .can_edit_container_within(&self.rooms, id, self.max_depth())
    }

    /// Write drag/resize results onto a component, optionally persisting.
    pub async fn save_item_position(
        &mut self,
        component_id: &str,
        dimensions: &Dimensions,
        save: bool,
    ) -> Result<()> {
        let component = self
            .component_mut(component_id)
            .ok_or_else(|| StructureError::ComponentNotFound(component_id.to_string()))?;
        commit_position(component, dimensions);
        if save {
            self.save_rooms().await?;
        }
        Ok(())
    }

    /// Whether the flat list differs from what the store last acknowledged.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.bridge.is_persisted(&self.rooms)
    }

    fn reselect_current(&mut self) {
        if let Some(id) = self.current {
            if !self.rooms.iter().any(|room| room.id == id) {
                self.current = None;
            }
        }
        if self.current.is_none() {
            self.current = self.rooms.first().map(|room| room.id);
        }
        if let Some(room) = self.current_room() {
            let event = LogEvent::new(LogLevel::Debug, SERVICE_TARGET, "current_room")
                .with("uid", room.uid.clone());
            self.emit(event);
        }
    }

    fn max_depth(&self) -> usize {
        self.bridge.config().max_depth
    }

    fn emit(&self, event: LogEvent) {
        if let Some(logger) = &self.bridge.config().logger {
            let _ = logger.emit(event);
        }
    }
}
