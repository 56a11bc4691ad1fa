//! Structural engine for the room/component forest of a home-automation
//! dashboard.
//!
//! Rooms hold components, components may hold further components in one list
//! or in several slots. The crate keeps that forest consistent under editing:
//! lookup by identifier, container-handle resolution, grouping and
//! renumbering of rooms, and loading/saving through a settings store.

pub mod config;
pub mod edit;
pub mod error;
pub mod handle;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod persistence;
pub mod position;
pub mod reconcile;
pub mod service;
pub mod tree;
pub mod uid;

pub use config::{HOME_ROOM_UID, ROOMS_KEY, StructureConfig, default_rooms};
pub use edit::{EditController, EditEntry, EditRegistry, SharedEdit};
pub use error::{Result, StructureError};
pub use handle::ContainerHandle;
pub use logging::{
    JsonLinesSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, StructureMetrics};
pub use model::{
    Attributes, Component, ComponentId, ContainerPayload, GroupRef, Node, NodeMut, Room, RoomId,
    Slot,
};
pub use persistence::{MemoryStore, PersistenceBridge, SettingsStore, StoreError, StoreResult};
pub use position::{Dimensions, commit_position};
pub use reconcile::{
    CommitOutcome, PrunedReference, StructuredView, commit_structured_edits,
    derive_structured_view,
};
pub use service::StructureService;
pub use tree::{
    ComponentEntry, ForestReport, InsertionTarget, MAX_DEPTH, collect_all, collect_all_within,
    editable, editable_within, find_by_id, find_by_id_mut, find_by_id_within,
    find_owning_container, find_owning_container_within, inspect_forest, is_edit_root, visit_all,
    visit_forest, visit_forest_within,
};
pub use uid::new_uid;
