//! Tree search engine and component enumerator.
//!
//! All descents go through [`ContainerPayload::lists`](crate::model::ContainerPayload::lists),
//! so single and multi containers are told apart in exactly one place: the
//! payload parser. Every walk stops at [`MAX_DEPTH`] nested levels unless the
//! `_within` variant is given another cap.

mod enumerate;
mod inspect;
mod search;

/// Deepest component level any traversal will visit.
pub const MAX_DEPTH: usize = 64;

pub use enumerate::{
    ComponentEntry, collect_all, collect_all_within, visit_all, visit_forest, visit_forest_within,
};
pub use inspect::{ForestReport, inspect_forest};
pub use search::{
    InsertionTarget, NodePath, PathStep, editable, editable_within, find_by_id, find_by_id_mut,
    find_by_id_mut_within, find_by_id_within, find_component, find_component_mut,
    find_component_mut_within, find_component_within, find_owning_container, find_owning_container_within, find_path,
    find_path_within, is_edit_root, is_edit_root_within, resolve, resolve_mut,
};
