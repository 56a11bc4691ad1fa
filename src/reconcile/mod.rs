//! Structural reconciler between the flat room list and the grouped view.
//!
//! `ID`s are display-order indices and change on every commit; `UID`s are the
//! durable keys and are never rewritten here.

mod core;

pub use core::{
    CommitOutcome, PrunedReference, StructuredView, commit_structured_edits,
    derive_structured_view,
};
