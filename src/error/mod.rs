//! Error module orchestrator.
//!
//! Every fallible operation in the crate funnels into [`StructureError`];
//! lookups that simply miss return `None` instead.

mod types;

pub use types::{Result, StructureError};
