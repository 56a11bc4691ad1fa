//! Persistence bridge between the in-memory room list and a keyed settings
//! store.
//!
//! The store is reached through the async [`SettingsStore`] contract. Calls
//! are not queued or locked here: callers must await one load/save before
//! starting the next. Store failures propagate unchanged.

mod bridge;
mod store;

pub use bridge::{PersistenceBridge, fingerprint};
pub use store::{MemoryStore, SettingsStore, StoreError, StoreResult};
