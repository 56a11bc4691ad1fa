use serde_json::json;

use crate::config::StructureConfig;
use crate::error::{Result, StructureError};
use crate::logging::{LogEvent, LogLevel, PERSISTENCE_TARGET};
use crate::model::Room;
use crate::tree::inspect_forest;
use crate::uid::new_uid;

use super::store::SettingsStore;

/// Content hash of a room list, stable across load/save cycles.
pub fn fingerprint(rooms: &[Room]) -> Result<blake3::Hash> {
    let bytes = serde_json::to_vec(rooms)?;
    Ok(blake3::hash(&bytes))
}

/// Loads and saves the room list through a [`SettingsStore`].
pub struct PersistenceBridge<S> {
    store: S,
    config: StructureConfig,
    persisted: Option<blake3::Hash>,
}

impl<S: SettingsStore> PersistenceBridge<S> {
    pub fn new(store: S, config: StructureConfig) -> Self {
        Self {
            store,
            config,
            persisted: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Read the room list, seeding the defaults on first run.
    ///
    /// Rooms without a `UID` get a fresh one and the corrected list is written
    /// straight back. A failure of that write-back is logged, not returned.
    pub async fn load(&mut self) -> Result<Vec<Room>> {
        let default = serde_json::to_value(&self.config.default_rooms)?;
        let raw = self
            .store
            .get_or_init(&self.config.settings_key, default)
            .await?;
        let mut rooms: Vec<Room> = serde_json::from_value(raw)?;

        let mut backfilled = 0;
        for room in rooms.iter_mut().filter(|room| !room.has_uid()) {
            room.uid = new_uid();
            backfilled += 1;
        }

        if backfilled > 0 {
            let corrected = serde_json::to_value(&rooms)?;
            if let Err(err) = self
                .store
                .put(&self.config.settings_key, corrected)
                .await
            {
                self.emit(
                    LogEvent::new(LogLevel::Warn, PERSISTENCE_TARGET, "uid_backfill_write_failed")
                        .with("error", err.to_string()),
                );
            }
            self.emit(
                LogEvent::new(LogLevel::Info, PERSISTENCE_TARGET, "uid_backfilled")
                    .with("rooms", backfilled),
            );
        }

        self.check_forest(&rooms)?;
        self.config.record(|metrics| metrics.record_load(backfilled));
        self.persisted = fingerprint(&rooms).ok();
        self.emit(
            LogEvent::new(LogLevel::Info, PERSISTENCE_TARGET, "rooms_loaded")
                .with("rooms", rooms.len()),
        );
        Ok(rooms)
    }

    /// Write `rooms` and return the copy acknowledged by the store.
    pub async fn save(&mut self, rooms: &[Room]) -> Result<Vec<Room>> {
        let value = serde_json::to_value(rooms)?;
        let ack = self.store.put(&self.config.settings_key, value).await?;
        let saved: Vec<Room> = serde_json::from_value(ack)?;

        self.config.record(|metrics| metrics.record_save());
        self.persisted = fingerprint(&saved).ok();
        self.emit(
            LogEvent::new(LogLevel::Info, PERSISTENCE_TARGET, "rooms_saved")
                .with("rooms", saved.len()),
        );
        Ok(saved)
    }

    /// Whether `rooms` matches the last list loaded or acknowledged.
    pub fn is_persisted(&self, rooms: &[Room]) -> bool {
        match (self.persisted, fingerprint(rooms)) {
            (Some(persisted), Ok(current)) => persisted == current,
            _ => false,
        }
    }

    fn check_forest(&self, rooms: &[Room]) -> Result<()> {
        let report = inspect_forest(rooms, self.config.max_depth);

        if !report.duplicate_ids.is_empty() {
            self.emit(
                LogEvent::new(LogLevel::Warn, PERSISTENCE_TARGET, "duplicate_component_ids")
                    .with("ids", json!(report.duplicate_ids)),
            );
        }

        if report.depth_exceeded {
            if self.config.reject_too_deep {
                return Err(StructureError::NestingTooDeep {
                    limit: self.config.max_depth,
                });
            }
            self.emit(
                LogEvent::new(LogLevel::Warn, PERSISTENCE_TARGET, "nesting_too_deep")
                    .with("limit", self.config.max_depth),
            );
        }
        Ok(())
    }

    fn emit(&self, event: LogEvent) {
        if let Some(logger) = &self.config.logger {
            let _ = logger.emit(event);
        }
    }
}
