//! Configuration knobs for the structure service and persistence bridge.

use std::sync::{Arc, Mutex};

use crate::logging::Logger;
use crate::metrics::StructureMetrics;
use crate::model::Room;
use crate::tree::MAX_DEPTH;

/// Settings key the room list is stored under.
pub const ROOMS_KEY: &str = "rooms";

/// `UID` of the room seeded on first run.
pub const HOME_ROOM_UID: &str = "_s01tz3k9x";

/// Rooms written to the store when nothing is persisted yet.
pub fn default_rooms() -> Vec<Room> {
    vec![Room::new(0, HOME_ROOM_UID, "Home").with_icon("home")]
}

#[derive(Clone, Debug)]
pub struct StructureConfig {
    /// Key used with the settings store.
    pub settings_key: String,
    /// Seed list for an empty store.
    pub default_rooms: Vec<Room>,
    /// Component nesting accepted before a load is flagged.
    pub max_depth: usize,
    /// Fail the load instead of only logging when nesting exceeds `max_depth`.
    pub reject_too_deep: bool,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Counters updated by loads, saves and commits.
    pub metrics: Option<Arc<Mutex<StructureMetrics>>>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            settings_key: ROOMS_KEY.to_string(),
            default_rooms: default_rooms(),
            max_depth: MAX_DEPTH,
            reject_too_deep: false,
            logger: None,
            metrics: None,
        }
    }
}

impl StructureConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(StructureMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<StructureMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Apply `update` to the metrics if enabled.
    pub(crate) fn record(&self, update: impl FnOnce(&mut StructureMetrics)) {
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_a_single_home_room() {
        let config = StructureConfig::default();
        assert_eq!(config.settings_key, "rooms");
        assert_eq!(config.default_rooms.len(), 1);
        let home = &config.default_rooms[0];
        assert_eq!((home.id, home.uid.as_str(), home.name.as_str()), (0, HOME_ROOM_UID, "Home"));
        assert_eq!(home.icon, "home");
    }

    #[test]
    fn metrics_toggle_shares_one_handle() {
        let mut config = StructureConfig::default();
        assert!(config.metrics_handle().is_none());
        config.enable_metrics();
        let first = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&first, &config.metrics_handle().unwrap()));
        config.record(|m| m.record_save());
        assert_eq!(first.lock().unwrap().snapshot().saves, 1);
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
