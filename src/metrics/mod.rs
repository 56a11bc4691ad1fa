use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters for structural operations, shared through `StructureConfig`.
#[derive(Debug, Default, Clone)]
pub struct StructureMetrics {
    loads: u64,
    saves: u64,
    commits: u64,
    uid_backfills: u64,
    pruned_references: u64,
}

impl StructureMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load(&mut self, backfilled: usize) {
        self.loads = self.loads.saturating_add(1);
        self.uid_backfills = self.uid_backfills.saturating_add(backfilled as u64);
    }

    pub fn record_save(&mut self) {
        self.saves = self.saves.saturating_add(1);
    }

    pub fn record_commit(&mut self) {
        self.commits = self.commits.saturating_add(1);
    }

    pub fn record_pruned(&mut self, count: usize) {
        if count > 0 {
            self.pruned_references = self.pruned_references.saturating_add(count as u64);
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            loads: self.loads,
            saves: self.saves,
            commits: self.commits,
            uid_backfills: self.uid_backfills,
            pruned_references: self.pruned_references,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub loads: u64,
    pub saves: u64,
    pub commits: u64,
    pub uid_backfills: u64,
    pub pruned_references: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::new(LogLevel::Info, target, "structure_metrics").with_fields(self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("loads".to_string(), json!(self.loads));
        map.insert("saves".to_string(), json!(self.saves));
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("uid_backfills".to_string(), json!(self.uid_backfills));
        map.insert("pruned_references".to_string(), json!(self.pruned_references));
        map
    }
}
