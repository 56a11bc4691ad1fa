//! Structured JSON logging for structural operations.
//!
//! Events carry a target, a short snake_case message and a field map. Sinks
//! decide where they go; [`Logger`] is the cheap handle passed around.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub type LogFields = Map<String, Value>;

pub const PERSISTENCE_TARGET: &str = "room::structure.persistence";
pub const SERVICE_TARGET: &str = "room::structure.service";
pub const METRICS_TARGET: &str = "room::structure.metrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub ts_ms: u128,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "LogFields::is_empty")]
    pub fields: LogFields,
}

impl LogEvent {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);
        Self {
            ts_ms,
            level,
            target: target.into(),
            message: message.into(),
            fields: LogFields::new(),
        }
    }

    /// Attach one field, replacing an earlier value under the same key.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_fields(mut self, fields: LogFields) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("log encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("log sink poisoned")]
    Poisoned,
}

pub trait LogSink: Send + Sync {
    fn write(&self, event: &LogEvent) -> LoggingResult<()>;
}

/// Shared handle over a sink. Events below the threshold never reach it.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    threshold: LogLevel,
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self {
            sink: Arc::new(sink),
            threshold: LogLevel::Trace,
        }
    }

    pub fn with_threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    pub fn emit(&self, event: LogEvent) -> LoggingResult<()> {
        if self.enabled(event.level) {
            self.sink.write(&event)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// Appends one JSON document per line. Once the file would grow past
/// `max_bytes` it is truncated and writing starts over; zero means unbounded.
pub struct JsonLinesSink {
    path: PathBuf,
    max_bytes: u64,
    out: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn open(path: impl AsRef<Path>, max_bytes: u64) -> LoggingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            max_bytes,
            out: Mutex::new(BufWriter::new(file)),
        })
    }

    fn over_budget(&self, file: &File, incoming: usize) -> std::io::Result<bool> {
        if self.max_bytes == 0 {
            return Ok(false);
        }
        Ok(file.metadata()?.len() + incoming as u64 > self.max_bytes)
    }
}

impl LogSink for JsonLinesSink {
    fn write(&self, event: &LogEvent) -> LoggingResult<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut out = self.out.lock().map_err(|_| LoggingError::Poisoned)?;
        if self.over_budget(out.get_ref(), line.len())? {
            let fresh = File::create(&self.path)?;
            *out = BufWriter::new(fresh);
        }
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps events in memory; clones share one buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    /// First event with the given message.
    pub fn find(&self, message: &str) -> Option<LogEvent> {
        self.events().into_iter().find(|e| e.message == message)
    }
}

impl LogSink for MemorySink {
    fn write(&self, event: &LogEvent) -> LoggingResult<()> {
        self.events
            .lock()
            .map_err(|_| LoggingError::Poisoned)?
            .push(event.clone());
        Ok(())
    }
}
