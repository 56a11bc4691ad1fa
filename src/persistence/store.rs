use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("settings store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Keyed document store holding application settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Value under `key`, writing `default` first when the key is absent.
    async fn get_or_init(&self, key: &str, default: Value) -> StoreResult<Value>;

    /// Replace the value under `key`, returning the copy the store kept.
    async fn put(&self, key: &str, value: Value) -> StoreResult<Value>;
}

#[async_trait]
impl<S> SettingsStore for Arc<S>
where
    S: SettingsStore + ?Sized,
{
    async fn get_or_init(&self, key: &str, default: Value) -> StoreResult<Value> {
        (**self).get_or_init(key, default).await
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<Value> {
        (**self).put(key, value).await
    }
}

/// In-process store. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
    failing: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `value` under `key`.
    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.entries.lock() {
            guard.insert(key.into(), value);
        }
        store
    }

    /// Make every following call fail with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .ok()
            .and_then(|guard| guard.get(key).cloned())
    }

    /// Number of successful writes, seeding included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_or_init(&self, key: &str, default: Value) -> StoreResult<Value> {
        self.check()?;
        let mut guard = self.lock()?;
        if let Some(value) = guard.get(key) {
            return Ok(value.clone());
        }
        guard.insert(key.to_string(), default.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(default)
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<Value> {
        self.check()?;
        let mut guard = self.lock()?;
        guard.insert(key.to_string(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }
}
