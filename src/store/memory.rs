// src/store/memory.rs
//! In-process [`KvStore`] with per-entry TTL.
//!
//! Expired entries are never returned. They are dropped when read and swept
//! out on every write, so keys that are never read again do not accumulate.

use super::KvStore;
use crate::config::DEFAULT_CACHE_TTL_SECS;
use crate::error::CacheError;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    created_at: Instant,
    ttl: Duration,
}

impl StoredEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Drops expired entries, returning how many were removed.
fn purge_expired(entries: &mut HashMap<String, StoredEntry>) -> usize {
    let before = entries.len();
    entries.retain(|_, e| !e.is_expired());
    let removed = before - entries.len();
    if removed > 0 {
        debug!("Purged {} expired entries from memory store", removed);
    }
    removed
}

#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    default_ttl_secs: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL_SECS)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose cache writes expire after `default_ttl_secs`.
    pub fn with_ttl(default_ttl_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl_secs,
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining lifetime of `key`, if it is live.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.ttl.saturating_sub(e.created_at.elapsed()))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        // Re-check under the write lock; a concurrent put may have refreshed it.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoredEntry::is_expired) {
            debug!("Memory store entry expired, removing: {}", key);
            entries.remove(key);
        }
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries);
        if ttl_secs == 0 {
            entries.remove(key);
            return Ok(());
        }
        entries.insert(
            key.to_string(),
            StoredEntry::new(value, Duration::from_secs(ttl_secs)),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(k, e)| k.starts_with(prefix) && !e.is_expired())
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }
}
