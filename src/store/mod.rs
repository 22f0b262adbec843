// src/store/mod.rs
//! Key-value store contract the news cache writes through, plus backends.

pub mod memory;
pub mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

use crate::config::{Config, StoreBackend, DEFAULT_CACHE_TTL_SECS};
use crate::error::CacheError;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

/// String-keyed store with per-entry expiration.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// TTL applied to cache writes made through this store.
    fn default_ttl_secs(&self) -> u64 {
        DEFAULT_CACHE_TTL_SECS
    }

    /// Raw serialized value, or `None` when missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Create or overwrite `key`, expiring after `ttl_secs`.
    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Full names of every live key starting with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, CacheError>;

    /// Connectivity check. In-process stores are always reachable.
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Builds the store selected by `config`.
///
/// Never fails: a missing Redis URL or an unreachable server yields `None`
/// and the cache runs degraded.
pub async fn connect_store(config: &Config) -> Option<Arc<dyn KvStore>> {
    match config.backend {
        StoreBackend::None => {
            info!("Cache backend disabled; running without a store");
            None
        }
        StoreBackend::Memory => {
            info!("Using in-process memory store for the news cache");
            Some(Arc::new(MemoryStore::with_ttl(config.cache_ttl_secs)))
        }
        StoreBackend::Redis => {
            let Some(url) = config.redis_url.as_deref() else {
                warn!("REDIS_URL not set - news cache disabled");
                return None;
            };
            match RedisStore::connect(url, config.cache_ttl_secs).await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    warn!("Redis unavailable, news cache disabled: {}", e);
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_store_none_backend() {
        let config = Config {
            backend: StoreBackend::None,
            ..Config::default()
        };
        assert!(connect_store(&config).await.is_none());
    }

    #[tokio::test]
    async fn test_connect_store_redis_without_url_degrades() {
        let config = Config {
            backend: StoreBackend::Redis,
            redis_url: None,
            ..Config::default()
        };
        assert!(connect_store(&config).await.is_none());
    }

    #[tokio::test]
    async fn test_connect_store_memory_backend() {
        let config = Config {
            backend: StoreBackend::Memory,
            cache_ttl_secs: 60,
            ..Config::default()
        };
        let store = connect_store(&config).await.expect("memory store");
        assert_eq!(store.default_ttl_secs(), 60);
        store.put("k", "v".to_string(), 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
