// src/cache/news.rs
//! News list and detail caching with graceful degradation.
//!
//! Every function takes an optional store handle. `None` means no store is
//! configured and the call is a logged no-op. Store and JSON errors on the
//! read/write paths are logged and swallowed; only [`invalidate_all`]
//! reports failure to the caller.

use super::keys::{detail_key, NEWS_DETAIL_PREFIX, NEWS_LIST_KEY};
use crate::error::CacheError;
use crate::store::KvStore;
use futures::future::join_all;
use log::{debug, error, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Result of a bulk invalidation, shaped for returning straight to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationOutcome {
    pub success: bool,
    pub message: String,
}

impl InvalidationOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn failed(err: &CacheError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

/// A stored JSON `null` reads as a miss, the same as an absent key.
async fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>, CacheError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(&raw)? {
        Value::Null => Ok(None),
        value => Ok(Some(serde_json::from_value(value)?)),
    }
}

async fn write_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), CacheError> {
    let raw = serde_json::to_string(value)?;
    store.put(key, raw, store.default_ttl_secs()).await
}

pub async fn get_cached_list<T: DeserializeOwned>(store: Option<&dyn KvStore>) -> Option<T> {
    let Some(store) = store else {
        info!("Store not available - skipping cache");
        return None;
    };

    match read_json(store, NEWS_LIST_KEY).await {
        Ok(cached) => cached,
        Err(e) => {
            error!("Error getting cached news list: {}", e);
            None
        }
    }
}

pub async fn set_cached_list<T: Serialize + ?Sized>(store: Option<&dyn KvStore>, list: &T) {
    let Some(store) = store else {
        info!("Store not available - skipping cache write");
        return;
    };

    if let Err(e) = write_json(store, NEWS_LIST_KEY, list).await {
        error!("Error setting cached news list: {}", e);
    }
}

pub async fn get_cached_detail<T: DeserializeOwned>(store: Option<&dyn KvStore>, id: impl Display) -> Option<T> {
    let Some(store) = store else {
        info!("Store not available - skipping detail cache");
        return None;
    };

    let key = detail_key(id);
    match read_json(store, &key).await {
        Ok(cached) => cached,
        Err(e) => {
            error!("Error getting cached news detail {}: {}", key, e);
            None
        }
    }
}

pub async fn set_cached_detail<T: Serialize + ?Sized>(store: Option<&dyn KvStore>, id: impl Display, detail: &T) {
    let Some(store) = store else {
        info!("Store not available - skipping detail cache write");
        return;
    };

    let key = detail_key(id);
    if let Err(e) = write_json(store, &key, detail).await {
        error!("Error setting cached news detail {}: {}", key, e);
    }
}

async fn delete_all(store: &dyn KvStore) -> Result<usize, CacheError> {
    store.delete(NEWS_LIST_KEY).await?;

    let keys = store.list(NEWS_DETAIL_PREFIX).await?;
    let results = join_all(keys.iter().map(|key| store.delete(key))).await;
    // Any failed deletion fails the whole run; successful ones are not undone.
    results.into_iter().collect::<Result<Vec<()>, CacheError>>()?;

    Ok(keys.len())
}

/// Deletes the list entry and every detail entry.
pub async fn invalidate_all(store: Option<&dyn KvStore>) -> InvalidationOutcome {
    let Some(store) = store else {
        info!("Store not available - no cache to invalidate");
        return InvalidationOutcome::ok("No cache to invalidate");
    };

    match delete_all(store).await {
        Ok(detail_count) => {
            debug!("Invalidated news list and {} detail entries", detail_count);
            InvalidationOutcome::ok("Cache invalidated")
        }
        Err(e) => {
            error!("Error invalidating cache: {}", e);
            InvalidationOutcome::failed(&e)
        }
    }
}
