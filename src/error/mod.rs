// src/error/mod.rs
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Backend operation failed (network, protocol, lock poisoning)
    #[error("Store Error: {0}")]
    Store(String),

    /// JSON encode/decode failure for a cached payload
    #[error("Serialization Error: {0}")]
    Serialization(String),

    /// Backend could not be reached when building the store
    #[error("Connection Error: {0}")]
    Connection(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Store(format!("Redis error: {}", err))
    }
}
