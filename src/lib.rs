// src/lib.rs
pub mod cache;
pub mod config;
pub mod error;
pub mod store;
pub mod utils;

// Re-export the facade and store handles for easy access
pub use cache::{
    get_cached_detail, get_cached_list, invalidate_all, set_cached_detail, set_cached_list,
    InvalidationOutcome,
};
pub use error::CacheError;
pub use store::{connect_store, KvStore, MemoryStore, RedisStore};
