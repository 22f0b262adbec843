// src/config/mod.rs
pub mod settings;

pub use settings::{Config, StoreBackend, DEFAULT_CACHE_TTL_SECS};

use crate::error::CacheError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// A `.env` file in the working directory is honored when present.
/// Nothing is logged here since logging is configured from the result.
///
/// The entry TTL reaches cache writes through the store built by
/// [`crate::store::connect_store`].
pub fn load_config() -> Result<Arc<Config>, CacheError> {
    dotenv::dotenv().ok();

    let config = Config::try_from_lookup(|key| std::env::var(key).ok())?;
    Ok(Arc::new(config))
}
