// src/config/settings.rs
use crate::error::CacheError;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Which store the process caches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
    /// Run without a store; every cache call becomes a logged no-op.
    None,
}

impl FromStr for StoreBackend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            "none" | "off" | "" => Ok(StoreBackend::None),
            other => Err(CacheError::Config(format!(
                "Unknown NEWS_CACHE_BACKEND '{}', expected redis, memory or none",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreBackend::Redis => "redis",
            StoreBackend::Memory => "memory",
            StoreBackend::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_ttl_secs: u64,
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
    pub log_level: log::LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            backend: StoreBackend::Redis,
            redis_url: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl Config {
    /// Builds the config from a variable lookup such as `std::env::var`.
    /// Malformed values are reported rather than defaulted.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, CacheError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let cache_ttl_secs = match lookup("NEWS_CACHE_TTL_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|e| {
                CacheError::Config(format!("NEWS_CACHE_TTL_SECS '{}' is not a number: {}", v, e))
            })?,
            None => defaults.cache_ttl_secs,
        };
        let backend = match lookup("NEWS_CACHE_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.backend,
        };
        let log_level = match lookup("LOG_LEVEL") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| CacheError::Config(format!("LOG_LEVEL '{}' is not a log level", v)))?,
            None => defaults.log_level,
        };

        let config = Config {
            cache_ttl_secs,
            backend,
            redis_url: lookup("REDIS_URL").filter(|s| !s.trim().is_empty()),
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.cache_ttl_secs == 0 {
            return Err(CacheError::Config(
                "NEWS_CACHE_TTL_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_and_log(&self) -> Result<(), CacheError> {
        log::info!("News cache configuration loaded: {:?}", self);
        if self.backend == StoreBackend::Redis && self.redis_url.is_none() {
            log::warn!("NEWS_CACHE_BACKEND is redis but REDIS_URL is not set; caching disabled");
        }
        self.validate()
    }
}
