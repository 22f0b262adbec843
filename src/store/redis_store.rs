// src/store/redis_store.rs
//! Redis-backed [`KvStore`], the production home of the news cache.

use super::KvStore;
use crate::error::CacheError;
use async_trait::async_trait;
use log::{debug, error, info};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::fmt;

/// A shared Redis store.
/// Uses a `ConnectionManager` for automatic reconnection and resilience.
#[derive(Clone)]
pub struct RedisStore {
    conn_manager: ConnectionManager,
    default_ttl_secs: u64,
    redis_url: String, // Store for debug purposes
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("redis_url", &self.redis_url)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("conn_manager", &"<ConnectionManager instance>")
            .finish()
    }
}

impl RedisStore {
    pub async fn connect(redis_url: &str, default_ttl_secs: u64) -> Result<Self, CacheError> {
        info!("Initializing Redis connection manager for URL: {}", redis_url);
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Invalid Redis URL {}: {}", redis_url, e)))?;
        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create Redis ConnectionManager: {}", e);
            CacheError::Connection(format!("Failed to create Redis ConnectionManager: {}", e))
        })?;
        info!(
            "Redis ConnectionManager initialized successfully. Default TTL: {}s",
            default_ttl_secs
        );
        Ok(Self {
            conn_manager,
            default_ttl_secs,
            redis_url: redis_url.to_string(),
        })
    }
}

/// Escapes glob metacharacters so `prefix` matches literally in `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl KvStore for RedisStore {
    fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        debug!("Attempting to GET cache for key: {}", key);
        let mut conn = self.conn_manager.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("Cache HIT for key: {}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("Cache MISS for key: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for key {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        // SETEX rejects a zero expiry; an entry that expires immediately is a delete.
        if ttl_secs == 0 {
            return self.delete(key).await;
        }
        let mut conn = self.conn_manager.clone();
        match conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            Ok(()) => {
                debug!("Cache SETEX success for key: {} with TTL: {}s", key, ttl_secs);
                Ok(())
            }
            Err(e) => {
                error!("Redis SETEX error for key {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        debug!("Attempting to DEL cache for key: {}", key);
        let mut conn = self.conn_manager.clone();
        match conn.del::<_, i32>(key).await {
            Ok(count) => {
                debug!("Redis DEL removed {} key(s) for {}", count, key);
                Ok(())
            }
            Err(e) => {
                error!("Redis DEL error for key {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut conn = self.conn_manager.clone();
        let mut keys = Vec::new();
        // Walk the cursor by hand: a failed page must fail the whole listing.
        let mut cursor: u64 = 0;
        loop {
            let (next, page) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .query_async::<_, (u64, Vec<String>)>(&mut conn)
                .await
                .map_err(|e| {
                    error!("Redis SCAN error for pattern {} at cursor {}: {}", pattern, cursor, e);
                    CacheError::from(e)
                })?;
            keys.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may return a key more than once across cursor steps.
        keys.sort_unstable();
        keys.dedup();
        debug!("Redis SCAN {} matched {} key(s)", pattern, keys.len());
        Ok(keys)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn_manager.clone();
        let reply = redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        debug!("Redis PING reply: {}", reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{invalidate_all, InvalidationOutcome};
    use std::collections::HashMap;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one RESP array command, returning its arguments.
    async fn read_command(reader: &mut BufReader<TcpStream>) -> Option<Vec<String>> {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            line.clear();
            reader.read_line(&mut line).await.ok()?;
            let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
            let mut buf = vec![0u8; len + 2];
            reader.read_exact(&mut buf).await.ok()?;
            buf.truncate(len);
            args.push(String::from_utf8(buf).ok()?);
        }
        Some(args)
    }

    /// Minimal Redis stand-in. `SCAN` replies come from `scan_pages`, keyed by
    /// the requested cursor; `DEL` answers `:1`; anything else answers `+OK`.
    async fn spawn_fake_redis(scan_pages: HashMap<&'static str, &'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let scan_pages = scan_pages.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(socket);
                    while let Some(args) = read_command(&mut reader).await {
                        let reply = match args[0].to_ascii_uppercase().as_str() {
                            "SCAN" => scan_pages
                                .get(args[1].as_str())
                                .copied()
                                .unwrap_or("-ERR unexpected cursor\r\n"),
                            "DEL" => ":1\r\n",
                            _ => "+OK\r\n",
                        };
                        if reader.get_mut().write_all(reply.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });
        format!("redis://{}", addr)
    }

    #[tokio::test]
    async fn test_list_follows_cursor_across_pages() {
        let url = spawn_fake_redis(HashMap::from([
            ("0", "*2\r\n$1\r\n5\r\n*1\r\n$13\r\nnews:detail:2\r\n"),
            ("5", "*2\r\n$1\r\n0\r\n*2\r\n$13\r\nnews:detail:1\r\n$13\r\nnews:detail:2\r\n"),
        ]))
        .await;
        let store = RedisStore::connect(&url, 60).await.unwrap();
        assert_eq!(
            store.list("news:detail:").await.unwrap(),
            vec!["news:detail:1".to_string(), "news:detail:2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_scan_page_fails_list_and_invalidation() {
        let url = spawn_fake_redis(HashMap::from([
            ("0", "*2\r\n$1\r\n5\r\n*1\r\n$13\r\nnews:detail:1\r\n"),
            ("5", "-ERR connection lost mid-scan\r\n"),
        ]))
        .await;
        let store = RedisStore::connect(&url, 60).await.unwrap();

        let err = store.list("news:detail:").await.unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
        assert!(err.to_string().contains("connection lost mid-scan"));

        let outcome: InvalidationOutcome = invalidate_all(Some(&store)).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("connection lost mid-scan"));
    }

    #[tokio::test]
    async fn test_connect_keeps_configured_ttl() {
        let url = spawn_fake_redis(HashMap::new()).await;
        let store = RedisStore::connect(&url, 90).await.unwrap();
        assert_eq!(store.default_ttl_secs(), 90);
    }

    #[test]
    fn test_escape_glob_plain_prefix_unchanged() {
        assert_eq!(escape_glob("news:detail:"), "news:detail:");
    }

    #[test]
    fn test_escape_glob_metacharacters() {
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let err = RedisStore::connect("not a redis url", 60).await.unwrap_err();
        assert!(matches!(err, CacheError::Connection(_)));
    }
}
