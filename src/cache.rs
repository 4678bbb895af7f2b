//! Result cache: key derivation and the stores that hold generated summaries.
//!
//! Keys are built from the prefixed prompt and the three caller-controlled
//! decoding parameters. Every server instance sharing a store must derive
//! byte-identical keys, so the layout below is part of the wire contract.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::metrics::CACHE_SIZE;

/// Namespace tag at the front of every key
pub const KEY_NAMESPACE: &str = "summarize";

/// How long a generated summary stays cached
pub const SUMMARY_TTL: Duration = Duration::from_secs(24 * 3600);

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Connection or command error
    #[error("cache backend: {0}")]
    Backend(String),
}

/// Build the cache key for a prompt and its decoding parameters.
///
/// Layout: `summarize:<sha256(prompt) as lowercase hex>:<max>:<min>:<beams>`.
/// The digest is always 64 hex chars and integers never contain `:`, so
/// the fields cannot bleed into each other.
pub fn derive_key(prompt: &str, max_length: i64, min_length: i64, num_beams: i64) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    format!("{KEY_NAMESPACE}:{digest:x}:{max_length}:{min_length}:{num_beams}")
}

/// Shared key-value store for generated summaries
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a summary; `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a summary that expires `ttl` after the write
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Redis-backed cache shared across server instances.
///
/// Each command opens its own multiplexed connection, so a Redis restart
/// fails only the requests that were in flight while it was down.
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Create the cache client. No connection is made until first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Backend(format!("invalid URL: {e}")))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("connection failed: {e}")))
    }
}

#[async_trait]
impl ResultCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.connection().await?;
        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(format!("GET failed: {e}")))?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.connection().await?;
        let ttl_secs = ttl.as_secs();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Backend(format!("SET failed: {e}")))?;

        tracing::debug!(cache_key = key, ttl_secs, "stored summary");
        Ok(())
    }
}

// Cache entry with its expiry deadline
#[derive(Clone)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: Instant,
}

/// Expired entries are swept out of [`MemoryCache`] once per this many writes
pub const SWEEP_INTERVAL: usize = 256;

/// Process-local cache for single-node deployments and tests
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if now < entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
        }
        // expired entries go away on read
        if self.entries.remove_if(key, |_, e| now >= e.expires_at).is_some() {
            CACHE_SIZE.set(self.entries.len() as f64);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );

        // keys that are never read again would otherwise stay forever
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            let before = self.entries.len();
            self.entries.retain(|_, e| now < e.expires_at);
            tracing::debug!(removed = before - self.entries.len(), "swept expired entries");
        }
        CACHE_SIZE.set(self.entries.len() as f64);
        Ok(())
    }
}
