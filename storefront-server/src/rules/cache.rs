//! Rule Cache
//!
//! TTL key/value store in front of rule execution. Keys are opaque strings,
//! values JSON. Concurrent executions of the same rule may race to populate
//! a key; last write wins and the values are equivalent, so no locking.
//!
//! Callers treat every cache failure as a miss: the engine falls through to
//! direct execution rather than failing the request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Get/set-with-TTL store, keyed by opaque strings
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the value only while its TTL has not elapsed
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Drop every entry whose key starts with `prefix` (rule invalidation)
    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// In-process cache implementation
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        // Scope the shard guard before removing expired entries
        let (value, expired) = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) => {
                if Instant::now() < entry.expires_at {
                    (Some(entry.value.clone()), false)
                } else {
                    (None, true)
                }
            }
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
