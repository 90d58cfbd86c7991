use anyhow::Result;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::time::Duration;

use crate::cache::constants::{ITEM_KEY_PREFIX, PAGE_KEY_PREFIX};
use crate::cache::storage::{CacheEntry, CacheStorage};
use crate::config::CacheConfig;

/// Time-bounded cache of serialized responses keyed by request shape.
///
/// Storage problems never surface to callers: an unreadable entry is a miss
/// and a failed write only loses the cached copy.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    storage: CacheStorage,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache instance
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Ok(Self {
            storage: CacheStorage::new(config.dir.clone())?,
            ttl: config.ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn dir(&self) -> &Path {
        self.storage.cache_dir()
    }

    /// Logical key for a single inventory item
    pub fn item_key(id: &str) -> String {
        format!("{ITEM_KEY_PREFIX}{id}")
    }

    /// Logical key for a collection page
    pub fn page_key(page: u32) -> String {
        format!("{PAGE_KEY_PREFIX}{page}")
    }

    /// Fetch a fresh payload for `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.storage.read_entry::<T>(key) {
            Ok(Some(entry)) if entry.is_fresh(self.ttl, Utc::now()) => {
                tracing::debug!(key = %key, "Cache HIT");
                Some(entry.payload)
            }
            Ok(Some(_)) => {
                tracing::debug!(key = %key, "Cache entry expired");
                None
            }
            Ok(None) => {
                tracing::debug!(key = %key, "Cache MISS");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, "Ignoring unreadable cache entry: {:#}", e);
                None
            }
        }
    }

    /// Store `payload` under `key`, superseding any previous entry
    pub fn set<T: Serialize>(&self, key: &str, payload: &T) {
        let entry = CacheEntry {
            key: key.to_string(),
            stored_at: Utc::now(),
            payload,
        };

        if let Err(e) = self.storage.write_entry(&entry) {
            tracing::warn!(key = %key, "Failed to store cache entry: {:#}", e);
        }
    }
}
