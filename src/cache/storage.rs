use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::cache::constants::{CACHE_DIR_NAME, ENTRY_FILE_EXTENSION, ENTRY_FILE_PREFIX};

/// Manages the file system storage for cached responses
#[derive(Debug, Clone)]
pub struct CacheStorage {
    cache_dir: PathBuf,
}

/// A cached payload as persisted on disk
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub key: String,
    pub stored_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    /// An entry is fresh while its age is below `ttl`
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        // stamped in the future: clock skew or a hand-edited file
        if age < chrono::Duration::zero() {
            return false;
        }
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age < ttl,
            // ttl too large to represent, never expires
            Err(_) => true,
        }
    }
}

/// Stable, filesystem-safe digest of a logical cache key
pub fn digest_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

impl CacheStorage {
    /// Create a new cache storage instance
    pub fn new(custom_cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_cache_dir {
            Some(dir) => dir,
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CACHE_DIR_NAME),
        };

        fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the entry file path for a logical key
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!(
            "{ENTRY_FILE_PREFIX}{}.{ENTRY_FILE_EXTENSION}",
            digest_key(key)
        ))
    }

    /// Read the entry stored under `key`, regardless of its age.
    ///
    /// Returns `Ok(None)` when no file exists or the file belongs to a different key.
    pub fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        let path = self.entry_path(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read cache entry: {}", path.display()));
            }
        };

        let entry: CacheEntry<T> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse cache entry: {}", path.display()))?;

        if entry.key != key {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    /// Write an entry, replacing any previous one for the same key.
    ///
    /// The file is staged next to its target and renamed into place, so readers
    /// see either the old or the new entry, never a partial one.
    pub fn write_entry<T: Serialize>(&self, entry: &CacheEntry<T>) -> Result<()> {
        let path = self.entry_path(&entry.key);
        let json = serde_json::to_vec(entry).context("Failed to serialize cache entry")?;

        let mut staged = NamedTempFile::new_in(&self.cache_dir)
            .context("Failed to create staging file for cache entry")?;
        staged
            .write_all(&json)
            .context("Failed to write staging file for cache entry")?;
        staged
            .persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to persist cache entry: {}", path.display()))?;

        Ok(())
    }
}
