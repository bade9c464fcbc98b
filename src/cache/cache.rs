use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::invalidation::{is_expired, news_cache_ttl, CacheLookup};
use crate::cache::versioning::CacheEntry;
use crate::types::identifiers::CacheKey;

// Distinct temp names keep concurrent writers of one key from sharing a file.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key -> payload store with TTL-based freshness.
///
/// One JSON file per key under `root`. Every write replaces the whole entry
/// through a temp file and an atomic rename, so readers never observe a
/// partially written entry. Concurrent writers to the same key: last rename
/// wins.
#[derive(Debug)]
pub struct CacheStore<C = SystemClock> {
    root: PathBuf,
    ttl: Duration,
    clock: C,
}

impl CacheStore<SystemClock> {
    /// Open (creating if needed) a store rooted at `root` with the news TTL.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::with_clock(root, news_cache_ttl(), SystemClock)
    }
}

impl<C: Clock> CacheStore<C> {
    pub fn with_clock(
        root: impl Into<PathBuf>,
        ttl: Duration,
        clock: C,
    ) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, ttl, clock })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{}.json", key.file_stem()))
    }

    /// Look up `key`, judging freshness against the store's TTL.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<CacheLookup<T>> {
        self.get_within(key, self.ttl)
    }

    /// Look up `key`, judging freshness against `ttl`.
    ///
    /// Returns `None` when the key is unknown or the stored entry cannot be
    /// read back (corrupt JSON, wrong payload shape, unknown format, key
    /// mismatch). Never fails.
    pub fn get_within<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        ttl: Duration,
    ) -> Option<CacheLookup<T>> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(key = %key, error = %e, "cache read failed; treating as miss");
                }
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key = %key, error = %e, "cache entry unreadable; treating as miss");
                return None;
            }
        };

        if !entry.is_current_format() {
            debug!(
                key = %key,
                format = %entry.format,
                "unknown cache entry format; treating as miss"
            );
            return None;
        }

        // Hash-prefix collision or a hand-edited file.
        if entry.key != *key {
            debug!(key = %key, stored = %entry.key, "cache key mismatch; treating as miss");
            return None;
        }

        let is_fresh = !is_expired(&entry, ttl, self.clock.now());
        Some(CacheLookup {
            payload: entry.payload,
            stored_at: entry.stored_at,
            is_fresh,
        })
    }

    /// Store `payload` under `key`, stamped with the current time.
    pub fn set<T: Serialize>(&self, key: &CacheKey, payload: &T) -> Result<(), CacheError> {
        let entry = CacheEntry::v1(key.clone(), payload, self.clock.now());
        let bytes = serde_json::to_vec(&entry)?;

        let path = self.entry_path(key);
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.{}.tmp", std::process::id(), seq));

        let mut f = fs::File::create(&temp_path)?;
        f.write_all(&bytes)?;
        f.sync_all()?;
        drop(f);

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove the entry for `key`. Removing an absent key is not an error.
    pub fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
