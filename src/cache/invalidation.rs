use chrono::{DateTime, Duration, Utc};

use crate::cache::versioning::CacheEntry;

/// Lifetime of a cached regional news list: 12 hours.
pub const NEWS_CACHE_TTL_MS: i64 = 43_200_000;

pub fn news_cache_ttl() -> Duration {
    Duration::milliseconds(NEWS_CACHE_TTL_MS)
}

/// `now - stored_at >= ttl`.
///
/// An entry stamped in the future (clock moved backwards) has negative age
/// and is still fresh.
pub fn is_expired<T>(entry: &CacheEntry<T>, ttl: Duration, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(entry.stored_at) >= ttl
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<T> {
    pub payload: T,
    pub stored_at: DateTime<Utc>,
    pub is_fresh: bool,
}

impl<T> CacheLookup<T> {
    /// Payload only when still inside its TTL window.
    pub fn into_fresh(self) -> Option<T> {
        if self.is_fresh {
            Some(self.payload)
        } else {
            None
        }
    }
}
