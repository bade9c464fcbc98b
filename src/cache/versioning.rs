use chrono::{DateTime, Utc};

use crate::types::identifiers::CacheKey;

/// Format tag written into every persisted entry.
/// Entries carrying any other tag are treated as absent.
pub const ENTRY_FORMAT_V1: &str = "cache-entry/1";

// Key point:
// Serializable
// Whole-entry writes only
// Key stored alongside payload for verification on read
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CacheEntry<T> {
    pub format: String,
    pub key: CacheKey,
    pub stored_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    pub fn v1(key: CacheKey, payload: T, stored_at: DateTime<Utc>) -> Self {
        Self {
            format: ENTRY_FORMAT_V1.into(),
            key,
            stored_at,
            payload,
        }
    }

    pub fn is_current_format(&self) -> bool {
        self.format == ENTRY_FORMAT_V1
    }
}
