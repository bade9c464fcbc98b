use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix for cached regional news lists.
pub const NEWS_KEY_PREFIX: &str = "news_";

/// Caller-supplied cache key. Case-sensitive, compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        CacheKey(key.into())
    }

    /// Key under which the article list for `region` is stored: `"news_" + region`.
    pub fn for_region(region: &str) -> Self {
        CacheKey(format!("{NEWS_KEY_PREFIX}{region}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem of the persisted entry.
    ///
    /// Keys may contain spaces, slashes or non-ASCII region names, so the
    /// on-disk name is derived from a content hash rather than the key itself.
    pub fn file_stem(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        hex[..16].to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
