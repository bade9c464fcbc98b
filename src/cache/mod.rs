pub mod cache;
pub mod clock;
pub mod versioning;
pub mod invalidation;

pub use cache::{CacheError, CacheStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use invalidation::{is_expired, news_cache_ttl, CacheLookup, NEWS_CACHE_TTL_MS};
pub use versioning::{CacheEntry, ENTRY_FORMAT_V1};
