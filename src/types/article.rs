use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized news article.
///
/// This is the only article shape exposed past the feed layer. It always
/// carries a usable `thumbnail_url` (a placeholder when the feed item had
/// no media), so consumers never branch on missing media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub thumbnail_url: String,
}
