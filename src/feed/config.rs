use crate::cache::NEWS_CACHE_TTL_MS;

/// Placeholder in `endpoint_template` replaced by the encoded query.
pub const QUERY_PLACEHOLDER: &str = "{query}";

// Key point:
// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Search URL containing `{query}`.
    pub endpoint_template: String,
    /// Appended to the region name to form the search query.
    pub topic_qualifier: String,
    pub max_items: usize,
    pub request_timeout_secs: u64,
    pub cache_ttl_ms: i64,
    pub fallback_thumbnail: String,
}

impl FeedConfig {
    pub fn v0() -> Self {
        Self {
            endpoint_template: concat!(
                "https://news.google.com/rss/search",
                "?q={query}&hl=en-US&gl=US&ceid=US:en"
            )
            .into(),
            topic_qualifier: "agriculture".into(),
            max_items: 20,
            request_timeout_secs: 10,
            cache_ttl_ms: NEWS_CACHE_TTL_MS,
            fallback_thumbnail: "https://via.placeholder.com/150".into(),
        }
    }

    /// `"<region> <qualifier>"`.
    pub fn query_for(&self, region: &str) -> String {
        let region = region.trim();
        let qualifier = self.topic_qualifier.trim();
        if qualifier.is_empty() {
            region.to_string()
        } else {
            format!("{region} {qualifier}")
        }
    }

    /// Endpoint with the form-encoded query substituted in.
    pub fn url_for(&self, region: &str) -> String {
        let query = self.query_for(region);
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.endpoint_template.replace(QUERY_PLACEHOLDER, &encoded)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::v0()
    }
}
