pub mod config;
pub mod parser;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheStore, Clock, SystemClock};
use crate::types::{Article, CacheKey};
pub use config::FeedConfig;
pub use parser::{parse_articles, parse_pub_date, Thumbnail};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Response is not an RSS feed")]
    NotAFeed,
}

/// Regional news with a persisted, time-bounded cache in front of the
/// network.
///
/// Every public call returns a plain list. Failures are logged and produce
/// an empty list; they never touch the cache.
pub struct FeedFetcher<C = SystemClock> {
    http: reqwest::Client,
    cache: Arc<CacheStore<C>>,
    config: FeedConfig,
}

impl<C: Clock> FeedFetcher<C> {
    pub fn new(config: FeedConfig, cache: Arc<CacheStore<C>>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, config, cache))
    }

    pub fn with_client(
        http: reqwest::Client,
        config: FeedConfig,
        cache: Arc<CacheStore<C>>,
    ) -> Self {
        Self { http, cache, config }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Articles for `region`, from cache when fresh.
    ///
    /// `force_refresh` skips the freshness check and always goes to the
    /// network; a successful result is still written back, restarting the
    /// TTL window.
    pub async fn fetch_for_region(&self, region: &str, force_refresh: bool) -> Vec<Article> {
        let key = CacheKey::for_region(region);
        let ttl = chrono::Duration::milliseconds(self.config.cache_ttl_ms);

        if !force_refresh {
            if let Some(articles) = self
                .cache
                .get_within::<Vec<Article>>(&key, ttl)
                .and_then(|lookup| lookup.into_fresh())
            {
                debug!(region = %region, count = articles.len(), "serving news from cache");
                return articles;
            }
        }

        let articles = match self.fetch_remote(region).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(region = %region, error = %e, "news fetch failed");
                return Vec::new();
            }
        };

        if articles.is_empty() {
            debug!(region = %region, "feed returned no usable articles; cache left as is");
            return articles;
        }

        if let Err(e) = self.cache.set(&key, &articles) {
            warn!(key = %key, error = %e, "failed to write news cache");
        }
        articles
    }

    /// One network round trip: fetch, parse, normalize. No caching.
    pub async fn fetch_remote(&self, region: &str) -> Result<Vec<Article>, FeedError> {
        let url = self.config.url_for(region);
        debug!(region = %region, url = %url, "fetching news feed");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        parse_articles(&body, &self.config.fallback_thumbnail, self.config.max_items)
    }
}
