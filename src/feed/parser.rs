use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::feed::FeedError;
use crate::types::Article;

/// `source` used when neither the item nor its link names one.
pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<RawText>,
    #[serde(rename = "media:thumbnail", alias = "thumbnail")]
    thumbnails: Vec<RawText>,
    #[serde(rename = "media:content", alias = "content")]
    contents: Vec<RawMediaContent>,
    #[serde(rename = "media:group", alias = "group")]
    groups: Vec<RawMediaGroup>,
}

/// `<media:content>`, which may nest its own `<media:thumbnail>`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMediaContent {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "media:thumbnail", alias = "thumbnail")]
    thumbnails: Vec<RawText>,
}

impl RawMediaContent {
    fn media_url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnails.iter().find_map(RawText::media_url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMediaGroup {
    #[serde(rename = "media:thumbnail", alias = "thumbnail")]
    thumbnails: Vec<RawText>,
    #[serde(rename = "media:content", alias = "content")]
    contents: Vec<RawMediaContent>,
}

/// An element that may carry its value as a `url` attribute or as text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawText {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "$text")]
    text: Option<String>,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl RawText {
    fn media_url(&self) -> Option<&str> {
        non_blank(self.url.as_deref()).or_else(|| non_blank(self.text.as_deref()))
    }

    fn label(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }
}

/// Where an article's thumbnail came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    MediaThumbnail(String),
    MediaContent(String),
    Placeholder,
}

impl Thumbnail {
    /// Any `media:thumbnail` (item level, then `media:group`, then nested in
    /// `media:content`) beats any `media:content` url.
    fn resolve(item: &RawItem) -> Self {
        let group_contents = || item.groups.iter().flat_map(|g| g.contents.iter());
        let all_contents = || item.contents.iter().chain(group_contents());

        let thumbnail = item
            .thumbnails
            .iter()
            .chain(item.groups.iter().flat_map(|g| g.thumbnails.iter()))
            .find_map(RawText::media_url)
            .or_else(|| all_contents().find_map(RawMediaContent::thumbnail_url));
        if let Some(url) = thumbnail {
            return Thumbnail::MediaThumbnail(url.to_string());
        }
        if let Some(url) = all_contents().find_map(RawMediaContent::media_url) {
            return Thumbnail::MediaContent(url.to_string());
        }
        Thumbnail::Placeholder
    }

    pub fn into_url(self, fallback: &str) -> String {
        match self {
            Thumbnail::MediaThumbnail(url) | Thumbnail::MediaContent(url) => url,
            Thumbnail::Placeholder => fallback.to_string(),
        }
    }
}

pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

fn source_from_link(link: &Url) -> Option<String> {
    let host = link.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Map one raw item to an article. `None` when title or link is unusable.
fn normalize(item: RawItem, fallback_thumbnail: &str) -> Option<Article> {
    let title = non_blank(item.title.as_deref())?.to_string();
    let link = Url::parse(non_blank(item.link.as_deref())?).ok()?;

    let source = item
        .source
        .as_ref()
        .and_then(RawText::label)
        .map(str::to_string)
        .or_else(|| source_from_link(&link))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

    let published_at = item.pub_date.as_deref().and_then(parse_pub_date);
    let thumbnail_url = Thumbnail::resolve(&item).into_url(fallback_thumbnail);

    Some(Article {
        title,
        url: link.to_string(),
        published_at,
        source,
        thumbnail_url,
    })
}

/// Parse an RSS document into at most `max_items` articles.
///
/// Each `<item>` is decoded on its own, so a malformed item is skipped
/// without failing the batch. Articles are de-duplicated by URL; the first
/// occurrence wins. Fails only when the document itself is not well-formed
/// RSS.
pub fn parse_articles(
    xml: &str,
    fallback_thumbnail: &str,
    max_items: usize,
) -> Result<Vec<Article>, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut saw_channel = false;
    let mut seen_urls = HashSet::new();
    let mut articles = Vec::new();
    let mut skipped = 0usize;

    loop {
        let start = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"channel" => saw_channel = true,
                b"item" if saw_channel => {
                    let end = e.to_end().into_owned();
                    reader.read_to_end(end.name())?;
                    let fragment = &xml[start..reader.buffer_position()];

                    if articles.len() >= max_items {
                        continue;
                    }
                    let article = quick_xml::de::from_str::<RawItem>(fragment)
                        .map_err(|e| debug!(error = %e, "skipping undecodable feed item"))
                        .ok()
                        .and_then(|item| normalize(item, fallback_thumbnail));

                    match article {
                        Some(article) if seen_urls.insert(article.url.clone()) => {
                            articles.push(article)
                        }
                        Some(article) => {
                            debug!(url = %article.url, "skipping duplicate feed item")
                        }
                        None => skipped += 1,
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_channel {
        return Err(FeedError::NotAFeed);
    }
    if skipped > 0 {
        debug!(skipped, "skipped malformed feed items");
    }
    Ok(articles)
}
