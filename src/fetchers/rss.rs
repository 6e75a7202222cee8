//! Generic RSS 2.0 feed fetcher.
//!
//! Reads `<channel><item>` entries and maps them onto [`RawArticle`]s:
//!
//! | RSS element | Article field |
//! |-------------|---------------|
//! | `title` | `title` |
//! | `link` | `url` |
//! | `description` | `content` (HTML stripped) |
//! | `pubDate` | `published_at` (RFC 2822, RFC 3339 accepted) |
//! | `category` | `tags` |
//!
//! Entries without a parseable date keep `published_at` unset rather than
//! borrowing the fetch time.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};

use super::FetchError;
use super::retry::{FetchAsync, HttpFetcher, RetryFetch};
use crate::config::{FeedSource, FetchSettings};
use crate::models::{Article, RawArticle, check_article, normalize};
use crate::utils::clean_html;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
}

/// Parse an RSS publication date.
pub fn parse_pub_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Parse an RSS document into raw articles, tagging each with the feed's
/// category and priority.
pub fn parse_feed(xml: &str, feed: &FeedSource) -> Result<Vec<RawArticle>, FetchError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    let articles = rss
        .channel
        .items
        .into_iter()
        .map(|item| {
            let published_at = item.pub_date.as_deref().and_then(parse_pub_date);
            if published_at.is_none() {
                debug!(feed = %feed.name, pub_date = ?item.pub_date, "Item has no usable pubDate");
            }
            RawArticle {
                title: item.title.map(|t| clean_html(&t)).unwrap_or_default(),
                url: item.link.unwrap_or_default(),
                content: item.description.map(|d| clean_html(&d)).unwrap_or_default(),
                published_at,
                source: Some(feed.name.clone()),
                category: feed.category.clone(),
                priority: feed.priority,
                tags: item
                    .categories
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            }
        })
        .collect();
    Ok(articles)
}

/// Normalize raw items, drop invalid ones, and cap the count.
pub fn into_articles(raw: Vec<RawArticle>, feed: &FeedSource, max: usize) -> Vec<Article> {
    let total = raw.len();
    let mut articles: Vec<Article> = raw
        .into_iter()
        .map(|r| normalize(r, &feed.name))
        .filter(|a| match check_article(a) {
            Ok(()) => true,
            Err(reason) => {
                warn!(feed = %feed.name, %reason, "Dropping invalid item");
                false
            }
        })
        .collect();
    if articles.len() > max {
        info!(feed = %feed.name, from = articles.len(), to = max, "Capping article count");
        articles.truncate(max);
    }
    info!(feed = %feed.name, kept = articles.len(), total, "Normalized feed items");
    articles
}

/// Fetch and normalize a single feed.
#[instrument(level = "info", skip_all, fields(feed = %feed.name))]
pub async fn fetch_feed<F: FetchAsync>(
    fetcher: &F,
    feed: &FeedSource,
    max_per_source: usize,
) -> Result<Vec<Article>, FetchError> {
    let xml = fetcher.fetch(&feed.url).await?;
    let raw = parse_feed(&xml, feed)?;
    Ok(into_articles(raw, feed, max_per_source))
}

/// Fetch every feed concurrently. Failing feeds are logged and skipped.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
pub async fn fetch_all(feeds: &[FeedSource], settings: &FetchSettings) -> Vec<Article> {
    let http = match HttpFetcher::new(settings) {
        Ok(http) => http,
        Err(e) => {
            error!(error = %e, "Could not build HTTP client");
            return Vec::new();
        }
    };
    let fetcher = RetryFetch::new(http, settings.max_retries, StdDuration::from_secs(1));
    fetch_all_with(&fetcher, feeds, settings).await
}

/// [`fetch_all`] over any fetcher.
pub async fn fetch_all_with<F: FetchAsync>(
    fetcher: &F,
    feeds: &[FeedSource],
    settings: &FetchSettings,
) -> Vec<Article> {
    let per_feed: Vec<Vec<Article>> = stream::iter(feeds)
        .map(|feed| async move {
            match fetch_feed(fetcher, feed, settings.max_news_per_source).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(feed = %feed.name, url = %feed.url, error = %e, "Feed fetch failed");
                    Vec::new()
                }
            }
        })
        .buffer_unordered(settings.concurrency.max(1))
        .collect()
        .await;

    let articles: Vec<Article> = per_feed.into_iter().flatten().collect();
    info!(count = articles.len(), "Fetched articles from all feeds");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    const FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>BBC News - World</title>
    <link>https://www.bbc.co.uk/news/world</link>
    <description>World news</description>
    <item>
      <title>Earthquake strikes northern Japan</title>
      <link>https://www.bbc.co.uk/news/world-asia-1</link>
      <description><![CDATA[<p>A magnitude 7 quake hit the coast, officials <b>said</b>.</p>]]></description>
      <pubDate>Wed, 04 Feb 2026 10:00:00 GMT</pubDate>
      <category>Asia</category>
      <dc:creator>Staff</dc:creator>
      <category>Disasters</category>
    </item>
    <item>
      <title>Markets &amp; currencies steady</title>
      <link>https://www.bbc.co.uk/news/business-2</link>
      <description>Stocks were flat.</description>
      <pubDate>not a date</pubDate>
    </item>
    <item>
      <title></title>
      <link>https://www.bbc.co.uk/news/untitled</link>
    </item>
    <item>
      <title>Relative link story</title>
      <link>/news/relative</link>
    </item>
  </channel>
</rss>"#;

    fn feed() -> FeedSource {
        FeedSource {
            name: "BBC News".to_string(),
            url: "https://feeds.bbci.co.uk/news/world/rss.xml".to_string(),
            category: Some("world".to_string()),
            priority: Some(8),
        }
    }

    #[test]
    fn test_parse_pub_date() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 4, 10, 0, 0).unwrap();
        assert_eq!(parse_pub_date("Wed, 04 Feb 2026 10:00:00 GMT"), Some(expected));
        assert_eq!(parse_pub_date("Wed, 04 Feb 2026 11:00:00 +0100"), Some(expected));
        assert_eq!(parse_pub_date("2026-02-04T10:00:00Z"), Some(expected));
        assert_eq!(parse_pub_date("yesterday"), None);
    }

    #[test]
    fn test_parse_feed_items() {
        let raw = parse_feed(FEED_XML, &feed()).unwrap();
        assert_eq!(raw.len(), 4);

        let first = &raw[0];
        assert_eq!(first.title, "Earthquake strikes northern Japan");
        assert_eq!(first.url, "https://www.bbc.co.uk/news/world-asia-1");
        assert_eq!(first.content, "A magnitude 7 quake hit the coast, officials said .");
        assert!(first.published_at.is_some());
        assert_eq!(first.tags, vec!["Asia", "Disasters"]);
        assert_eq!(first.category.as_deref(), Some("world"));
        assert_eq!(first.priority, Some(8));

        let second = &raw[1];
        assert_eq!(second.title, "Markets & currencies steady");
        assert!(second.published_at.is_none());
    }

    #[test]
    fn test_into_articles_drops_invalid_and_caps() {
        let raw = parse_feed(FEED_XML, &feed()).unwrap();
        let articles = into_articles(raw.clone(), &feed(), 20);
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.source == "BBC News"));
        assert!(articles.iter().all(|a| a.category == "world"));

        let capped = into_articles(raw, &feed(), 1);
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(matches!(parse_feed("<html><body>", &feed()), Err(FetchError::Parse(_))));
    }

    struct StaticFetcher(HashMap<String, String>);

    impl FetchAsync for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    #[tokio::test]
    async fn test_fetch_all_skips_failing_feeds() {
        let good = feed();
        let missing = FeedSource {
            name: "Reuters".to_string(),
            url: "https://example.com/missing.xml".to_string(),
            category: None,
            priority: None,
        };
        let fetcher = StaticFetcher(HashMap::from([(good.url.clone(), FEED_XML.to_string())]));

        let articles = fetch_all_with(&fetcher, &[good, missing], &FetchSettings::default()).await;
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.source == "BBC News"));
    }
}
