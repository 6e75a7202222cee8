//! Data models for aggregated news articles.
//!
//! This module defines the records that flow through the application:
//! - [`RawArticle`]: Loosely-populated article as produced by a fetcher
//! - [`Article`]: Normalized article carrying editorial metadata and
//!   validation results
//!
//! Every fetcher output passes through [`normalize`] before it reaches
//! validation or storage, so the rest of the crate can rely on every field
//! being present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::utils::is_valid_url;

/// Category assigned when a fetcher does not provide one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Priority assigned when a fetcher does not provide one.
pub const DEFAULT_PRIORITY: u8 = 5;

/// A raw article as extracted from a news source.
///
/// Only the fields a fetcher can reliably read are required; the rest are
/// filled in by [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct RawArticle {
    /// The headline as published.
    pub title: String,
    /// The canonical link to the story.
    pub url: String,
    /// Plain-text body or summary (HTML already stripped).
    pub content: String,
    /// Publication time asserted by the source, if it could be parsed.
    pub published_at: Option<DateTime<Utc>>,
    /// Source name override; defaults to the fetcher's source name.
    pub source: Option<String>,
    /// Section assigned by the feed configuration, if any.
    pub category: Option<String>,
    /// Editorial priority from the feed configuration, if any.
    pub priority: Option<u8>,
    /// Free-form labels from the feed (RSS `<category>` elements).
    pub tags: Vec<String>,
}

/// A normalized news article.
///
/// This is the unit of work for validation and storage. Validation results
/// (`credibility_score`, `fact_checked`, `cross_references`,
/// `verification_labels`, `warnings`, `validated`) start empty and are only
/// ever filled in by the validation pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Deterministic identifier derived from URL and title.
    pub id: String,
    /// The headline as published.
    pub title: String,
    /// Plain-text body or summary.
    pub content: String,
    /// Canonical source name, used as the key into the credibility table.
    pub source: String,
    /// The canonical link to the story.
    pub url: String,
    /// Publication time asserted by the source. `None` when the feed did not
    /// carry a parseable date.
    pub published_at: Option<DateTime<Utc>>,
    /// Ingestion time, always set on creation.
    pub fetched_at: DateTime<Utc>,
    /// Section the article is filed under; `"general"` when unknown.
    pub category: String,
    /// Editorial priority, 1 (lowest) to 10 (highest).
    pub priority: u8,
    /// Free-form labels carried over from the feed.
    pub tags: Vec<String>,
    /// Blended trust estimate in `[0, 1]`.
    pub credibility_score: f64,
    /// Set once the fact-indicator checker has examined the article.
    pub fact_checked: bool,
    /// Number of distinct other sources that carried a similar story.
    pub cross_references: u32,
    /// Positive findings, e.g. "high credibility" or "cross-verified".
    pub verification_labels: Vec<String>,
    /// Negative findings, e.g. "no clearly attributed source".
    pub warnings: Vec<String>,
    /// Set when the content has been machine-translated. Nothing in this
    /// crate translates yet; the flag is kept for stored records.
    pub translated: bool,
    /// Set once the validation pipeline has run over the article.
    pub validated: bool,
}

impl Article {
    /// Create an article with default editorial metadata and empty
    /// validation results.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        url: impl Into<String>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        let title = title.into();
        let url = url.into();
        Self {
            id: article_id(&url, &title),
            title,
            content: content.into(),
            source: source.into(),
            url,
            published_at,
            fetched_at: Utc::now(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: DEFAULT_PRIORITY,
            tags: Vec::new(),
            credibility_score: 0.0,
            fact_checked: false,
            cross_references: 0,
            verification_labels: Vec::new(),
            warnings: Vec::new(),
            translated: false,
            validated: false,
        }
    }
}

/// Derive the stable article identifier from its URL and title.
///
/// Re-ingesting the same story yields the same id, so storage writes are
/// idempotent upserts.
pub fn article_id(url: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(title.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Turn a fetcher record into a fully populated [`Article`].
///
/// # Arguments
///
/// * `raw` - The record produced by a fetcher
/// * `default_source` - Source name used when the record does not carry one
pub fn normalize(raw: RawArticle, default_source: &str) -> Article {
    let title = raw.title.trim().to_string();
    let url = raw.url.trim().to_string();
    let source = raw
        .source
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_source.to_string());

    let mut article = Article::new(title, raw.content, source, url, raw.published_at);
    if let Some(category) = raw.category.filter(|c| !c.trim().is_empty()) {
        article.category = category;
    }
    article.priority = raw.priority.unwrap_or(DEFAULT_PRIORITY).clamp(1, 10);
    article.tags = raw.tags;
    article
}

/// Reject records that cannot be stored: empty title or malformed URL.
pub fn check_article(article: &Article) -> Result<(), String> {
    if article.title.trim().is_empty() {
        return Err("article has no title".to_string());
    }
    if !is_valid_url(&article.url) {
        return Err(format!("article url is not absolute: {:?}", article.url));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(title: &str, url: &str) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_article_id_is_deterministic() {
        let a = article_id("https://example.com/a", "Title");
        let b = article_id("https://example.com/a", "Title");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_article_id_differs_by_title() {
        assert_ne!(
            article_id("https://example.com/a", "Title one"),
            article_id("https://example.com/a", "Title two")
        );
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let article = normalize(raw("  Headline  ", "https://example.com/x"), "Reuters");
        assert_eq!(article.title, "Headline");
        assert_eq!(article.source, "Reuters");
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.priority, DEFAULT_PRIORITY);
        assert_eq!(article.credibility_score, 0.0);
        assert_eq!(article.cross_references, 0);
        assert!(!article.fact_checked);
        assert!(!article.validated);
        assert!(!article.translated);
        assert!(article.verification_labels.is_empty());
        assert!(article.warnings.is_empty());
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_normalize_keeps_fetcher_metadata() {
        let published = Utc.with_ymd_and_hms(2026, 2, 4, 10, 0, 0).unwrap();
        let article = normalize(
            RawArticle {
                title: "Headline".to_string(),
                url: "https://example.com/x".to_string(),
                content: "Body".to_string(),
                published_at: Some(published),
                source: Some("BBC News".to_string()),
                category: Some("world".to_string()),
                priority: Some(42),
                tags: vec!["politics".to_string()],
            },
            "Fallback",
        );
        assert_eq!(article.source, "BBC News");
        assert_eq!(article.category, "world");
        assert_eq!(article.priority, 10);
        assert_eq!(article.tags, vec!["politics".to_string()]);
        assert_eq!(article.published_at, Some(published));
    }

    #[test]
    fn test_same_url_and_title_give_same_id() {
        let a = normalize(raw("Headline", "https://example.com/x"), "A");
        let b = normalize(raw("Headline", "https://example.com/x"), "B");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_check_article() {
        assert!(check_article(&normalize(raw("Headline", "https://example.com/x"), "A")).is_ok());
        assert!(check_article(&normalize(raw("", "https://example.com/x"), "A")).is_err());
        assert!(check_article(&normalize(raw("Headline", "/relative/path"), "A")).is_err());
    }

    #[test]
    fn test_article_serialization_roundtrip() {
        let article = Article::new("T", "C", "Reuters", "https://example.com", None);
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(article, back);
    }
}
