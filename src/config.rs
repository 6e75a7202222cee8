//! Application settings loaded from an optional YAML file.
//!
//! Every field has a default, so a missing or empty file yields a working
//! configuration with validation fully enabled and no feeds.
//!
//! ```yaml
//! validation:
//!   enable_fact_check: true
//!   enable_cross_reference: true
//!   similarity_threshold: 0.6
//! fetch:
//!   max_news_per_source: 20
//! feeds:
//!   - name: BBC News
//!     url: http://feeds.bbci.co.uk/news/world/rss.xml
//!     category: world
//!     priority: 8
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Which validators run and how they are tuned.
    pub validation: ValidationSettings,
    /// HTTP behavior of feed downloads.
    pub fetch: FetchSettings,
    /// RSS feeds ingested by `fetch`.
    pub feeds: Vec<FeedSource>,
}

/// Knobs for the validation pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Register the fact-indicator checker.
    pub enable_fact_check: bool,
    /// Register the cross-reference validator (requires a store).
    pub enable_cross_reference: bool,
    /// Minimum title similarity for two articles to count as the same story.
    pub similarity_threshold: f64,
    /// Half-width of the corroboration window around `published_at`.
    pub window_hours: i64,
    /// How far back the candidate query reaches.
    pub candidate_days: i64,
    /// Upper bound on candidates examined per article.
    pub candidate_limit: usize,
    /// Minimum score applied by `show --trusted`.
    pub min_credibility_threshold: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enable_fact_check: true,
            enable_cross_reference: true,
            similarity_threshold: 0.6,
            window_hours: 24,
            candidate_days: 2,
            candidate_limit: 500,
            min_credibility_threshold: 0.5,
        }
    }
}

/// HTTP behavior of the feed fetchers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchSettings {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Cap on articles kept per feed.
    pub max_news_per_source: usize,
    /// Feeds fetched concurrently.
    pub concurrency: usize,
    /// Retries per feed request after the first failure.
    pub max_retries: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("news_credibility/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_news_per_source: 20,
            concurrency: 4,
            max_retries: 3,
        }
    }
}

/// One RSS feed to ingest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSource {
    /// Canonical source name; must match the credibility table to get a
    /// non-default prior.
    pub name: String,
    /// RSS 2.0 document URL.
    pub url: String,
    /// Category assigned to every article from this feed.
    #[serde(default)]
    pub category: Option<String>,
    /// Editorial priority (1-10) assigned to every article from this feed.
    #[serde(default)]
    pub priority: Option<u8>,
}

impl Settings {
    /// Parse settings from YAML text. Empty text gives the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load settings from `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).await?;
        let settings = Self::from_yaml(&text)?;
        info!(
            path = %path.display(),
            feeds = settings.feeds.len(),
            fact_check = settings.validation.enable_fact_check,
            cross_reference = settings.validation.enable_cross_reference,
            "Loaded configuration"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert!(settings.validation.enable_fact_check);
        assert!(settings.validation.enable_cross_reference);
        assert_eq!(settings.validation.similarity_threshold, 0.6);
        assert_eq!(settings.validation.window_hours, 24);
        assert_eq!(settings.validation.candidate_days, 2);
        assert_eq!(settings.validation.candidate_limit, 500);
        assert_eq!(settings.fetch.max_news_per_source, 20);
        assert!(settings.feeds.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
validation:
  enable_fact_check: false
  similarity_threshold: 0.75
feeds:
  - name: BBC News
    url: http://feeds.bbci.co.uk/news/world/rss.xml
    category: world
    priority: 8
  - name: TechCrunch
    url: https://techcrunch.com/feed/
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert!(!settings.validation.enable_fact_check);
        assert!(settings.validation.enable_cross_reference);
        assert_eq!(settings.validation.similarity_threshold, 0.75);
        assert_eq!(settings.validation.window_hours, 24);
        assert_eq!(settings.feeds.len(), 2);
        assert_eq!(settings.feeds[0].category.as_deref(), Some("world"));
        assert_eq!(settings.feeds[0].priority, Some(8));
        assert_eq!(settings.feeds[1].category, None);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Settings::from_yaml("validation: [1, 2").is_err());
    }

    #[tokio::test]
    async fn test_load_without_path_uses_defaults() {
        let settings = Settings::load(None).await.unwrap();
        assert_eq!(settings.fetch.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "fetch:\n  concurrency: 8\n").await.unwrap();
        let settings = Settings::load(Some(&path)).await.unwrap();
        assert_eq!(settings.fetch.concurrency, 8);
    }
}
