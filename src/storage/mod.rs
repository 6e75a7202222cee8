//! Article storage abstraction.
//!
//! The validation core only ever reads from storage (the corroboration
//! candidate query); fetch and validate jobs write results back through the
//! same trait. Two implementations are provided:
//!
//! - [`memory::MemoryStore`]: in-process map guarded by an `RwLock`, allowing
//!   concurrent reads and serialized writes
//! - [`json::JsonStore`]: a `MemoryStore` persisted to a single JSON file

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::Article;

pub mod json;
pub mod memory;

/// Errors raised by article stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid article JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the lock
    #[error("store lock poisoned")]
    Poisoned,
}

/// Filters for listing stored articles.
///
/// Results are always ordered newest first by publication time.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    /// Maximum number of results.
    pub limit: usize,
    /// Results to skip before the first one returned.
    pub offset: usize,
    /// Exact source name.
    pub source: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Lowest credibility score to include.
    pub min_credibility: Option<f64>,
    /// Only articles published within the last `days` days.
    pub days: Option<i64>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            source: None,
            category: None,
            min_credibility: None,
            days: None,
        }
    }
}

impl ArticleQuery {
    /// Whether an article passes every filter, relative to `now`.
    pub fn matches(&self, article: &Article, now: DateTime<Utc>) -> bool {
        if let Some(ref source) = self.source {
            if &article.source != source {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &article.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_credibility {
            if article.credibility_score < min {
                return false;
            }
        }
        if let Some(days) = self.days {
            match article.published_at {
                Some(published) if days_before(now, days).is_none_or(|c| published >= c) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Aggregate counts over a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    /// Articles in the store.
    pub total: usize,
    /// Articles the pipeline has run over.
    pub validated: usize,
    /// Articles flagged as translated.
    pub translated: usize,
    /// Article count per source, alphabetical.
    pub by_source: BTreeMap<String, usize>,
}

/// Storage backend for normalized articles.
///
/// Implementations must be safe for concurrent readers; writes may be
/// serialized internally.
pub trait ArticleStore: Send + Sync {
    /// Insert or replace an article by id.
    fn save(&self, article: Article) -> Result<(), StoreError>;

    /// Insert or replace several articles, returning how many were written.
    fn save_many(&self, articles: Vec<Article>) -> Result<usize, StoreError> {
        let mut count = 0;
        for article in articles {
            self.save(article)?;
            count += 1;
        }
        Ok(count)
    }

    fn get(&self, id: &str) -> Result<Option<Article>, StoreError>;

    /// List articles matching `query`, newest first.
    fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, StoreError>;

    /// Corroboration candidates: articles published within the last `days`
    /// days, newest first, at most `limit`, excluding `exclude_id`.
    /// Articles without a publication time are never returned.
    fn recent(&self, days: i64, limit: usize, exclude_id: &str)
    -> Result<Vec<Article>, StoreError>;

    /// Articles not yet validated, highest priority first, then newest.
    fn unvalidated(&self, limit: usize) -> Result<Vec<Article>, StoreError>;

    /// Copy the validation result fields of `article` onto the stored record.
    /// Returns `false` if no record with that id exists.
    fn update_validation(&self, article: &Article) -> Result<bool, StoreError>;

    /// Delete articles published (or, when undated, fetched) more than
    /// `days` days ago. Returns how many were removed.
    fn delete_older_than(&self, days: i64) -> Result<usize, StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;
}

/// Start of the `days`-day span ending at `now`.
///
/// `None` when the span reaches past the representable time range, which
/// callers treat as "no cutoff".
pub fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|span| now.checked_sub_signed(span))
}

/// Newest-first ordering key; undated articles sort last.
pub(crate) fn newest_first(a: &Article, b: &Article) -> std::cmp::Ordering {
    b.published_at.cmp(&a.published_at)
}
