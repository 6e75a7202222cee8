//! In-process article store.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{ArticleQuery, ArticleStore, StoreError, StoreStats, days_before, newest_first};
use crate::models::Article;

/// Articles keyed by id behind an `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: RwLock<HashMap<String, Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `articles`.
    pub fn with_articles(articles: Vec<Article>) -> Self {
        let map = articles.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self {
            articles: RwLock::new(map),
        }
    }

    /// Snapshot of every stored article, newest first.
    pub fn all(&self) -> Result<Vec<Article>, StoreError> {
        let mut all: Vec<Article> = self.read()?.values().cloned().collect();
        all.sort_by(newest_first);
        Ok(all)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Article>>, StoreError> {
        self.articles.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Article>>, StoreError> {
        self.articles.write().map_err(|_| StoreError::Poisoned)
    }
}

impl ArticleStore for MemoryStore {
    fn save(&self, article: Article) -> Result<(), StoreError> {
        debug!(id = %article.id, source = %article.source, "Saving article");
        self.write()?.insert(article.id.clone(), article);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, StoreError> {
        let now = Utc::now();
        let mut hits: Vec<Article> = self
            .read()?
            .values()
            .filter(|a| query.matches(a, now))
            .cloned()
            .collect();
        hits.sort_by(newest_first);
        Ok(hits.into_iter().skip(query.offset).take(query.limit).collect())
    }

    fn recent(
        &self,
        days: i64,
        limit: usize,
        exclude_id: &str,
    ) -> Result<Vec<Article>, StoreError> {
        let cutoff = days_before(Utc::now(), days);
        let mut hits: Vec<Article> = self
            .read()?
            .values()
            .filter(|a| a.id != exclude_id)
            .filter(|a| a.published_at.is_some_and(|p| cutoff.is_none_or(|c| p >= c)))
            .cloned()
            .collect();
        hits.sort_by(newest_first);
        hits.truncate(limit);
        Ok(hits)
    }

    fn unvalidated(&self, limit: usize) -> Result<Vec<Article>, StoreError> {
        let mut hits: Vec<Article> = self
            .read()?
            .values()
            .filter(|a| !a.validated)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| newest_first(a, b)));
        hits.truncate(limit);
        Ok(hits)
    }

    fn update_validation(&self, article: &Article) -> Result<bool, StoreError> {
        let mut guard = self.write()?;
        match guard.get_mut(&article.id) {
            Some(stored) => {
                stored.credibility_score = article.credibility_score;
                stored.fact_checked = article.fact_checked;
                stored.cross_references = article.cross_references;
                stored.verification_labels = article.verification_labels.clone();
                stored.warnings = article.warnings.clone();
                stored.validated = article.validated;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_older_than(&self, days: i64) -> Result<usize, StoreError> {
        let Some(cutoff) = days_before(Utc::now(), days) else {
            debug!(days, "Retention span exceeds the time range; nothing to delete");
            return Ok(0);
        };
        let mut guard = self.write()?;
        let before = guard.len();
        guard.retain(|_, a| a.published_at.unwrap_or(a.fetched_at) >= cutoff);
        Ok(before - guard.len())
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let guard = self.read()?;
        let mut stats = StoreStats {
            total: guard.len(),
            ..Default::default()
        };
        for article in guard.values() {
            if article.validated {
                stats.validated += 1;
            }
            if article.translated {
                stats.translated += 1;
            }
            *stats.by_source.entry(article.source.clone()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
