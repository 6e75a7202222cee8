//! JSON file persistence for the article store.
//!
//! All articles live in memory (see [`MemoryStore`]) and are written to a
//! single JSON array on [`JsonStore::flush`]:
//!
//! ```text
//! data/
//! └── articles.json
//! ```
//!
//! Writes go to a sibling temporary file that is renamed over the target, so
//! an interrupted flush never leaves a truncated store behind.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

use super::memory::MemoryStore;
use super::{ArticleQuery, ArticleStore, StoreError, StoreStats};
use crate::models::Article;

/// A [`MemoryStore`] loaded from and flushed to a JSON file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Load the store at `path`. A missing file yields an empty store.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let articles: Vec<Article> = match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Store file not found; starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        info!(count = articles.len(), "Loaded article store");
        Ok(Self {
            path,
            inner: MemoryStore::with_articles(articles),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every article to disk, newest first.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn flush(&self) -> Result<(), StoreError> {
        let articles = self.inner.all()?;
        let json = serde_json::to_string_pretty(&articles)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;
        info!(count = articles.len(), "Flushed article store");
        Ok(())
    }
}

impl ArticleStore for JsonStore {
    fn save(&self, article: Article) -> Result<(), StoreError> {
        self.inner.save(article)
    }

    fn get(&self, id: &str) -> Result<Option<Article>, StoreError> {
        self.inner.get(id)
    }

    fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, StoreError> {
        self.inner.query(query)
    }

    fn recent(
        &self,
        days: i64,
        limit: usize,
        exclude_id: &str,
    ) -> Result<Vec<Article>, StoreError> {
        self.inner.recent(days, limit, exclude_id)
    }

    fn unvalidated(&self, limit: usize) -> Result<Vec<Article>, StoreError> {
        self.inner.unvalidated(limit)
    }

    fn update_validation(&self, article: &Article) -> Result<bool, StoreError> {
        self.inner.update_validation(article)
    }

    fn delete_older_than(&self, days: i64) -> Result<usize, StoreError> {
        self.inner.delete_older_than(days)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        self.inner.stats()
    }
}
