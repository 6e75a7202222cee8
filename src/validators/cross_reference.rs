//! Cross-source corroboration.
//!
//! Counts how many *other* sources carried a similarly titled story within a
//! time window around the article's publication time. This is a proxy for
//! how widely a story has been picked up, not for whether it is true.
//!
//! # Algorithm
//!
//! 1. Fetch candidates from the store: published within the last
//!    `candidate_days` days, at most `candidate_limit`, excluding the article
//! 2. Keep candidates published within `±window_hours` of the article
//! 3. Keep candidates whose title similarity is at least the threshold
//! 4. Count distinct sources among them, ignoring the article's own source
//!
//! Each article costs one linear scan over at most `candidate_limit`
//! candidates.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::similarity::title_similarity;
use super::{Assessment, ValidationError, Validator};
use crate::config::ValidationSettings;
use crate::models::Article;
use crate::storage::ArticleStore;

pub const LABEL_MULTI_SOURCE: &str = "multi-source confirmed";
pub const LABEL_CROSS_VERIFIED: &str = "cross-verified";
pub const WARN_SINGLE_SOURCE: &str = "single source, not yet corroborated by other outlets";

/// Finds corroborating articles from other sources.
pub struct CrossReferenceValidator {
    store: Arc<dyn ArticleStore>,
    similarity_threshold: f64,
    window: Duration,
    candidate_days: i64,
    candidate_limit: usize,
}

impl CrossReferenceValidator {
    pub fn new(store: Arc<dyn ArticleStore>, settings: &ValidationSettings) -> Self {
        Self {
            store,
            similarity_threshold: settings.similarity_threshold,
            window: Duration::try_hours(settings.window_hours).unwrap_or(Duration::MAX),
            candidate_days: settings.candidate_days,
            candidate_limit: settings.candidate_limit,
        }
    }

    /// Distinct other sources reporting a similar story near `article`.
    pub fn corroborating_sources(
        &self,
        article: &Article,
    ) -> Result<HashSet<String>, ValidationError> {
        let published = article.published_at.ok_or(ValidationError::MissingTimestamp)?;
        // windows past the representable range are open-ended
        let start = published
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = published
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let candidates =
            self.store
                .recent(self.candidate_days, self.candidate_limit, &article.id)?;
        let scanned = candidates.len();

        let sources: HashSet<String> = candidates
            .into_iter()
            .filter(|c| c.id != article.id)
            .filter(|c| c.published_at.is_some_and(|p| start <= p && p <= end))
            .filter(|c| c.source != article.source)
            .filter(|c| title_similarity(&article.title, &c.title) >= self.similarity_threshold)
            .map(|c| c.source)
            .collect();

        debug!(id = %article.id, scanned, corroborating = sources.len(), "Cross-reference scan");
        Ok(sources)
    }
}

impl fmt::Debug for CrossReferenceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossReferenceValidator")
            .field("similarity_threshold", &self.similarity_threshold)
            .field("window", &self.window)
            .field("candidate_days", &self.candidate_days)
            .field("candidate_limit", &self.candidate_limit)
            .finish()
    }
}

impl Validator for CrossReferenceValidator {
    fn name(&self) -> &'static str {
        "cross_reference"
    }

    fn assess(&self, article: &Article) -> Result<Assessment, ValidationError> {
        let count = self.corroborating_sources(article)?.len() as u32;
        let mut assessment = Assessment {
            cross_references: Some(count),
            ..Default::default()
        };
        if count >= 5 {
            assessment.label(LABEL_MULTI_SOURCE);
        } else if count >= 3 {
            assessment.label(LABEL_CROSS_VERIFIED);
        } else if count == 0 {
            assessment.warn(WARN_SINGLE_SOURCE);
        }
        Ok(assessment)
    }
}
