//! Ordered validator registry.
//!
//! The pipeline is an explicit, constructed object: whoever drives the
//! fetch → validate → store flow builds one from settings and an optional
//! store, and owns it for as long as it needs it.
//!
//! Stage order is fixed:
//!
//! 1. Credibility (always)
//! 2. Fact-indicator check (when `enable_fact_check`)
//! 3. Cross-reference (when `enable_cross_reference` and a store is given)
//!
//! A failing stage is logged and skipped; the remaining stages still run and
//! the article is always marked validated.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    Assessment, CredibilityValidator, CrossReferenceValidator, FactChecker, ValidationError,
    Validator,
};
use crate::config::ValidationSettings;
use crate::models::Article;
use crate::storage::ArticleStore;

/// The closed set of validators a pipeline can run.
#[derive(Debug)]
pub enum Stage {
    Credibility(CredibilityValidator),
    FactCheck(FactChecker),
    CrossReference(CrossReferenceValidator),
}

impl Validator for Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Credibility(v) => v.name(),
            Stage::FactCheck(v) => v.name(),
            Stage::CrossReference(v) => v.name(),
        }
    }

    fn assess(&self, article: &Article) -> Result<Assessment, ValidationError> {
        match self {
            Stage::Credibility(v) => v.assess(article),
            Stage::FactCheck(v) => v.assess(article),
            Stage::CrossReference(v) => v.assess(article),
        }
    }
}

/// Runs every registered stage over an article.
#[derive(Debug)]
pub struct ValidationPipeline {
    stages: Vec<Stage>,
}

impl ValidationPipeline {
    /// Build the stage list from settings.
    ///
    /// Cross-referencing needs candidate articles, so it is only registered
    /// when `store` is provided.
    pub fn new(settings: &ValidationSettings, store: Option<Arc<dyn ArticleStore>>) -> Self {
        let mut stages = vec![Stage::Credibility(CredibilityValidator::new())];
        if settings.enable_fact_check {
            stages.push(Stage::FactCheck(FactChecker::new()));
        }
        if settings.enable_cross_reference {
            if let Some(store) = store {
                stages.push(Stage::CrossReference(CrossReferenceValidator::new(
                    store, settings,
                )));
            }
        }
        let pipeline = Self { stages };
        info!(stages = ?pipeline.stage_names(), "Validation pipeline ready");
        pipeline
    }

    /// Names of the registered stages, in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate one article. Never fails: stage errors are logged and the
    /// article keeps whatever the other stages produced.
    pub fn validate(&self, article: Article) -> Article {
        let mut article = self
            .stages
            .iter()
            .fold(article, |article, stage| stage.validate(article));
        article.validated = true;
        debug!(
            id = %article.id,
            score = article.credibility_score,
            cross_references = article.cross_references,
            "Article validated"
        );
        article
    }

    /// Validate articles one at a time, preserving order.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub fn validate_batch(&self, articles: Vec<Article>) -> Vec<Article> {
        let total = articles.len();
        let validated: Vec<Article> = articles
            .into_iter()
            .enumerate()
            .map(|(i, article)| {
                debug!(progress = i + 1, total, "Validating");
                self.validate(article)
            })
            .collect();
        info!(total, "Batch validation complete");
        validated
    }
}
