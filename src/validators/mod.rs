//! Article validation: credibility scoring, fact indicators and
//! cross-source corroboration.
//!
//! Each validator inspects an [`Article`] and reports an [`Assessment`], a
//! delta of field updates plus labels and warnings to add. Validators never
//! mutate the article themselves; [`Assessment::apply`] merges the delta and
//! skips labels or warnings the article already carries, so running the same
//! validator twice leaves the article unchanged the second time.
//!
//! # Submodules
//!
//! - [`credibility`]: source priors, completeness and language-style scoring
//! - [`fact_checker`]: attribution phrases and concrete-fact heuristics
//! - [`similarity`]: bag-of-words title similarity
//! - [`cross_reference`]: corroborating sources within a time window
//! - [`pipeline`]: ordered registry of validators run per article
//!
//! Every label or warning is a fixed English string so downstream consumers
//! can match on it.

use thiserror::Error;
use tracing::{debug, error};

use crate::models::Article;
use crate::storage::StoreError;
use crate::utils::truncate_for_log;

pub mod credibility;
pub mod cross_reference;
pub mod fact_checker;
pub mod pipeline;
pub mod similarity;

pub use credibility::CredibilityValidator;
pub use cross_reference::CrossReferenceValidator;
pub use fact_checker::FactChecker;
pub use pipeline::{Stage, ValidationPipeline};

/// Why a validator could not produce an assessment.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The article has no publication time to anchor a time window on
    #[error("article has no publication time")]
    MissingTimestamp,

    /// Fetching corroboration candidates failed
    #[error("candidate query failed: {0}")]
    Store(#[from] StoreError),
}

/// Changes a validator wants applied to an article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    /// Replaces `credibility_score` when set.
    pub credibility_score: Option<f64>,
    /// Replaces `cross_references` when set.
    pub cross_references: Option<u32>,
    /// Mark the article as examined by the fact-indicator checker.
    pub fact_checked: bool,
    /// Verification labels to add.
    pub labels: Vec<String>,
    /// Warnings to add.
    pub warnings: Vec<String>,
}

impl Assessment {
    /// Queue a verification label.
    pub fn label(&mut self, text: &str) {
        self.labels.push(text.to_string());
    }

    /// Queue a warning.
    pub fn warn(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }

    /// Merge this delta into `article`.
    ///
    /// Scores and counts overwrite; labels and warnings are appended in
    /// order unless an identical entry is already present.
    pub fn apply(self, article: &mut Article) {
        if let Some(score) = self.credibility_score {
            article.credibility_score = score;
        }
        if let Some(count) = self.cross_references {
            article.cross_references = count;
        }
        if self.fact_checked {
            article.fact_checked = true;
        }
        merge_unique(&mut article.verification_labels, self.labels);
        merge_unique(&mut article.warnings, self.warnings);
    }
}

fn merge_unique(target: &mut Vec<String>, additions: Vec<String>) {
    for item in additions {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

/// A single validation step.
pub trait Validator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect `article` and report what should change.
    fn assess(&self, article: &Article) -> Result<Assessment, ValidationError>;

    /// Assess and merge. On failure the error is logged and the article is
    /// returned as it came in.
    fn validate(&self, mut article: Article) -> Article {
        match self.assess(&article) {
            Ok(assessment) => {
                debug!(
                    validator = self.name(),
                    id = %article.id,
                    title = %truncate_for_log(&article.title, 30),
                    labels = ?assessment.labels,
                    warnings = ?assessment.warnings,
                    "Validator finished"
                );
                assessment.apply(&mut article);
            }
            Err(e) => {
                error!(
                    validator = self.name(),
                    id = %article.id,
                    source = %article.source,
                    error = %e,
                    "Validator failed; article left unchanged"
                );
            }
        }
        article
    }
}
