//! Credibility scoring.
//!
//! The final score blends three signals, each in `[0, 1]`:
//!
//! ```text
//! score = 0.6 * source_prior + 0.2 * completeness + 0.2 * language_style
//! ```
//!
//! rounded to two decimals. The rounded score then selects one label
//! (or the low-credibility warning):
//!
//! | Score | Result |
//! |-------|--------|
//! | `>= 0.85` | label `high credibility` |
//! | `>= 0.70` | label `fairly credible` |
//! | `>= 0.50` | label `moderate credibility` |
//! | `< 0.50` | warning `low credibility, treat with caution` |

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{Assessment, ValidationError, Validator};
use crate::models::Article;
use crate::utils::char_len;

/// Prior assigned to sources missing from [`SOURCE_CREDIBILITY`].
pub const DEFAULT_SOURCE_PRIOR: f64 = 0.60;

pub const LABEL_HIGH: &str = "high credibility";
pub const LABEL_FAIR: &str = "fairly credible";
pub const LABEL_MODERATE: &str = "moderate credibility";
pub const WARN_LOW: &str = "low credibility, treat with caution";
pub const WARN_EMOTIONAL: &str = "detected emotionally charged language";
pub const WARN_SENSATIONAL: &str = "headline may be sensationalized";

/// Hand-curated editorial reputation per source name.
pub const SOURCE_CREDIBILITY: &[(&str, f64)] = &[
    // Wire services
    ("Reuters", 0.98),
    ("Associated Press", 0.97),
    ("AFP", 0.96),
    // Major outlets
    ("BBC News", 0.92),
    ("The Guardian", 0.88),
    ("The New York Times", 0.90),
    ("The Washington Post", 0.89),
    ("Financial Times", 0.91),
    ("The Economist", 0.90),
    ("Al Jazeera", 0.85),
    ("NHK World", 0.90),
    ("The Japan Times", 0.87),
    ("The Asahi Shimbun", 0.86),
    ("The Mainichi", 0.86),
    ("Lianhe Zaobao", 0.88),
    ("8World", 0.85),
    // Tech press
    ("TechCrunch", 0.80),
    ("The Verge", 0.78),
    ("Ars Technica", 0.82),
    // Social aggregators
    ("Hacker News", 0.70),
    ("Reddit", 0.65),
    ("Google News", 0.70),
];

/// Emotionally charged words, matched case-insensitively as substrings.
const EMOTION_WORDS: &[&str] = &[
    "惊人",
    "震惊",
    "疯狂",
    "难以置信",
    "不可思议",
    "绝对",
    "肯定",
    "amazing",
    "shocking",
    "crazy",
    "unbelievable",
    "absolutely",
];

static ALL_CAPS_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{3,}\b").unwrap());

/// Look up the prior trust value for an exact source name.
pub fn source_prior(source: &str) -> f64 {
    SOURCE_CREDIBILITY
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, prior)| *prior)
        .unwrap_or(DEFAULT_SOURCE_PRIOR)
}

/// Structural completeness of an article.
///
/// Starts at 0.5 and rewards a title over 10 characters (+0.1), content over
/// 100 characters (+0.2), a URL (+0.1) and a publication time (+0.1).
/// Looks only at presence and length, never at meaning.
pub fn completeness(article: &Article) -> f64 {
    // tenths, to keep the sum exact
    let mut tenths: u32 = 5;
    if char_len(&article.title) > 10 {
        tenths += 1;
    }
    if char_len(&article.content) > 100 {
        tenths += 2;
    }
    if !article.url.is_empty() {
        tenths += 1;
    }
    if article.published_at.is_some() {
        tenths += 1;
    }
    f64::from(tenths.min(10)) / 10.0
}

/// Result of [`language_style`]: 1.0 means neutral, objective wording.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageStyle {
    /// 1.0 minus all penalties, never below 0.45.
    pub score: f64,
    /// Emotional and sensational-headline warnings, in that order.
    pub warnings: Vec<String>,
}

/// Detect sensational or emotional wording.
///
/// - Each distinct emotion word found in title or content costs 0.1, at most
///   0.3 in total, and adds [`WARN_EMOTIONAL`].
/// - More than one `!`/`！` or more than one `?`/`？` in the title costs 0.15
///   and adds [`WARN_SENSATIONAL`].
/// - More than two all-caps words of three or more letters in the title
///   costs 0.1.
pub fn language_style(article: &Article) -> LanguageStyle {
    // hundredths of a point
    let mut penalty: u32 = 0;
    let mut warnings = Vec::new();

    let text = format!("{} {}", article.title, article.content).to_lowercase();
    let emotion_hits = EMOTION_WORDS.iter().filter(|w| text.contains(*w)).count() as u32;
    if emotion_hits > 0 {
        penalty += (emotion_hits * 10).min(30);
        warnings.push(WARN_EMOTIONAL.to_string());
    }

    let title = &article.title;
    let exclamations = title.chars().filter(|c| matches!(c, '!' | '！')).count();
    let questions = title.chars().filter(|c| matches!(c, '?' | '？')).count();
    if exclamations > 1 || questions > 1 {
        penalty += 15;
        warnings.push(WARN_SENSATIONAL.to_string());
    }

    if ALL_CAPS_WORD.find_iter(title).count() > 2 {
        penalty += 10;
    }

    LanguageStyle {
        score: f64::from(100u32.saturating_sub(penalty)) / 100.0,
        warnings,
    }
}

/// Round to two decimal places.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Label or warning earned by a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Label(&'static str),
    Warning(&'static str),
}

/// Map a rounded credibility score onto its label or warning.
pub fn verdict(score: f64) -> Verdict {
    if score >= 0.85 {
        Verdict::Label(LABEL_HIGH)
    } else if score >= 0.70 {
        Verdict::Label(LABEL_FAIR)
    } else if score >= 0.50 {
        Verdict::Label(LABEL_MODERATE)
    } else {
        Verdict::Warning(WARN_LOW)
    }
}

/// Blends source prior, completeness and language style into
/// `credibility_score` and assigns one credibility label or warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredibilityValidator;

impl CredibilityValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for CredibilityValidator {
    fn name(&self) -> &'static str {
        "credibility"
    }

    fn assess(&self, article: &Article) -> Result<Assessment, ValidationError> {
        let prior = source_prior(&article.source);
        let complete = completeness(article);
        let style = language_style(article);

        let score = round2(0.6 * prior + 0.2 * complete + 0.2 * style.score);
        debug!(
            id = %article.id,
            source = %article.source,
            prior,
            completeness = complete,
            language = style.score,
            score,
            "Scored credibility"
        );

        let mut assessment = Assessment {
            credibility_score: Some(score),
            warnings: style.warnings,
            ..Default::default()
        };
        // label from the stored (rounded) score so the two never disagree
        match verdict(score) {
            Verdict::Label(text) => assessment.label(text),
            Verdict::Warning(text) => assessment.warn(text),
        }
        Ok(assessment)
    }
}
