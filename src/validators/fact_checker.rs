//! Fact-indicator checking.
//!
//! A keyword heuristic, not fact verification: it looks for attribution
//! phrases ("according to", "据", ...) and for concrete detail (a digit or a
//! date reference in a body longer than 200 characters).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Assessment, ValidationError, Validator};
use crate::models::Article;
use crate::utils::char_len;

pub const LABEL_SOURCED: &str = "contains clear sourcing";
pub const WARN_NO_SOURCE: &str = "no clearly attributed source";
pub const WARN_NO_FACTS: &str = "lacks concrete factual support";

const SOURCE_INDICATORS: &[&str] = &[
    "according to",
    "said",
    "told",
    "reported",
    "confirmed",
    "据",
    "表示",
    "称",
    "报道",
    "证实",
    "消息人士",
];

const DATE_WORDS: &[&str] = &[
    "today",
    "yesterday",
    "tomorrow",
    "this week",
    "今天",
    "昨天",
    "明天",
    "本周",
];

/// Minimum body length, in characters, for an article to count as detailed.
const MIN_DETAIL_CHARS: usize = 200;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

fn combined_text(article: &Article) -> String {
    format!("{} {}", article.title, article.content)
}

/// Whether title or content contains an attribution phrase.
pub fn has_source(article: &Article) -> bool {
    let text = combined_text(article).to_lowercase();
    SOURCE_INDICATORS.iter().any(|phrase| text.contains(phrase))
}

/// Whether the article mentions a number or a date reference and has a body
/// long enough to carry detail.
pub fn has_facts(article: &Article) -> bool {
    let text = combined_text(article);
    let lowered = text.to_lowercase();
    let has_numbers = DIGIT.is_match(&text);
    let has_dates = DATE_WORDS.iter().any(|word| lowered.contains(word));
    (has_numbers || has_dates) && char_len(&article.content) > MIN_DETAIL_CHARS
}

/// Flags articles that lack attribution or concrete detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactChecker;

impl FactChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for FactChecker {
    fn name(&self) -> &'static str {
        "fact_check"
    }

    fn assess(&self, article: &Article) -> Result<Assessment, ValidationError> {
        let sourced = has_source(article);
        let factual = has_facts(article);

        let mut assessment = Assessment {
            fact_checked: true,
            ..Default::default()
        };
        if sourced && factual {
            assessment.label(LABEL_SOURCED);
        }
        if !sourced {
            assessment.warn(WARN_NO_SOURCE);
        }
        if !factual {
            assessment.warn(WARN_NO_FACTS);
        }
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, content: &str) -> Article {
        Article::new(title, content, "Reuters", "https://example.com", None)
    }

    fn padded(body: &str) -> String {
        format!("{body} {}", "Residents were moved to shelters nearby. ".repeat(6))
    }

    #[test]
    fn test_sourced_and_factual() {
        let a = article(
            "Flooding in the river valley",
            &padded("According to officials, 50 people were affected today."),
        );
        assert!(char_len(&a.content) > MIN_DETAIL_CHARS);
        assert!(has_source(&a));
        assert!(has_facts(&a));

        let out = FactChecker.validate(a);
        assert!(out.fact_checked);
        assert_eq!(out.verification_labels, vec![LABEL_SOURCED]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_no_source() {
        let a = article("Flooding in the valley", &padded("Water levels rose 3 metres overnight."));
        let out = FactChecker.validate(a);
        assert!(out.fact_checked);
        assert!(out.verification_labels.is_empty());
        assert_eq!(out.warnings, vec![WARN_NO_SOURCE]);
    }

    #[test]
    fn test_short_content_lacks_facts() {
        let a = article("Flooding", "Officials said 50 people were affected today.");
        let out = FactChecker.validate(a);
        assert!(out.verification_labels.is_empty());
        assert_eq!(out.warnings, vec![WARN_NO_FACTS]);
    }

    #[test]
    fn test_neither_source_nor_facts() {
        let out = FactChecker.validate(article("Flooding", "Water rose."));
        assert_eq!(out.warnings, vec![WARN_NO_SOURCE, WARN_NO_FACTS]);
        assert!(out.fact_checked);
    }

    #[test]
    fn test_long_content_without_numbers_or_dates() {
        let a = article("Flooding", &padded("Officials said water rose."));
        assert!(has_source(&a));
        assert!(!has_facts(&a));
    }

    #[test]
    fn test_chinese_indicators() {
        let body = format!("据新华社报道，今天有数百人撤离。{}", "当地政府正在组织救援工作。".repeat(20));
        let a = article("洪水袭击河谷地区", &body);
        assert!(has_source(&a));
        assert!(has_facts(&a));
    }

    #[test]
    fn test_attribution_is_case_insensitive() {
        let a = article("ACCORDING TO the ministry", "");
        assert!(has_source(&a));
    }

    #[test]
    fn test_rerun_does_not_duplicate() {
        let once = FactChecker.validate(article("Flooding", "Water rose."));
        let twice = FactChecker.validate(once.clone());
        assert_eq!(once, twice);
    }
}
