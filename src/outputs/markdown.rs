//! Markdown rendering of validated articles.
//!
//! The digest opens with a table of contents, then lists articles grouped by
//! category (alphabetically), highest credibility first within each group.

use crate::models::Article;
use crate::validators::credibility::{LABEL_FAIR, LABEL_HIGH, Verdict, verdict};
use chrono::Utc;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Convert a title into an mdBook-compatible anchor.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

fn verdict_badge(score: f64) -> &'static str {
    match verdict(score) {
        Verdict::Label(LABEL_HIGH) => "🟢",
        Verdict::Label(LABEL_FAIR) => "🟡",
        Verdict::Label(_) => "🟠",
        Verdict::Warning(_) => "🔴",
    }
}

fn group_by_category(articles: &[Article]) -> BTreeMap<&str, Vec<&Article>> {
    let mut groups: BTreeMap<&str, Vec<&Article>> = BTreeMap::new();
    for article in articles {
        groups.entry(article.category.as_str()).or_default().push(article);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| b.credibility_score.total_cmp(&a.credibility_score));
    }
    groups
}

fn render_article(md: &mut String, article: &Article) {
    md.push_str(&format!("### {}\n\n", article.title));
    md.push_str(&format!(
        "{} **{}** · credibility {:.2} · {} cross-reference(s)",
        verdict_badge(article.credibility_score),
        article.source,
        article.credibility_score,
        article.cross_references
    ));
    if let Some(published) = article.published_at {
        md.push_str(&format!(" · {}", published.format("%Y-%m-%d %H:%M UTC")));
    }
    md.push_str("\n\n");

    if !article.verification_labels.is_empty() {
        md.push_str(&format!(
            "**Verified:** {}\n\n",
            article.verification_labels.join(", ")
        ));
    }
    if !article.warnings.is_empty() {
        md.push_str("**Warnings:**\n");
        for warning in &article.warnings {
            md.push_str(&format!("- ⚠️ {}\n", warning));
        }
        md.push('\n');
    }
    if !article.validated {
        md.push_str("_Not yet validated._\n\n");
    }
    md.push_str(&format!("[Read the original]({})\n\n", article.url));
}

/// Render articles as a Markdown digest.
pub fn digest_to_markdown(articles: &[Article]) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# News Digest\n\n_Generated {} · {} article(s)_\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        articles.len()
    ));

    if articles.is_empty() {
        md.push_str("No articles matched.\n");
        return md;
    }

    let groups = group_by_category(articles);

    md.push_str("## Contents\n\n");
    for (category, items) in &groups {
        md.push_str(&format!("- [{}](#{})\n", category, slugify(category)));
        for article in items {
            md.push_str(&format!(
                "\t- [{}](#{})\n",
                article.title,
                slugify(&article.title)
            ));
        }
    }
    md.push('\n');

    for (category, items) in &groups {
        md.push_str(&format!("## {}\n\n", category));
        for article in items {
            render_article(&mut md, article);
        }
    }
    md
}

/// Render and write the digest to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_digest(path: &Path, articles: &[Article]) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, digest_to_markdown(articles)).await?;
    info!("Wrote Markdown digest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, source: &str, category: &str, score: f64) -> Article {
        let mut a = Article::new(
            title,
            "Body",
            source,
            format!("https://example.com/{}", slugify(title)),
            None,
        );
        a.category = category.to_string();
        a.credibility_score = score;
        a.validated = true;
        a
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Quake hits Japan, 7.1"), "quake-hits-japan-71");
        assert_eq!(slugify("World"), "world");
    }

    #[test]
    fn test_empty_digest() {
        let md = digest_to_markdown(&[]);
        assert!(md.starts_with("# News Digest"));
        assert!(md.contains("No articles matched."));
    }

    #[test]
    fn test_groups_by_category_alphabetically() {
        let articles = vec![
            article("Rates held", "Reuters", "world", 0.9),
            article("New phone", "The Verge", "tech", 0.7),
            article("Election results", "BBC News", "world", 0.95),
        ];
        let md = digest_to_markdown(&articles);

        let tech = md.find("## tech").unwrap();
        let world = md.find("## world").unwrap();
        assert!(tech < world);

        // higher score first within a category
        let election = md.find("### Election results").unwrap();
        let rates = md.find("### Rates held").unwrap();
        assert!(election < rates);

        assert!(md.contains("- [Election results](#election-results)"));
        assert!(md.contains("**BBC News** · credibility 0.95"));
    }

    #[test]
    fn test_labels_and_warnings_rendered() {
        let mut a = article("Market moves", "Unknown", "business", 0.4);
        a.verification_labels = vec!["moderate credibility".to_string()];
        a.warnings = vec!["only one source".to_string()];
        let md = digest_to_markdown(&[a]);
        assert!(md.contains("**Verified:** moderate credibility"));
        assert!(md.contains("- ⚠️ only one source"));
        assert!(md.contains("🔴"));
        assert!(md.contains("[Read the original](https://example.com/market-moves)"));
    }

    #[tokio::test]
    async fn test_write_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("digest.md");
        write_digest(&path, &[article("A story", "AFP", "world", 0.9)])
            .await
            .unwrap();
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("### A story"));
    }
}
