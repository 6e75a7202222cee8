//! # News Credibility
//!
//! A news aggregation pipeline that pulls articles from RSS feeds, scores
//! each one for credibility, checks it for concrete facts and attribution,
//! and looks for the same story from other sources before storing it.
//!
//! ## Features
//!
//! - Fetches configured RSS feeds concurrently with retry and backoff
//! - Blends a per-source reputation prior with completeness and
//!   language-style heuristics into a credibility score
//! - Flags unsourced or fact-free articles
//! - Counts corroborating sources that ran a similar headline within a day
//! - Persists articles to a JSON store and renders Markdown digests
//!
//! ## Usage
//!
//! ```sh
//! news_credibility --config config.yaml fetch --validate
//! news_credibility show --min-credibility 0.7 --markdown digest.md
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: Download and normalize feed items ([`fetchers`])
//! 2. **Storing**: Upsert articles by id ([`storage`])
//! 3. **Validating**: Run the validator pipeline and persist its results
//!    ([`validators`])
//! 4. **Output**: List articles or write a Markdown digest ([`outputs`])

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetchers;
mod models;
mod outputs;
mod storage;
mod utils;
mod validators;

use cli::{Cli, Command};
use config::Settings;
use models::Article;
use storage::json::JsonStore;
use storage::ArticleStore;
use utils::{ensure_writable_parent, truncate_for_log};
use validators::ValidationPipeline;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_credibility starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.data, ?args.command, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref()).await?;

    if args.command.writes() {
        if let Err(e) = ensure_writable_parent(&args.data).await {
            error!(
                path = %args.data.display(),
                error = %e,
                "Data directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let store = Arc::new(JsonStore::open(&args.data).await?);
    debug!(path = %store.path().display(), "Opened article store");

    match args.command {
        Command::Fetch { sources, validate } => {
            run_fetch(&settings, &store, &sources, validate).await?
        }
        Command::Validate { limit } => run_validate(&settings, &store, limit).await?,
        Command::Show { ref markdown, .. } => {
            let query = args
                .command
                .article_query(settings.validation.min_credibility_threshold)
                .unwrap_or_default();
            let articles = store.query(&query)?;
            info!(count = articles.len(), "Matched stored articles");
            match markdown {
                Some(path) => outputs::markdown::write_digest(path, &articles).await?,
                None => print_listing(&articles),
            }
        }
        Command::Detail { ref id } => match store.get(id)? {
            Some(article) => print_detail(&article),
            None => {
                warn!(%id, "Article not found");
                eprintln!("Error: no article with id {}", id);
            }
        },
        Command::Stats => {
            let stats = store.stats()?;
            println!("Articles:   {}", stats.total);
            println!("Validated:  {}", stats.validated);
            println!("Translated: {}", stats.translated);
            for (source, count) in &stats.by_source {
                println!("  {:<24} {}", source, count);
            }
        }
        Command::Clean { days } => {
            let removed = store.delete_older_than(days)?;
            info!(removed, days, "Deleted old articles");
            store.flush().await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Fetch configured feeds, store new articles and optionally validate them.
///
/// New articles are saved before validation so that stories from the same
/// run can corroborate each other.
#[instrument(level = "info", skip(settings, store, sources))]
async fn run_fetch(
    settings: &Settings,
    store: &Arc<JsonStore>,
    sources: &[String],
    validate: bool,
) -> Result<(), Box<dyn Error>> {
    let feeds: Vec<_> = settings
        .feeds
        .iter()
        .filter(|f| sources.is_empty() || sources.contains(&f.name))
        .cloned()
        .collect();
    if feeds.is_empty() {
        warn!(?sources, "No matching feeds configured; nothing to fetch");
        return Ok(());
    }

    let fetched = fetchers::rss::fetch_all(&feeds, &settings.fetch).await;
    let total = fetched.len();
    let mut fresh = Vec::new();
    for article in fetched.into_iter().unique_by(|a| a.id.clone()) {
        if store.get(&article.id)?.is_none() {
            fresh.push(article);
        }
    }
    info!(total, new = fresh.len(), "Fetched articles");

    let saved = store.save_many(fresh.clone())?;
    info!(saved, "Stored new articles");

    if validate && !fresh.is_empty() {
        let shared: Arc<dyn ArticleStore> = store.clone();
        let pipeline = ValidationPipeline::new(&settings.validation, Some(shared));
        persist_validation(&**store, pipeline.validate_batch(fresh))?;
    }

    store.flush().await?;
    Ok(())
}

/// Validate the highest-priority unvalidated articles and persist results.
#[instrument(level = "info", skip(settings, store))]
async fn run_validate(
    settings: &Settings,
    store: &Arc<JsonStore>,
    limit: usize,
) -> Result<(), Box<dyn Error>> {
    let pending = store.unvalidated(limit)?;
    if pending.is_empty() {
        info!("No unvalidated articles");
        return Ok(());
    }

    let shared: Arc<dyn ArticleStore> = store.clone();
    let pipeline = ValidationPipeline::new(&settings.validation, Some(shared));
    persist_validation(&**store, pipeline.validate_batch(pending))?;

    store.flush().await?;
    Ok(())
}

fn persist_validation(
    store: &dyn ArticleStore,
    validated: Vec<Article>,
) -> Result<(), Box<dyn Error>> {
    let mut updated = 0usize;
    for article in &validated {
        if store.update_validation(article)? {
            updated += 1;
        } else {
            warn!(id = %article.id, "Validated article is no longer stored");
        }
    }
    info!(updated, total = validated.len(), "Persisted validation results");
    Ok(())
}

fn print_listing(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles matched.");
        return;
    }
    for article in articles {
        print!("{}", listing_entry(article));
    }
}

/// One `show` entry: score line, labels (+), warnings (!), link and id.
fn listing_entry(article: &Article) -> String {
    let mut entry = format!(
        "[{:.2}] {} ({}, {} cross-reference(s))\n",
        article.credibility_score,
        truncate_for_log(&article.title, 80),
        article.source,
        article.cross_references
    );
    for label in &article.verification_labels {
        entry.push_str(&format!("       + {}\n", label));
    }
    for warning in &article.warnings {
        entry.push_str(&format!("       ! {}\n", warning));
    }
    entry.push_str(&format!("       {}\n", article.url));
    entry.push_str(&format!("       id: {}\n", article.id));
    entry
}

fn print_detail(article: &Article) {
    let published = article
        .published_at
        .map(|p| p.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());
    println!("{}", article.title);
    println!("{}", "=".repeat(article.title.chars().count().min(80)));
    println!("id:               {}", article.id);
    println!("source:           {}", article.source);
    println!("url:              {}", article.url);
    println!("category:         {}", article.category);
    println!("priority:         {}", article.priority);
    println!("published:        {}", published);
    println!("fetched:          {}", article.fetched_at.to_rfc3339());
    println!("tags:             {}", article.tags.join(", "));
    println!("validated:        {}", article.validated);
    println!("credibility:      {:.2}", article.credibility_score);
    println!("fact checked:     {}", article.fact_checked);
    println!("cross-references: {}", article.cross_references);
    println!("labels:           {}", article.verification_labels.join(", "));
    println!("warnings:         {}", article.warnings.join("; "));
    println!();
    println!("{}", article.content);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_entry_shows_labels_and_warnings() {
        let mut article = Article::new(
            "Earthquake strikes northern Japan",
            "Content",
            "Reuters",
            "https://www.reuters.com/quake",
            None,
        );
        article.credibility_score = 0.93;
        article.cross_references = 3;
        article.verification_labels = vec!["high credibility".into(), "cross-verified".into()];
        article.warnings = vec!["lacks concrete factual support".into()];

        let entry = listing_entry(&article);
        let lines: Vec<&str> = entry.lines().collect();
        assert_eq!(
            lines[0],
            "[0.93] Earthquake strikes northern Japan (Reuters, 3 cross-reference(s))"
        );
        assert_eq!(lines[1].trim(), "+ high credibility");
        assert_eq!(lines[2].trim(), "+ cross-verified");
        assert_eq!(lines[3].trim(), "! lacks concrete factual support");
        assert_eq!(lines[5].trim(), format!("id: {}", article.id));
    }
}
