//! Command-line interface definitions for News Credibility.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options can also be provided via environment variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::storage::ArticleQuery;

/// Command-line arguments for the News Credibility application.
///
/// # Examples
///
/// ```sh
/// # Fetch configured feeds and validate them in one go
/// news_credibility --config config.yaml fetch --validate
///
/// # Validate up to 50 stored articles that have not been validated yet
/// news_credibility validate --limit 50
///
/// # Write a digest of trusted articles from the last day
/// news_credibility show --min-credibility 0.7 --days 1 --markdown digest.md
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true, env = "NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the JSON article store
    #[arg(
        short,
        long,
        global = true,
        env = "NEWS_DATA",
        default_value = "./data/articles.json"
    )]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Fetch articles from the configured feeds and store them
    Fetch {
        /// Only fetch feeds with this name (repeatable)
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Validate fetched articles before storing them
        #[arg(long)]
        validate: bool,
    },

    /// Validate stored articles that have not been validated yet
    Validate {
        /// Maximum number of articles to validate
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// List stored articles, optionally writing a Markdown digest
    Show {
        /// Maximum number of articles to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Only articles from this source name
        #[arg(short, long)]
        source: Option<String>,

        /// Only articles in this category
        #[arg(long)]
        category: Option<String>,

        /// Only articles scoring at least this credibility
        #[arg(short = 'M', long)]
        min_credibility: Option<f64>,

        /// Only articles at or above the configured credibility threshold
        #[arg(long, conflicts_with = "min_credibility")]
        trusted: bool,

        /// Only articles published within this many days
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        days: Option<i64>,

        /// Write the listing as a Markdown digest to this path
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Print every field of one stored article
    Detail {
        /// Article id as shown by `show`
        id: String,
    },

    /// Print store statistics
    Stats,

    /// Delete articles older than the given number of days
    Clean {
        /// Retention period; undated articles age by fetch time
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(0..))]
        days: i64,
    },
}

impl Command {
    /// Listing filters for `show`. `threshold` is the configured minimum
    /// credibility, applied only with `--trusted`. Without a score flag every
    /// article is listed, including ones not yet validated.
    pub fn article_query(&self, threshold: f64) -> Option<ArticleQuery> {
        match self {
            Command::Show {
                limit,
                source,
                category,
                min_credibility,
                trusted,
                days,
                ..
            } => Some(ArticleQuery {
                limit: *limit,
                source: source.clone(),
                category: category.clone(),
                min_credibility: min_credibility.or(trusted.then_some(threshold)),
                days: *days,
                ..Default::default()
            }),
            _ => None,
        }
    }

    /// Whether the command modifies the store.
    pub fn writes(&self) -> bool {
        !matches!(
            self,
            Command::Show { .. } | Command::Detail { .. } | Command::Stats
        )
    }
}
