//! Utility functions for text handling, URL checks and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Character-aware length and truncation for scoring and logging
//! - HTML stripping for feed descriptions
//! - URL validation for normalized articles
//! - File system validation for the data directory

use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Length of a string in Unicode scalar values.
///
/// Headline and body thresholds are expressed in characters so that CJK text
/// is not scored as if it were three times longer than it is.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped characters appended. Never splits a multi-byte character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = char_len(s);
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Check that a URL is absolute and has a host.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// Strip HTML markup and collapse whitespace.
///
/// Feed descriptions frequently embed links, images and paragraphs; only the
/// text nodes are kept.
pub fn clean_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ensure the directory holding `path` exists and is writable.
///
/// Creates the parent directory if needed, then performs a write test by
/// creating and immediately deleting a probe file next to the data file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;
    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(dir = %dir.display(), "Data directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("震惊消息"), 4);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 chars)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("新闻新闻新闻", 2);
        assert_eq!(result, "新闻…(+4 chars)");
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://www.reuters.com/world/article"));
        assert!(is_valid_url("http://feeds.bbci.co.uk/news/rss.xml"));
        assert!(!is_valid_url("/world/article"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_clean_html() {
        let html = "<p>Officials <a href=\"/x\">said</a>   on Monday.</p><img src=\"y.png\"/>";
        assert_eq!(clean_html(html), "Officials said on Monday.");
    }

    #[test]
    fn test_clean_html_plain_text() {
        assert_eq!(clean_html("  plain\n text  "), "plain text");
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("articles.json");
        ensure_writable_parent(&path).await.unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
