//! Bag-of-words title similarity.
//!
//! Titles are lowercased, split on whitespace, stripped of a small English
//! stop-word list, and compared by Jaccard index over the remaining word
//! sets. No stemming and no segmentation of CJK text, so unspaced Chinese or
//! Japanese titles only match when they are near-identical.

use std::collections::HashSet;

const STOP_WORDS: &[&str] = &["the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for"];

fn content_words(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of two titles' content-word sets, in `[0, 1]`.
///
/// Returns 0.0 when either title has no content words.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let words_a = content_words(a);
    let words_b = content_words(b);
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}
