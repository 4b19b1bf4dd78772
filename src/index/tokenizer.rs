//! Text tokenization
//!
//! Terms are contiguous ASCII alphanumeric runs, lowercased. The same
//! function feeds both body indexing and title-boost tracking, and it is
//! deterministic: identical input always yields the identical sequence.

use std::collections::HashSet;

/// Splits text into lowercase alphanumeric terms
///
/// The returned iterator is lazy and restartable: calling `tokenize` again on
/// the same input yields an identical sequence.
///
/// # Examples
///
/// ```
/// use crawlrank::index::tokenize;
///
/// let terms: Vec<String> = tokenize("Rust's for-loop, explained!").collect();
/// assert_eq!(terms, vec!["rust", "s", "for", "loop", "explained"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.to_ascii_lowercase())
}

/// Tokenizes a title into a set for query-overlap checks
pub fn title_tokens(title: &str) -> HashSet<String> {
    tokenize(title).collect()
}
