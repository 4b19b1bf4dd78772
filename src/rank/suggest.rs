//! Prefix suggestions for autocomplete
//!
//! Completions come from two places: indexed page titles containing the
//! prefix, then vocabulary terms. Terms that start with the prefix outrank
//! substring matches, and within a tier more common terms (higher document
//! frequency) come first.

use crate::index::IndexSnapshot;

/// Minimum prefix length before suggestions are offered
const MIN_PREFIX_LEN: usize = 2;

/// Prefix length required for the looser substring tier
const SUBSTRING_PREFIX_LEN: usize = 3;

/// Returns up to `limit` completions for a query prefix
pub fn suggest(snapshot: &IndexSnapshot, prefix: &str, limit: usize) -> Vec<String> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.len() < MIN_PREFIX_LEN || limit == 0 {
        return Vec::new();
    }

    // (tier, negated df) so that sort puts exact prefixes before substring
    // matches and common terms before rare ones
    let mut terms: Vec<(u8, i64, &str)> = Vec::new();
    for term in snapshot.terms() {
        if term.starts_with(&prefix) {
            terms.push((0, -(snapshot.doc_frequency(term) as i64), term));
        } else if prefix.len() >= SUBSTRING_PREFIX_LEN && term.contains(&prefix) {
            terms.push((1, -(snapshot.doc_frequency(term) as i64), term));
        }
    }
    terms.sort();

    let mut suggestions: Vec<String> = Vec::new();

    // Titles first: they are more specific than bare terms
    for entry in snapshot.docs() {
        let title = entry.title.to_lowercase();
        if !title.is_empty() && title.contains(&prefix) && !suggestions.contains(&title) {
            suggestions.push(title);
            if suggestions.len() >= limit / 2 + 1 {
                break;
            }
        }
    }

    for (_, _, term) in terms {
        if suggestions.len() >= limit {
            break;
        }
        let term = term.to_string();
        if !suggestions.contains(&term) {
            suggestions.push(term);
        }
    }

    suggestions.truncate(limit);
    suggestions
}
