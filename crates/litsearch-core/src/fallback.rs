//! Deterministic query title used when the summarization model call fails

/// Title used when no keyword survives extraction
pub const FALLBACK_SUMMARY: &str = "Search Results";

const OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];
const MAX_KEYWORDS: usize = 3;
const MIN_KEYWORD_CHARS: usize = 4;

/// Derive a short title from a Boolean query without a model
///
/// Drops parentheses and the uppercase operators, skips short tokens and
/// tokens opening a quoted phrase, and keeps the first three that remain.
pub fn summarize_query_keywords(query: &str) -> String {
    let without_parens: String = query.chars().filter(|c| *c != '(' && *c != ')').collect();

    let keywords: Vec<&str> = without_parens
        .split_whitespace()
        .filter(|token| !OPERATORS.contains(token))
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|token| !token.starts_with(['"', '\'']))
        .take(MAX_KEYWORDS)
        .collect();

    if keywords.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        keywords.join(" ")
    }
}
