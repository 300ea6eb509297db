//! Post-processing for raw model text
//!
//! The model is asked for a bare single-line answer but often wraps it in
//! quotes, code fences, or a trailing sentence period. `sanitize` repeats
//! the cleanup steps until nothing changes, so it is idempotent.

const QUOTES: [char; 2] = ['"', '\''];

/// First non-blank line that is not a Markdown code fence
pub fn first_line(text: &str) -> &str {
    text.split(['\n', '\r'])
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("```"))
        .unwrap_or("")
}

/// Strip one pair of matching wrapping quotes
///
/// The pair is only removed when the quote character does not also occur
/// inside, so `"a" AND "b"` keeps its phrases intact.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in QUOTES {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = &trimmed[quote.len_utf8()..trimmed.len() - quote.len_utf8()];
            if !inner.contains(quote) {
                return inner.trim();
            }
        }
    }
    trimmed
}

/// Strip a single trailing period
pub fn strip_trailing_period(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_suffix('.')
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Apply all cleanup steps until a fixpoint is reached
pub fn sanitize(raw: &str) -> String {
    let mut current = raw;
    loop {
        let next = strip_trailing_period(strip_wrapping_quotes(first_line(current)));
        if next == current {
            return next.to_string();
        }
        current = next;
    }
}
