//! Small text helpers shared by the extractors.

/// A number as written in prose: `1,200`, `850`, `23.5`. Thousands groups
/// must be complete, so trailing punctuation is never part of the match.
pub(crate) const NUMBER_PATTERN: &str = r"(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";

/// Sentences as the summary and fallback paths see them: split on `.`,
/// trimmed, longer than `min_chars` characters.
pub fn long_sentences(text: &str, min_chars: usize) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > min_chars)
        .collect()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
