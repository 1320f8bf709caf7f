//! Parsing of free-form generated text into candidate metrics and keywords.
//!
//! Generated output carries arbitrary preamble and postamble; anything that
//! does not look like a candidate is skipped, never reported.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines this long or longer are not metric candidates.
const MAX_METRIC_LINE_CHARS: usize = 150;

static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.\-*•]+\s*").expect("marker pattern compiles"));

/// Extract `"name: value"` candidates from generated text, in order, with
/// exact-string dedup.
pub fn parse_metric_lines(raw: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.chars().count() < 5 {
            continue;
        }

        let clean = LEADING_MARKER.replace(line, "");
        let clean = clean.trim();

        let Some((name, value)) = clean.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        let looks_numeric =
            value.chars().any(|c| c.is_ascii_digit()) || value.contains('$') || value.contains('%');

        if name.chars().count() > 2
            && !value.is_empty()
            && looks_numeric
            && clean.chars().count() < MAX_METRIC_LINE_CHARS
        {
            let candidate = format!("{}: {}", name, value);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Parse a comma-separated term list (`"Terms: a, b, c"`) into keywords.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let mut text = raw.trim();
    let lower = text.to_lowercase();
    for prefix in ["business terms:", "terms:", "keywords:"] {
        if lower.starts_with(prefix) {
            text = text[prefix.len()..].trim();
            break;
        }
    }

    let mut keywords: Vec<String> = Vec::new();
    for term in text.split(',') {
        let term = term.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
        let len = term.chars().count();
        if len > 2 && len < 30 && !keywords.iter().any(|k| k == term) {
            keywords.push(term.to_string());
        }
    }
    keywords
}
