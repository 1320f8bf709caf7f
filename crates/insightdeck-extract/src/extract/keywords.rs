//! Lexicon keyword extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum keywords returned by the pattern extractor.
pub const MAX_PATTERN_KEYWORDS: usize = 8;

/// Business terms recognized in source text.
pub const BUSINESS_LEXICON: &[&str] = &[
    "revenue",
    "profit",
    "growth",
    "market",
    "customer",
    "sales",
    "strategy",
    "innovation",
    "performance",
    "efficiency",
    "competitive",
    "advantage",
    "leadership",
    "expansion",
    "digital",
    "technology",
    "platform",
    "solution",
    "investment",
    "partnership",
    "acquisition",
    "retention",
    "conversion",
    "optimization",
    "transformation",
    "improvement",
    "sustainable",
    "quality",
    "experience",
    "engagement",
    "brand",
    "value",
    "proposition",
    "share",
    "satisfaction",
    "excellence",
    "scalability",
    "compliance",
    "security",
    "management",
    "development",
    "operational",
    "financial",
    "strategic",
];

static LEXICON_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"\b(?:{})\b", BUSINESS_LEXICON.join("|"));
    Regex::new(&pattern).expect("lexicon pattern compiles")
});

/// Lexicon terms in the order they first appear, deduplicated, capped.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for m in LEXICON_RE.find_iter(&text_lower) {
        let term = m.as_str();
        if !keywords.iter().any(|k| k == term) {
            keywords.push(term.to_string());
            if keywords.len() >= MAX_PATTERN_KEYWORDS {
                break;
            }
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_first_occurrence_order() {
        let keywords = extract_keywords("Revenue and GROWTH drove market growth; revenue again.");
        assert_eq!(keywords, vec!["revenue", "growth", "market"]);
    }

    #[test]
    fn test_keywords_whole_words_only() {
        // "marketing" and "shared" must not match "market" / "share"
        let keywords = extract_keywords("The marketing team shared results.");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_keywords_capped() {
        let text = BUSINESS_LEXICON.join(" ");
        assert_eq!(extract_keywords(&text).len(), MAX_PATTERN_KEYWORDS);
    }
}
