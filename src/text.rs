//! Text matching primitives shared by the sector and team scorers.
//!
//! Normalization: lowercase, strip everything outside `[a-z0-9\s]`, collapse
//! whitespace. Keyword hits are substring matches against normalized targets,
//! so "machine learning" hits "Machine-Learning platform" but not "machine".

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));

/// Lowercase and reduce to alphanumeric words separated by single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct keywords that appear (as substrings) in at least one of the
/// normalized targets. Order follows the keyword list, so evidence strings
/// stay reproducible across runs.
pub fn keyword_hits<'a>(keywords: &'a [String], targets: &[&str]) -> Vec<&'a str> {
    let normalized: Vec<String> = targets.iter().map(|t| normalize(t)).collect();
    keywords
        .iter()
        .filter(|kw| {
            let needle = kw.to_lowercase();
            !needle.is_empty() && normalized.iter().any(|t| t.contains(&needle))
        })
        .map(String::as_str)
        .collect()
}

/// Case-insensitive substring containment without normalization.
/// Used where punctuation is meaningful (geography strings, summaries).
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
