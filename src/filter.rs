//! Eligibility text heuristics
//!
//! Plain-text matching used by the ranking criteria. All functions expect
//! already lowercased input where noted and never fail: malformed values
//! fall back to the neutral result.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref CGPA_REQUIREMENT: Regex =
        Regex::new(r"cgpa\s*[≥>=]*\s*([\d\.]+)").expect("valid cgpa pattern");
}

/// Whitespace tokens of `text`, lowercased.
pub fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Share of `user` tokens that also appear in `other`. Zero when `user` is empty.
pub fn token_overlap(user: &HashSet<String>, other: &HashSet<String>) -> f64 {
    if user.is_empty() {
        return 0.0;
    }
    let shared = user.intersection(other).count();
    shared as f64 / user.len() as f64
}

/// Compile a case-insensitive whole-word matcher for `needle`.
///
/// Returns `None` for blank input.
pub fn whole_word_pattern(needle: &str) -> Option<Regex> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(needle));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(needle, error = %e, "could not build whole-word pattern");
            None
        }
    }
}

/// Case-insensitive substring containment; blank needles never match.
pub fn contains_phrase(needle: &str, haystack: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle)
}

/// Parse a CGPA-like string and scale it onto [0, 1].
pub fn normalize_cgpa(value: &str, max_cgpa: f64) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }
    match value.parse::<f64>() {
        Ok(raw) if !raw.is_nan() => (raw / max_cgpa).clamp(0.0, 1.0),
        _ => {
            tracing::debug!(value, "unparseable cgpa, treating as 0");
            0.0
        }
    }
}

/// Extract the number following "cgpa" (and an optional comparison) in lowercased text.
///
/// Only the first occurrence is considered. A malformed literal such as
/// "7.5." yields `None`.
pub fn extract_cgpa_requirement(eligibility_lower: &str) -> Option<f64> {
    let caps = CGPA_REQUIREMENT.captures(eligibility_lower)?;
    let literal = caps.get(1)?.as_str();
    match literal.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(literal, "malformed cgpa requirement, keeping baseline");
            None
        }
    }
}

/// Score a normalized user CGPA against an optional raw requirement.
pub fn cgpa_match(user_norm: f64, required: Option<f64>, max_cgpa: f64) -> f64 {
    let Some(required) = required else {
        return user_norm;
    };
    let required_norm = (required / max_cgpa).clamp(0.0, 1.0);
    if user_norm >= required_norm {
        1.0
    } else {
        (user_norm / required_norm).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_overlap() {
        let user = tokens("Pune Maharashtra India");
        let other = tokens("open to students from maharashtra, india");
        // "india" matches, "maharashtra," does not
        assert!((token_overlap(&user, &other) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_user_tokens_score_zero() {
        let other = tokens("anything at all");
        assert_eq!(token_overlap(&HashSet::new(), &other), 0.0);
    }

    #[test]
    fn test_whole_word_does_not_match_inside_word() {
        let male = whole_word_pattern("male").unwrap();
        assert!(!male.is_match("open to female students"));
        assert!(male.is_match("male students only"));

        let female = whole_word_pattern("Female").unwrap();
        assert!(female.is_match("Open to female students"));
    }

    #[test]
    fn test_whole_word_escapes_metacharacters() {
        let re = whole_word_pattern("b.tech").unwrap();
        assert!(re.is_match("pursuing b.tech degree"));
        assert!(!re.is_match("pursuing bxtech degree"));
    }

    #[test]
    fn test_blank_needles_never_match() {
        assert!(whole_word_pattern("  ").is_none());
        assert!(!contains_phrase("", "anything"));
    }

    #[test]
    fn test_contains_phrase_is_substring() {
        assert!(contains_phrase("IIT", "students of iit bombay"));
        // substring collision is accepted behaviour
        assert!(contains_phrase("arts", "open to all parts of india"));
    }

    #[test]
    fn test_normalize_cgpa() {
        assert_eq!(normalize_cgpa("8.0", 10.0), 0.8);
        assert_eq!(normalize_cgpa("12", 10.0), 1.0);
        assert_eq!(normalize_cgpa("-3", 10.0), 0.0);
        assert_eq!(normalize_cgpa("eight", 10.0), 0.0);
        assert_eq!(normalize_cgpa("", 10.0), 0.0);
        assert_eq!(normalize_cgpa("NaN", 10.0), 0.0);
    }

    #[test]
    fn test_extract_cgpa_requirement() {
        assert_eq!(extract_cgpa_requirement("minimum cgpa >= 7.5"), Some(7.5));
        assert_eq!(extract_cgpa_requirement("cgpa ≥ 8"), Some(8.0));
        assert_eq!(extract_cgpa_requirement("cgpa 6.5 or above"), Some(6.5));
        assert_eq!(extract_cgpa_requirement("cgpa of at least 7"), None);
        assert_eq!(extract_cgpa_requirement("no score rules"), None);
    }

    #[test]
    fn test_malformed_requirement_is_none() {
        assert_eq!(extract_cgpa_requirement("cgpa >= 7.5."), None);
        assert_eq!(extract_cgpa_requirement("cgpa >= ."), None);
    }

    #[test]
    fn test_cgpa_match() {
        assert_eq!(cgpa_match(0.8, Some(7.5), 10.0), 1.0);
        assert!((cgpa_match(0.6, Some(9.0), 10.0) - 0.6 / 0.9).abs() < 1e-12);
        assert_eq!(cgpa_match(0.42, None, 10.0), 0.42);
        assert_eq!(cgpa_match(0.0, Some(0.0), 10.0), 1.0);
    }
}
