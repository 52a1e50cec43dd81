//! Utility functions for string processing.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: NFC-compose, lowercase, and collapse whitespace.
///
/// Every piece of text in the engine (queries, titles, content, author names)
/// passes through here before any comparison, so "Exact match" always means
/// "exact match after normalization":
/// - "  배드민턴   모임 " → "배드민턴 모임"
/// - "Seoul Runners" → "seoul runners"
/// - decomposed "무대" (jamo sequence) → composed "무대" (syllable blocks)
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFC normalize (compose jamo sequences into syllable blocks)
/// 2. Lowercase
/// 3. Collapse whitespace runs to single spaces, trimming the ends
///
/// NFC rather than NFD: the Hangul decomposer in [`crate::hangul`] works on
/// composed syllable blocks (U+AC00..U+D7A3). Text that arrives as conjoining
/// jamo (common with macOS filenames and some IMEs) would silently miss every
/// syllable-level match without this step.
///
/// # Algorithm (without unicode-normalization)
///
/// 1. Lowercase only (assumes input is pre-composed)
/// 2. Collapse whitespace
#[cfg(feature = "unicode-normalization")]
pub fn normalize(value: &str) -> String {
    value
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lightweight normalization without the unicode-normalization dependency.
/// Just lowercases and collapses whitespace. Assumes input is pre-composed.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  hello   world  "), "hello world");
        assert_eq!(normalize("\t배드민턴\n모임 "), "배드민턴 모임");
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("Seoul Runners"), "seoul runners");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("  HeLLo   월드  ");
        assert_eq!(normalize(&once), once);
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_normalize_composes_jamo() {
        // "무" as conjoining jamo (U+1106 U+116E) composes to the syllable block
        let decomposed = "\u{1106}\u{116E}";
        assert_eq!(normalize(decomposed), "무");
    }
}
