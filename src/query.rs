// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query parsing: raw user input → [`ParsedQuery`].
//!
//! The grammar is small and forgiving:
//! - `"모임 공지"` - double quotes keep a phrase together
//! - `!광고` - a leading bang excludes candidates containing the term
//! - `테니스 & 모임`, `족구 | 풋살` - `&` and `|` are recognized and recorded,
//!   but scoring stays additive across terms either way
//!
//! Parsing never fails. Malformed input (dangling quote, bare `!`, only
//! punctuation) degrades to fewer parts, worst case an all-empty query.

use std::collections::BTreeSet;

use crate::types::{BoolOp, ParsedQuery};
use crate::utils::normalize;

/// Parse a raw query string.
///
/// The input is normalized first, so two queries that differ only in case or
/// whitespace runs parse identically. Steps, in order:
///
/// 1. Normalize (lowercase, collapse whitespace).
/// 2. Pair up double quotes left to right; each pair yields an exact phrase.
///    A dangling opening quote is dropped and its tail parses as plain terms.
/// 3. Split what remains on whitespace and on the `&`/`|` marker characters.
/// 4. Tokens starting with `!` become exclusions, the rest become terms.
/// 5. Record which marker characters appeared (outside of phrases).
///
/// Duplicate terms, phrases, and exclusions are kept once, in first-seen
/// order - scoring is additive per term, so a repeated term must not count
/// twice.
///
/// # Example
///
/// ```
/// use dongne_search::query::parse;
///
/// let q = parse("\"모임 공지\" 배드민턴 !광고");
/// assert_eq!(q.exact_phrases, vec!["모임 공지"]);
/// assert_eq!(q.terms, vec!["배드민턴"]);
/// assert_eq!(q.exclude_terms, vec!["광고"]);
/// ```
pub fn parse(raw: &str) -> ParsedQuery {
    let normalized = normalize(raw);
    let (exact_phrases, remainder) = extract_phrases(&normalized);

    let mut detected_operators = BTreeSet::new();
    if remainder.contains('&') {
        detected_operators.insert(BoolOp::And);
    }
    if remainder.contains('|') {
        detected_operators.insert(BoolOp::Or);
    }

    let mut terms: Vec<String> = Vec::new();
    let mut exclude_terms: Vec<String> = Vec::new();
    for token in remainder.split(|c: char| c.is_whitespace() || c == '&' || c == '|') {
        if token.is_empty() {
            continue;
        }
        if let Some(body) = token.strip_prefix('!') {
            if !body.is_empty() && !exclude_terms.iter().any(|t| t == body) {
                exclude_terms.push(body.to_string());
            }
        } else if !terms.iter().any(|t| t == token) {
            terms.push(token.to_string());
        }
    }

    ParsedQuery {
        terms,
        exact_phrases,
        exclude_terms,
        detected_operators,
    }
}

/// Pull double-quoted phrases out of a normalized query.
///
/// Returns the phrases (trimmed, blanks dropped, deduped) and the remainder
/// with each quoted span replaced by a space. Quotes pair left to right; an
/// unpaired trailing quote is dropped and the text after it stays in the
/// remainder.
fn extract_phrases(input: &str) -> (Vec<String>, String) {
    let mut phrases: Vec<String> = Vec::new();
    let mut remainder = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '"' {
            remainder.push(c);
            continue;
        }
        let mut span = String::new();
        let mut closed = false;
        for pc in chars.by_ref() {
            if pc == '"' {
                closed = true;
                break;
            }
            span.push(pc);
        }
        if closed {
            let phrase = span.trim();
            if !phrase.is_empty() && !phrases.iter().any(|p| p == phrase) {
                phrases.push(phrase.to_string());
            }
            remainder.push(' ');
        } else {
            // Dangling quote: its tail is plain terms, not a phrase.
            remainder.push(' ');
            remainder.push_str(&span);
        }
    }

    (phrases, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_terms() {
        let q = parse("테니스 모임");
        assert_eq!(q.terms, vec!["테니스", "모임"]);
        assert!(q.exact_phrases.is_empty());
        assert!(q.exclude_terms.is_empty());
        assert!(q.detected_operators.is_empty());
    }

    #[test]
    fn test_parse_quoted_phrase() {
        let q = parse("\"모임 공지\" 배드민턴");
        assert_eq!(q.exact_phrases, vec!["모임 공지"]);
        assert_eq!(q.terms, vec!["배드민턴"]);
    }

    #[test]
    fn test_parse_exclusions() {
        let q = parse("중고 !광고 !판매완료");
        assert_eq!(q.terms, vec!["중고"]);
        assert_eq!(q.exclude_terms, vec!["광고", "판매완료"]);
    }

    #[test]
    fn test_parse_operators_detected_and_split() {
        let q = parse("테니스&모임");
        assert_eq!(q.terms, vec!["테니스", "모임"]);
        assert!(q.detected_operators.contains(&BoolOp::And));
        assert!(!q.detected_operators.contains(&BoolOp::Or));

        let q = parse("족구 | 풋살");
        assert_eq!(q.terms, vec!["족구", "풋살"]);
        assert!(q.detected_operators.contains(&BoolOp::Or));
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let a = parse("  Tennis   Club  ");
        let b = parse("tennis club");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_empty_inputs() {
        assert!(parse("").is_empty());
        assert!(parse("   \t ").is_empty());
        // Quotes around nothing, a bare bang, bare markers
        let q = parse("\"\" ! & |");
        assert!(q.terms.is_empty());
        assert!(q.exact_phrases.is_empty());
        assert!(q.exclude_terms.is_empty());
    }

    #[test]
    fn test_parse_dangling_quote_falls_back_to_terms() {
        let q = parse("배드민턴 \"모임 공지");
        assert!(q.exact_phrases.is_empty());
        assert_eq!(q.terms, vec!["배드민턴", "모임", "공지"]);
    }

    #[test]
    fn test_parse_dedups_repeated_parts() {
        let q = parse("테니스 테니스 !광고 !광고 \"모임\" \"모임\"");
        assert_eq!(q.terms, vec!["테니스"]);
        assert_eq!(q.exclude_terms, vec!["광고"]);
        assert_eq!(q.exact_phrases, vec!["모임"]);
    }

    #[test]
    fn test_parse_exclusion_only_query_is_empty() {
        let q = parse("!광고");
        assert!(q.is_empty());
        assert_eq!(q.exclude_terms, vec!["광고"]);
    }

    #[test]
    fn test_parse_phrase_with_inner_marker_not_detected() {
        // Markers inside quotes are phrase text, not operators
        let q = parse("\"a & b\"");
        assert_eq!(q.exact_phrases, vec!["a & b"]);
        assert!(q.detected_operators.is_empty());
    }
}
