// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlight segmentation: where in the original text the matches are.
//!
//! The contract is exact reconstruction. `highlight` splits the *original*
//! string (original casing, original spacing) into alternating plain and
//! highlighted segments, and concatenating the segments gives back the input
//! byte for byte. UIs depend on that to render match emphasis without ever
//! mangling user content.
//!
//! Matching is case-insensitive via a per-character fold: each character maps
//! to at most one folded character, so folded offsets line up 1:1 with the
//! original characters. Full Unicode case folding can change string length
//! ("ß" → "ss") and would break the round-trip guarantee; the per-char fold
//! trades those exotic matches away for exactness. Hangul has no case, so
//! Korean text is unaffected either way.

use serde::{Deserialize, Serialize};

/// One run of text, either matched or not.
///
/// **Invariant**: concatenating `text` over a highlight result reproduces the
/// input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Split `text` into alternating segments around case-insensitive
/// occurrences of `terms`.
///
/// Every non-empty term contributes all of its occurrences; overlapping and
/// back-to-back matches merge into one highlighted segment. No terms, or no
/// hits, yields the whole input as a single plain segment. Empty input
/// yields no segments.
pub fn highlight<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let original: Vec<char> = text.chars().collect();
    let folded: Vec<char> = original.iter().map(|&c| fold_char(c)).collect();

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for term in terms {
        let term_folded: Vec<char> = term.as_ref().chars().map(fold_char).collect();
        if term_folded.is_empty() || term_folded.len() > folded.len() {
            continue;
        }
        for start in 0..=(folded.len() - term_folded.len()) {
            if folded[start..start + term_folded.len()] == term_folded[..] {
                spans.push((start, start + term_folded.len()));
            }
        }
    }

    if spans.is_empty() {
        return vec![Segment {
            text: text.to_string(),
            highlighted: false,
        }];
    }

    spans.sort_unstable();
    let merged = merge_spans(&spans);

    let mut segments = Vec::with_capacity(merged.len() * 2 + 1);
    let mut cursor = 0usize;
    for (start, end) in merged {
        if cursor < start {
            segments.push(Segment {
                text: original[cursor..start].iter().collect(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: original[start..end].iter().collect(),
            highlighted: true,
        });
        cursor = end;
    }
    if cursor < original.len() {
        segments.push(Segment {
            text: original[cursor..].iter().collect(),
            highlighted: false,
        });
    }
    segments
}

/// Fold one character for case-insensitive comparison.
///
/// Takes the first scalar of the lowercase mapping so folding never changes
/// the character count.
#[inline]
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Merge sorted spans that overlap or touch.
fn merge_spans(sorted: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(sorted.len());
    for &(start, end) in sorted {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => {
                *last_end = (*last_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}
