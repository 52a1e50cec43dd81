// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Every (field, term) pair lands in exactly one tier - the best one that
//! applies. Tiers never stack for a single term: an exact match is not also
//! counted as a prefix match. Across terms and phrases the scores add up,
//! and the field's weight multiplies the sum.
//!
//! # Constants
//!
//! | Match                  | Score | Why this value |
//! |------------------------|-------|----------------|
//! | Exact phrase           | 100.0 | A quoted phrase hit should dominate any single-term hit |
//! | Exact field match      | 50.0  | The whole field is the term |
//! | Prefix                 | 30.0  | Field starts with the term - strong intent signal |
//! | Substring              | 20.0  | Term buried somewhere in the field |
//! | Chosung                | 10.0  | Initial-consonant hit (ㅌㄴㅅ → 테니스) - real but speculative |
//! | Suffix fragment        | 5.0   | A proper suffix of the term appears - weakest evidence |
//!
//! Adjacent tiers are spaced so that sums of lower tiers within one field
//! don't casually overtake the next tier up, but there is no hard dominance
//! across fields: a substring hit in the title (20 × weight 3) outranks an
//! exact hit in the content (50 × weight 1). Weights trade off against
//! tiers. Only the exclusion veto is absolute - it zeroes the whole item.

use crate::hangul::initial_consonants;
use crate::types::{FieldScore, FieldWeights, ParsedQuery, SearchField, Searchable};
use crate::utils::normalize;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Bonus for each quoted phrase contained verbatim in a field.
pub const EXACT_PHRASE_BONUS: f64 = 100.0;

/// Tier 1: the normalized field equals the term.
pub const EXACT_MATCH_SCORE: f64 = 50.0;

/// Tier 2: the normalized field starts with the term.
pub const PREFIX_MATCH_SCORE: f64 = 30.0;

/// Tier 3: the term appears somewhere inside the field.
pub const SUBSTRING_MATCH_SCORE: f64 = 20.0;

/// Tier 4: the term's chosung string appears in the field's chosung string.
pub const CHOSUNG_MATCH_SCORE: f64 = 10.0;

/// Tier 5: some proper suffix of the term appears in the field.
pub const SUFFIX_MATCH_SCORE: f64 = 5.0;

// =============================================================================
// QUERY PREPARATION
// =============================================================================

/// One term with its precomputed chosung form.
#[derive(Debug, Clone)]
struct PreparedTerm {
    text: String,
    chosung: String,
}

/// A parsed query preprocessed for scoring.
///
/// Chosung strings are a function of the term alone, so they are computed
/// once here instead of once per candidate. Cheap to clone, safe to share
/// across threads - scoring itself is pure.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    terms: Vec<PreparedTerm>,
    exact_phrases: Vec<String>,
    exclude_terms: Vec<String>,
}

impl PreparedQuery {
    pub fn new(parsed: &ParsedQuery) -> Self {
        PreparedQuery {
            terms: parsed
                .terms
                .iter()
                .map(|t| PreparedTerm {
                    chosung: initial_consonants(t),
                    text: t.clone(),
                })
                .collect(),
            exact_phrases: parsed.exact_phrases.clone(),
            exclude_terms: parsed.exclude_terms.clone(),
        }
    }

    /// True when there is nothing to match on (exclusions don't count).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.exact_phrases.is_empty()
    }
}

// =============================================================================
// SCORING
// =============================================================================

/// A candidate's score with its per-field breakdown.
///
/// `total` is the weighted sum of `field_scores`. A vetoed candidate comes
/// back as all-zero, which the ranker then drops.
#[derive(Debug, Clone, Default)]
pub struct ItemScore {
    pub total: f64,
    pub field_scores: Vec<FieldScore>,
    pub matched_terms: Vec<String>,
}

/// Best single-tier score for one term against one normalized field.
///
/// Tiers are checked strongest-first and the first hit wins, so a term can
/// never earn both the prefix and the substring score. Returns 0.0 when no
/// tier applies.
pub fn term_score(text: &str, text_chosung: &str, term: &str, term_chosung: &str) -> f64 {
    if text == term {
        return EXACT_MATCH_SCORE;
    }
    if text.starts_with(term) {
        return PREFIX_MATCH_SCORE;
    }
    if text.contains(term) {
        return SUBSTRING_MATCH_SCORE;
    }
    if text_chosung.contains(term_chosung) {
        return CHOSUNG_MATCH_SCORE;
    }
    suffix_fragment_score(text, term)
}

/// Tier 5: does any proper suffix of the term appear in the field?
///
/// Suffixes are tried longest-first (drop one leading character at a time,
/// counting characters, not bytes) and the first hit ends the scan. "배드민턴"
/// still finds a field containing only "드민턴". Single-character terms have
/// no proper suffix and score 0.0 here.
fn suffix_fragment_score(text: &str, term: &str) -> f64 {
    let chars: Vec<char> = term.chars().collect();
    for k in 1..chars.len() {
        let suffix: String = chars[k..].iter().collect();
        if text.contains(suffix.as_str()) {
            return SUFFIX_MATCH_SCORE;
        }
    }
    0.0
}

/// Score one candidate across the configured fields.
///
/// Field text is normalized here, once per field. The exclusion veto runs
/// first: if any excluded term is a substring of any scanned field, the
/// whole item scores exactly 0.0 regardless of how well the positive terms
/// match. Otherwise each field contributes its phrase bonuses plus the best
/// tier score of every term, multiplied by the field's weight.
pub fn score_item<T: Searchable>(
    item: &T,
    query: &PreparedQuery,
    fields: &[SearchField],
    weights: &FieldWeights,
) -> ItemScore {
    let texts: Vec<(SearchField, String)> = fields
        .iter()
        .filter_map(|&field| item.field_text(field).map(|raw| (field, normalize(&raw))))
        .collect();

    for (_, text) in &texts {
        if query
            .exclude_terms
            .iter()
            .any(|excluded| text.contains(excluded.as_str()))
        {
            return ItemScore::default();
        }
    }

    let mut score = ItemScore::default();
    for (field, text) in &texts {
        let text_chosung = initial_consonants(text);
        let mut raw = 0.0;

        for phrase in &query.exact_phrases {
            if text.contains(phrase.as_str()) {
                raw += EXACT_PHRASE_BONUS;
                push_unique(&mut score.matched_terms, phrase);
            }
        }
        for term in &query.terms {
            let tier = term_score(text, &text_chosung, &term.text, &term.chosung);
            if tier > 0.0 {
                raw += tier;
                push_unique(&mut score.matched_terms, &term.text);
            }
        }

        if raw > 0.0 {
            let weighted = raw * weights.weight(*field);
            score.field_scores.push(FieldScore {
                field: *field,
                score: weighted,
            });
            score.total += weighted;
        }
    }
    score
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse;
    use crate::testing::make_post;
    use crate::types::SearchField;

    fn prepared(raw: &str) -> PreparedQuery {
        PreparedQuery::new(&parse(raw))
    }

    fn score_default(post: &crate::testing::SamplePost, raw: &str) -> ItemScore {
        score_item(
            post,
            &prepared(raw),
            &SearchField::ALL,
            &FieldWeights::default(),
        )
    }

    #[test]
    fn test_tier_ordering() {
        assert!(EXACT_PHRASE_BONUS > EXACT_MATCH_SCORE);
        assert!(EXACT_MATCH_SCORE > PREFIX_MATCH_SCORE);
        assert!(PREFIX_MATCH_SCORE > SUBSTRING_MATCH_SCORE);
        assert!(SUBSTRING_MATCH_SCORE > CHOSUNG_MATCH_SCORE);
        assert!(CHOSUNG_MATCH_SCORE > SUFFIX_MATCH_SCORE);
    }

    #[test]
    fn test_term_score_picks_best_tier_only() {
        // "테니스" against itself: exact, not exact + prefix + substring
        let chosung = initial_consonants("테니스");
        assert_eq!(term_score("테니스", &chosung, "테니스", &chosung), EXACT_MATCH_SCORE);

        let text = "테니스 모임";
        let text_cho = initial_consonants(text);
        assert_eq!(
            term_score(text, &text_cho, "테니스", &initial_consonants("테니스")),
            PREFIX_MATCH_SCORE
        );
        assert_eq!(
            term_score(text, &text_cho, "모임", &initial_consonants("모임")),
            SUBSTRING_MATCH_SCORE
        );
    }

    #[test]
    fn test_term_score_chosung_tier() {
        let text = "테니스";
        let text_cho = initial_consonants(text);
        // Jamo query maps to itself under initial_consonants
        assert_eq!(
            term_score(text, &text_cho, "ㅌㄴ", &initial_consonants("ㅌㄴ")),
            CHOSUNG_MATCH_SCORE
        );
        assert_eq!(
            term_score(text, &text_cho, "ㅌㄴㅅ", &initial_consonants("ㅌㄴㅅ")),
            CHOSUNG_MATCH_SCORE
        );
        // Non-adjacent initials miss
        assert_eq!(
            term_score(text, &text_cho, "ㅌㅅ", &initial_consonants("ㅌㅅ")),
            0.0
        );
    }

    #[test]
    fn test_term_score_suffix_tier() {
        // Field has "드민턴" but not "배드민턴"
        let text = "드민턴 라켓 팝니다";
        let text_cho = initial_consonants(text);
        assert_eq!(
            term_score(text, &text_cho, "배드민턴", &initial_consonants("배드민턴")),
            SUFFIX_MATCH_SCORE
        );
        // Single-char terms have no proper suffix
        assert_eq!(term_score("xyz", "xyz", "q", "q"), 0.0);
    }

    #[test]
    fn test_score_item_applies_weights() {
        let post = make_post("테니스", "풋살", "민수");
        let s = score_default(&post, "테니스");
        // Exact title match: 50 × title weight 3
        assert_eq!(s.total, EXACT_MATCH_SCORE * 3.0);
        assert_eq!(s.field_scores.len(), 1);
        assert_eq!(s.field_scores[0].field, SearchField::Title);
    }

    #[test]
    fn test_score_item_sums_fields() {
        let post = make_post("테니스", "테니스 모임입니다", "민수");
        let s = score_default(&post, "테니스");
        // Title exact (50×3) + content prefix (30×1)
        assert_eq!(s.total, 50.0 * 3.0 + 30.0);
        assert_eq!(s.field_scores.len(), 2);
        assert_eq!(s.matched_terms, vec!["테니스"]);
    }

    #[test]
    fn test_score_item_phrase_bonus() {
        let post = make_post("배드민턴 모임 공지", "이번 주 토요일", "영희");
        let with_phrase = score_default(&post, "\"모임 공지\"");
        let without = score_default(&post, "모임 공지");
        assert!(with_phrase.total > without.total);
        // Phrase (100) + nothing else, title weight 3
        assert_eq!(with_phrase.total, EXACT_PHRASE_BONUS * 3.0);
    }

    #[test]
    fn test_score_item_veto_zeroes_everything() {
        let post = make_post("테니스 광고", "테니스 레슨 광고입니다", "코치");
        let s = score_default(&post, "테니스 !광고");
        assert_eq!(s.total, 0.0);
        assert!(s.field_scores.is_empty());
        assert!(s.matched_terms.is_empty());
    }

    #[test]
    fn test_score_item_veto_checks_all_scanned_fields() {
        // Exclusion hits the author field even though terms match the title
        let post = make_post("테니스 모임", "즐겁게 칩시다", "광고계정");
        let s = score_default(&post, "테니스 !광고");
        assert_eq!(s.total, 0.0);
    }

    #[test]
    fn test_score_item_missing_field_skipped() {
        let post = crate::testing::make_location("서초 테니스장");
        let s = score_default(&post, "테니스");
        // Only the title exists; no panic, no phantom fields
        assert_eq!(s.field_scores.len(), 1);
        assert!(s.total > 0.0);
    }
}
