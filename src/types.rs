// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the search engine.
//!
//! These types define how candidate records, parsed queries, and scored
//! results fit together. The engine never sees concrete entity shapes - posts,
//! members, and locations all come in through the [`Searchable`] trait, and
//! everything the host gets back is defined here.
//!
//! | Type            | Purpose                                        |
//! |-----------------|------------------------------------------------|
//! | `Searchable`    | How the engine reads fields off a host record  |
//! | `SearchField`   | Title / Content / AuthorName                   |
//! | `FieldWeights`  | Per-field multipliers (title 3×, author 2×)    |
//! | `ParsedQuery`   | Terms, phrases, exclusions, detected operators |
//! | `ScoredResult`  | One candidate with its score breakdown         |
//! | `SearchOptions` | Fields to scan, result limit, sort order       |
//! | `HistoryEntry`  | One remembered query with use count            |
//! | `Suggestion`    | One autocomplete candidate                     |
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **ParsedQuery**: every string in it is already normalized. The scorer
//!   compares these against normalized field text; feeding it raw input
//!   produces silent mismatches, not errors.
//! - **ScoredResult**: `total_score` is the weighted sum of `field_scores`.
//!   The ranker drops results with `total_score <= 0`, which is also how the
//!   exclusion veto removes items - it zeroes them, it doesn't delete them.
//! - **HistoryEntry**: `query` is normalized and unique within the store.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

// =============================================================================
// FIELDS AND WEIGHTS
// =============================================================================

/// The searchable fields of a candidate record.
///
/// Closed set on purpose: scoring weights, option defaults, and result
/// breakdowns all match on it exhaustively, so adding a field is a compile
/// error everywhere it matters rather than a runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Title,
    Content,
    AuthorName,
}

impl SearchField {
    /// All fields, in default scan order.
    pub const ALL: [SearchField; 3] = [
        SearchField::Title,
        SearchField::Content,
        SearchField::AuthorName,
    ];

    /// Convert to camelCase string representation.
    ///
    /// Matches the serde `rename_all = "camelCase"` convention.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Content => "content",
            SearchField::AuthorName => "authorName",
        }
    }
}

/// Per-field score multipliers.
///
/// A match is worth its tier score times the weight of the field it landed
/// in. The defaults encode "titles matter most, author names matter more
/// than body text":
///
/// | Field      | Weight |
/// |------------|--------|
/// | Title      | 3.0    |
/// | AuthorName | 2.0    |
/// | Content    | 1.0    |
///
/// The gaps are deliberately small compared to the tier constants in
/// [`crate::scoring`] - weights bias *where* a match counts, tiers decide
/// *how good* the match is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWeights {
    pub title: f64,
    pub content: f64,
    pub author_name: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 3.0,
            content: 1.0,
            author_name: 2.0,
        }
    }
}

impl FieldWeights {
    /// The multiplier for one field.
    #[inline]
    pub fn weight(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Title => self.title,
            SearchField::Content => self.content,
            SearchField::AuthorName => self.author_name,
        }
    }
}

/// How the engine reads fields off a host record.
///
/// Hosts implement this for whatever they want searched - posts, member
/// profiles, location entries. Returning `None` for a field the record
/// doesn't have (a location has no author) simply skips that field during
/// scoring; it is not an error.
///
/// `Cow` lets implementations hand out borrowed field text in the common
/// case and build owned strings only when a field is synthesized on the fly.
pub trait Searchable {
    /// The raw (un-normalized) text of one field, if the record has it.
    fn field_text(&self, field: SearchField) -> Option<Cow<'_, str>>;

    /// Millisecond timestamp used by [`SortBy::Date`]. Records without a
    /// natural time sort last.
    fn sort_key(&self) -> Option<i64> {
        None
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Boolean operator characters recognized in queries.
///
/// Detection is informational: scoring is additive across terms either way,
/// but hosts can inspect what the user typed (e.g. to hint that `|` did not
/// do what they hoped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    And,
    Or,
}

/// A query taken apart: plain terms, quoted phrases, and `!`-exclusions.
///
/// Produced by [`crate::query::parse`]; every string here is already
/// normalized. All four parts can be empty at once (the query was blank or
/// all punctuation) - that is a valid parse, and searching with it returns
/// nothing rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Individual search terms, in query order.
    pub terms: Vec<String>,
    /// Double-quoted phrases, kept whole (spaces and all).
    pub exact_phrases: Vec<String>,
    /// Terms marked with a leading `!`; any hit vetoes the candidate.
    pub exclude_terms: Vec<String>,
    /// Which boolean marker characters appeared in the raw query.
    pub detected_operators: BTreeSet<BoolOp>,
}

impl ParsedQuery {
    /// True when the query carries nothing to match on.
    ///
    /// Exclusions alone don't count: a query of only `!광고` has nothing to
    /// *find*, so it is empty for search purposes.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.exact_phrases.is_empty()
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Score contribution of a single field, already weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScore {
    pub field: SearchField,
    pub score: f64,
}

/// One candidate with its score breakdown.
///
/// `total_score` is the sum of `field_scores`; `matched_terms` are the query
/// terms that matched in at least one field (useful for highlighting).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult<T> {
    pub item: T,
    pub total_score: f64,
    pub field_scores: Vec<FieldScore>,
    pub matched_terms: Vec<String>,
}

/// Sort order for ranked results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Highest score first; ties keep candidate order (stable sort).
    #[default]
    Relevance,
    /// Newest first by [`Searchable::sort_key`].
    Date,
}

/// Default number of results returned when the host doesn't say otherwise.
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// Knobs for a single search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Which fields to scan, in order. Defaults to all three.
    pub fields: Vec<SearchField>,
    /// Maximum results returned after ranking.
    pub limit: usize,
    pub sort_by: SortBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            fields: SearchField::ALL.to_vec(),
            limit: DEFAULT_RESULT_LIMIT,
            sort_by: SortBy::Relevance,
        }
    }
}

/// Metadata about a completed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    /// The raw query as the user typed it.
    pub query: String,
    /// Matches found before the limit was applied.
    pub total_results: usize,
    /// Wall-clock time spent scoring and ranking.
    pub elapsed: Duration,
}

/// What a search call hands back: ranked results plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    pub results: Vec<ScoredResult<T>>,
    pub info: SearchInfo,
}

// =============================================================================
// HISTORY AND SUGGESTIONS
// =============================================================================

/// One remembered query.
///
/// **Invariant**: `query` is normalized, and at most one entry per normalized
/// query exists in the store. Re-searching bumps `use_count` and refreshes
/// `timestamp` instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub use_count: u32,
}

/// Where an autocomplete suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// A query this user searched before.
    History,
    /// A token learned from content the user interacted with. Serialized
    /// as `suggestion`, the name hosts already display it under.
    #[serde(rename = "suggestion")]
    Vocabulary,
}

/// One autocomplete candidate.
///
/// When the same text exists in both sources, history wins - the store dedups
/// by `text` and keeps the history-flavored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}
