// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how scored candidates become the result list.
//!
//! Ranking is three steps, always in this order:
//! 1. Drop everything at or below zero (non-matches and vetoed items).
//! 2. Sort - by score or by record timestamp, both descending.
//! 3. Truncate to the requested limit.
//!
//! Both sorts are stable, and the comparators return `Equal` on ties, so
//! candidates that tie keep the order the host supplied them in. Hosts rely
//! on that for deterministic pagination.

use std::cmp::Ordering;

use crate::types::{ScoredResult, Searchable, SortBy};

/// Compare two results by relevance (higher score first).
///
/// Ties are `Equal` on purpose - combined with a stable sort this preserves
/// candidate order instead of inventing one.
pub fn compare_by_relevance<T>(a: &ScoredResult<T>, b: &ScoredResult<T>) -> Ordering {
    b.total_score
        .partial_cmp(&a.total_score)
        .unwrap_or(Ordering::Equal)
}

/// Compare two results by record timestamp (newest first).
///
/// Records without a [`Searchable::sort_key`] sort after every record that
/// has one; among themselves they keep candidate order.
pub fn compare_by_date<T: Searchable>(a: &ScoredResult<T>, b: &ScoredResult<T>) -> Ordering {
    // Option<i64> ordering puts None first, so comparing b to a gives
    // "newest first, dateless last".
    b.item.sort_key().cmp(&a.item.sort_key())
}

/// Filter, sort, and truncate scored candidates.
///
/// Zero and negative totals never survive: a score of exactly 0.0 is how the
/// exclusion veto removes an item, and "matched nothing" looks the same.
pub fn rank<T: Searchable>(
    mut results: Vec<ScoredResult<T>>,
    sort_by: SortBy,
    limit: usize,
) -> Vec<ScoredResult<T>> {
    results.retain(|r| r.total_score > 0.0);
    match sort_by {
        SortBy::Relevance => results.sort_by(compare_by_relevance),
        SortBy::Date => results.sort_by(compare_by_date),
    }
    results.truncate(limit);
    results
}
