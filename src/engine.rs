// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search pipeline: parse → score → rank, over host-supplied candidates.
//!
//! The engine is deliberately stateless about content. It never indexes
//! anything; the host hands it a slice of candidates on every call and gets a
//! ranked [`SearchResponse`] back. For the candidate counts this engine is
//! built for (a feed page, a member list - thousands, not millions) scoring
//! every candidate is cheaper than maintaining an index that would have to be
//! rebuilt on every edit.
//!
//! Scoring is pure and per-candidate, so with the `parallel` feature (the
//! default) candidates are sharded across a thread pool. Result order is
//! identical either way - the parallel map preserves input order and the
//! sorts are stable.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::query::parse;
use crate::scoring::ranking::rank;
use crate::scoring::{score_item, PreparedQuery};
use crate::types::{
    FieldWeights, ScoredResult, SearchField, SearchInfo, SearchOptions, SearchResponse, Searchable,
};

/// Scores and ranks candidates against parsed queries.
///
/// Holds only the field weights; construction is free and an engine can be
/// shared across threads. Weights are fixed per engine - hosts that want
/// different weightings (say, a member search that boosts author names)
/// build a second engine.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    weights: FieldWeights,
}

impl SearchEngine {
    /// Engine with the default weights (title 3×, author 2×, content 1×).
    pub fn new() -> Self {
        SearchEngine::default()
    }

    /// Engine with custom field weights.
    pub fn with_weights(weights: FieldWeights) -> Self {
        SearchEngine { weights }
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Run a full search over `items`.
    ///
    /// An empty or whitespace-only query is a valid search that matches
    /// nothing - the response carries zero results, never an error.
    /// `info.total_results` counts every candidate that matched, before the
    /// limit cut the list down.
    ///
    /// Candidates must be `Send + Sync` because scoring shards across a
    /// thread pool under the `parallel` feature.
    pub fn search<T>(&self, items: &[T], raw_query: &str, options: &SearchOptions) -> SearchResponse<T>
    where
        T: Searchable + Clone + Send + Sync,
    {
        let started = Instant::now();
        let query = PreparedQuery::new(&parse(raw_query));

        if query.is_empty() {
            return SearchResponse {
                results: Vec::new(),
                info: SearchInfo {
                    query: raw_query.to_string(),
                    total_results: 0,
                    elapsed: started.elapsed(),
                },
            };
        }

        let scored = self.score_all(items, &query, &options.fields);
        let total_results = scored.iter().filter(|r| r.total_score > 0.0).count();
        let results = rank(scored, options.sort_by, options.limit);

        SearchResponse {
            results,
            info: SearchInfo {
                query: raw_query.to_string(),
                total_results,
                elapsed: started.elapsed(),
            },
        }
    }

    #[cfg(feature = "parallel")]
    fn score_all<T>(
        &self,
        items: &[T],
        query: &PreparedQuery,
        fields: &[SearchField],
    ) -> Vec<ScoredResult<T>>
    where
        T: Searchable + Clone + Send + Sync,
    {
        items
            .par_iter()
            .map(|item| self.score_one(item, query, fields))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all<T>(
        &self,
        items: &[T],
        query: &PreparedQuery,
        fields: &[SearchField],
    ) -> Vec<ScoredResult<T>>
    where
        T: Searchable + Clone,
    {
        items
            .iter()
            .map(|item| self.score_one(item, query, fields))
            .collect()
    }

    fn score_one<T>(&self, item: &T, query: &PreparedQuery, fields: &[SearchField]) -> ScoredResult<T>
    where
        T: Searchable + Clone,
    {
        let score = score_item(item, query, fields, &self.weights);
        ScoredResult {
            item: item.clone(),
            total_score: score.total,
            field_scores: score.field_scores,
            matched_terms: score.matched_terms,
        }
    }
}
