// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The one-stop facade the host application talks to.
//!
//! [`SearchService`] bundles the stateless [`SearchEngine`] with the stateful
//! [`HistoryStore`] behind a single object the composition root constructs,
//! initializes once, and disposes on shutdown. Nothing in here is a hidden
//! global: storage and clock come in through the constructor, which is also
//! what makes the whole thing testable with a [`MemoryStore`] and a frozen
//! clock.
//!
//! Searching and remembering are deliberately decoupled. `search()` never
//! writes history - the host calls [`SearchService::add_to_history`] when a
//! query was actually *committed* (submitted, not just typed), and
//! [`SearchService::add_suggestion_text`] when the user engaged with content
//! worth learning tokens from.
//!
//! ```
//! use dongne_search::testing::make_post;
//! use dongne_search::{SearchOptions, SearchService};
//!
//! let service = SearchService::in_memory();
//! service.initialize();
//!
//! let posts = vec![
//!     make_post("테니스 모임 공지", "이번 주 토요일", "민수"),
//!     make_post("맛집 추천", "김치찌개", "영희"),
//! ];
//! let response = service.search(&posts, "테니스", &SearchOptions::default());
//! assert_eq!(response.results.len(), 1);
//!
//! service.add_to_history("테니스").unwrap();
//! let suggestions = service.autocomplete("테").unwrap();
//! assert_eq!(suggestions[0].text, "테니스");
//!
//! service.dispose();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::SearchEngine;
use crate::highlight::{self, Segment};
use crate::history::{
    Clock, HistoryStore, JsonFileStore, KeyValueStore, MemoryStore, StorageError, StoreError,
    StoreEvent, StoreState, SubscriptionId, SystemClock,
};
use crate::types::{
    FieldWeights, HistoryEntry, SearchOptions, SearchResponse, Searchable, Suggestion,
};

/// Search, autocomplete, history, and highlighting under one roof.
///
/// One instance per application lifetime. The service itself is `Send + Sync`;
/// the store serializes its own mutations and the engine is stateless, so
/// sharing an `Arc<SearchService>` across threads needs no outer lock.
pub struct SearchService {
    engine: SearchEngine,
    store: HistoryStore,
}

impl SearchService {
    /// Build a service over the given storage backend and clock.
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        SearchService {
            engine: SearchEngine::new(),
            store: HistoryStore::new(storage, clock),
        }
    }

    /// Same as [`SearchService::new`] but with custom field weights.
    pub fn with_weights(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        weights: FieldWeights,
    ) -> Self {
        SearchService {
            engine: SearchEngine::with_weights(weights),
            store: HistoryStore::new(storage, clock),
        }
    }

    /// Everything in memory; history evaporates with the process. The right
    /// choice for tests and for hosts that persist elsewhere.
    pub fn in_memory() -> Self {
        SearchService::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    /// History and vocabulary persisted as JSON files under `dir`.
    pub fn persistent(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = JsonFileStore::new(dir)?;
        Ok(SearchService::new(Arc::new(store), Arc::new(SystemClock)))
    }

    // -------------------------------------------------------------------------
    // LIFECYCLE
    // -------------------------------------------------------------------------

    /// Load persisted history and vocabulary. Idempotent; must be called
    /// before any history or autocomplete operation.
    pub fn initialize(&self) {
        self.store.initialize();
    }

    /// Flush pending persistence writes and stop the background writer.
    pub fn dispose(&self) {
        self.store.dispose();
    }

    pub fn state(&self) -> StoreState {
        self.store.state()
    }

    // -------------------------------------------------------------------------
    // SEARCH
    // -------------------------------------------------------------------------

    /// Score, rank, and truncate `items` against `raw_query`.
    ///
    /// Pure with respect to the service: candidates come in fresh each call
    /// and nothing is recorded. Works before `initialize()` too, since only
    /// the store has a lifecycle.
    pub fn search<T>(&self, items: &[T], raw_query: &str, options: &SearchOptions) -> SearchResponse<T>
    where
        T: Searchable + Clone + Send + Sync,
    {
        self.engine.search(items, raw_query, options)
    }

    /// Split `text` into plain and highlighted segments for the given terms.
    ///
    /// Feed it [`crate::types::ScoredResult::matched_terms`] to mark up a
    /// result the way it matched.
    pub fn generate_highlights<S: AsRef<str>>(&self, text: &str, terms: &[S]) -> Vec<Segment> {
        highlight::highlight(text, terms)
    }

    // -------------------------------------------------------------------------
    // HISTORY AND SUGGESTIONS
    // -------------------------------------------------------------------------

    /// Record a committed search query.
    pub fn add_to_history(&self, raw_query: &str) -> Result<(), StoreError> {
        self.store.add_to_history(raw_query)
    }

    /// Forget one remembered query.
    pub fn remove_from_history(&self, raw_query: &str) -> Result<(), StoreError> {
        self.store.remove_from_history(raw_query)
    }

    /// Forget everything searched.
    pub fn clear_history(&self) -> Result<(), StoreError> {
        self.store.clear_history()
    }

    /// Current history, newest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.store.history()
    }

    /// Learn suggestion tokens from content the user engaged with.
    pub fn add_suggestion_text(&self, text: &str) -> Result<(), StoreError> {
        self.store.add_suggestion_text(text)
    }

    /// Suggestions for a partially typed query.
    pub fn autocomplete(&self, prefix: &str) -> Result<Vec<Suggestion>, StoreError> {
        self.store.autocomplete(prefix)
    }

    // -------------------------------------------------------------------------
    // EVENTS
    // -------------------------------------------------------------------------

    /// Watch for history changes; listeners fire in registration order.
    pub fn subscribe(
        &self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Stop watching. Returns false for ids already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
