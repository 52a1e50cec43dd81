// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search history and the learned suggestion vocabulary.
//!
//! The store remembers two things: what this user searched (history, newest
//! first, deduped, capped) and which tokens from content they interacted
//! with are worth suggesting (vocabulary, FIFO-capped). Both live in memory
//! and snapshot to a [`KeyValueStore`] through a background writer; memory is
//! authoritative for the session, the snapshot only has to be good enough
//! for the next launch.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──▶ Loading ──▶ Ready
//! ```
//!
//! Every operation except `initialize`, `subscribe`, and `unsubscribe`
//! requires `Ready` and returns [`StoreError::NotReady`] otherwise - no
//! panics, no silent no-ops that look like data loss. `initialize` is
//! idempotent, and a failed load (missing key, corrupt blob, backend error)
//! logs a warning and produces an empty-but-Ready store: losing suggestions
//! must never take search down with it.

mod storage;

pub mod events;

pub use events::{EventBus, StoreEvent, SubscriptionId};
pub use storage::{
    Clock, JsonFileStore, KeyValueStore, MemoryStore, StorageError, SystemClock,
};

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::warn;

use crate::types::{HistoryEntry, Suggestion, SuggestionKind};
use crate::utils::normalize;
use storage::PersistenceWriter;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Most history entries kept; the oldest fall off the end.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Most vocabulary tokens kept; eviction is insertion-order FIFO, so the
/// oldest learned token is the first to go when the cap is hit.
pub const MAX_VOCAB_SIZE: usize = 1000;

/// Most suggestions one autocomplete call returns.
pub const MAX_SUGGESTIONS: usize = 10;

/// Tokens shorter than this (in characters) never enter the vocabulary -
/// single-character fragments suggest nothing useful.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Per-source caps for prefix autocomplete: up to 5 history hits and up to
/// 5 vocabulary hits before dedup.
const MAX_HISTORY_MATCHES: usize = 5;
const MAX_VOCAB_MATCHES: usize = 5;

/// The two keys this store uses in its [`KeyValueStore`].
pub const HISTORY_KEY: &str = "history";
pub const VOCABULARY_KEY: &str = "vocabulary";

// =============================================================================
// STORE
// =============================================================================

/// Store operations called at the wrong time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store hasn't finished (or started) loading; call
    /// [`HistoryStore::initialize`] first.
    #[error("history store is not ready; call initialize() first")]
    NotReady,
}

/// Where the store is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Loading,
    Ready,
}

struct StoreInner {
    state: StoreState,
    /// Newest first, at most one entry per normalized query.
    history: Vec<HistoryEntry>,
    /// Insertion order, oldest at the front (the FIFO eviction end).
    vocabulary: VecDeque<String>,
    /// Mirror of `vocabulary` for O(1) membership checks.
    vocab_set: HashSet<String>,
}

/// Bounded, observable, persistently-snapshotted search history.
///
/// All mutations take one internal lock, so operations are serialized; the
/// expensive parts (JSON encoding, backend writes) happen on the background
/// writer thread after the lock is gone. Events fire after the lock is
/// released too, so listeners can call back into the store.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    inner: Mutex<StoreInner>,
    writer: PersistenceWriter,
    events: EventBus,
}

impl HistoryStore {
    /// Create an uninitialized store over the given backend and clock.
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        HistoryStore {
            storage,
            clock,
            inner: Mutex::new(StoreInner {
                state: StoreState::Uninitialized,
                history: Vec::new(),
                vocabulary: VecDeque::new(),
                vocab_set: HashSet::new(),
            }),
            writer: PersistenceWriter::spawn(),
            events: EventBus::new(),
        }
    }

    /// In-memory store with the system clock; history won't survive restarts.
    pub fn in_memory() -> Self {
        HistoryStore::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn state(&self) -> StoreState {
        self.inner.lock().state
    }

    /// Load persisted snapshots and become `Ready`. Idempotent - calling it
    /// on a `Ready` (or currently loading) store does nothing.
    ///
    /// Load failures are not errors: a corrupt or unreadable snapshot logs a
    /// warning and initializes that part empty.
    pub fn initialize(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state != StoreState::Uninitialized {
                return;
            }
            inner.state = StoreState::Loading;
        }

        let history = self.load_history();
        let vocabulary = self.load_vocabulary();

        let mut inner = self.inner.lock();
        inner.vocab_set = vocabulary.iter().cloned().collect();
        inner.vocabulary = vocabulary;
        inner.history = history;
        inner.state = StoreState::Ready;
    }

    /// Flush queued writes and stop the background writer.
    ///
    /// The store stays usable in memory afterwards, but nothing persists
    /// anymore (each dropped write logs a warning).
    pub fn dispose(&self) {
        self.writer.shutdown();
    }

    // -------------------------------------------------------------------------
    // HISTORY
    // -------------------------------------------------------------------------

    /// Record a search. Re-searching an existing query moves it to the front
    /// with a fresh timestamp and a bumped use count; brand-new queries
    /// evict the oldest entry past [`MAX_HISTORY_SIZE`].
    ///
    /// Blank queries are dropped without error - "the user searched nothing"
    /// is not history.
    pub fn add_to_history(&self, raw_query: &str) -> Result<(), StoreError> {
        let query = normalize(raw_query);
        if query.is_empty() {
            return Ok(());
        }

        let snapshot = {
            let mut inner = self.lock_ready()?;
            let use_count = match inner.history.iter().position(|e| e.query == query) {
                Some(pos) => inner.history.remove(pos).use_count + 1,
                None => 1,
            };
            inner.history.insert(
                0,
                HistoryEntry {
                    query,
                    timestamp: self.clock.now(),
                    use_count,
                },
            );
            inner.history.truncate(MAX_HISTORY_SIZE);
            inner.history.clone()
        };

        self.persist_history(snapshot.clone());
        self.events.emit(&StoreEvent::HistoryUpdated { history: snapshot });
        Ok(())
    }

    /// Remove one remembered query. Removing a query that isn't there is a
    /// no-op: nothing persists, nothing fires.
    pub fn remove_from_history(&self, raw_query: &str) -> Result<(), StoreError> {
        let query = normalize(raw_query);
        let snapshot = {
            let mut inner = self.lock_ready()?;
            match inner.history.iter().position(|e| e.query == query) {
                Some(pos) => {
                    inner.history.remove(pos);
                    Some(inner.history.clone())
                }
                None => None,
            }
        };

        if let Some(snapshot) = snapshot {
            self.persist_history(snapshot.clone());
            self.events.emit(&StoreEvent::HistoryUpdated { history: snapshot });
        }
        Ok(())
    }

    /// Forget everything searched. Clears the persisted snapshot too.
    pub fn clear_history(&self) -> Result<(), StoreError> {
        {
            let mut inner = self.lock_ready()?;
            inner.history.clear();
        }

        let storage = Arc::clone(&self.storage);
        self.writer.submit(Box::new(move || {
            if let Err(e) = storage.remove(HISTORY_KEY) {
                warn!("failed to clear persisted search history: {e}");
            }
        }));
        self.events.emit(&StoreEvent::HistoryCleared);
        Ok(())
    }

    /// Current history, newest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.lock_ready()?.history.clone())
    }

    // -------------------------------------------------------------------------
    // VOCABULARY
    // -------------------------------------------------------------------------

    /// Learn suggestion tokens from a piece of content the user engaged
    /// with (an opened post title, for instance).
    ///
    /// The text is normalized and whitespace-tokenized; tokens shorter than
    /// [`MIN_TOKEN_CHARS`] characters or already known are skipped. Nothing
    /// here ever happens implicitly on search - hosts decide what counts as
    /// engagement.
    pub fn add_suggestion_text(&self, text: &str) -> Result<(), StoreError> {
        let normalized = normalize(text);

        let snapshot = {
            let mut inner = self.lock_ready()?;
            let mut changed = false;
            for token in normalized.split_whitespace() {
                if token.chars().count() < MIN_TOKEN_CHARS || inner.vocab_set.contains(token) {
                    continue;
                }
                inner.vocabulary.push_back(token.to_string());
                inner.vocab_set.insert(token.to_string());
                changed = true;
            }
            while inner.vocabulary.len() > MAX_VOCAB_SIZE {
                if let Some(evicted) = inner.vocabulary.pop_front() {
                    inner.vocab_set.remove(&evicted);
                }
            }
            if changed {
                Some(inner.vocabulary.iter().cloned().collect::<Vec<_>>())
            } else {
                None
            }
        };

        if let Some(snapshot) = snapshot {
            self.persist_vocabulary(snapshot);
        }
        Ok(())
    }

    /// Learned tokens in insertion order (oldest first). Mostly useful for
    /// inspecting what autocomplete has to work with.
    pub fn vocabulary(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock_ready()?.vocabulary.iter().cloned().collect())
    }

    // -------------------------------------------------------------------------
    // AUTOCOMPLETE
    // -------------------------------------------------------------------------

    /// Suggestions for a partially typed query.
    ///
    /// An empty prefix shows recent searches (up to [`MAX_SUGGESTIONS`]).
    /// Otherwise up to 5 history entries and up to 5 vocabulary tokens
    /// containing the normalized prefix are combined - history first,
    /// deduped by text with history winning, capped at [`MAX_SUGGESTIONS`].
    pub fn autocomplete(&self, prefix: &str) -> Result<Vec<Suggestion>, StoreError> {
        let needle = normalize(prefix);
        let inner = self.lock_ready()?;

        if needle.is_empty() {
            return Ok(inner
                .history
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|e| Suggestion {
                    text: e.query.clone(),
                    kind: SuggestionKind::History,
                })
                .collect());
        }

        let mut suggestions: Vec<Suggestion> = inner
            .history
            .iter()
            .filter(|e| e.query.contains(&needle))
            .take(MAX_HISTORY_MATCHES)
            .map(|e| Suggestion {
                text: e.query.clone(),
                kind: SuggestionKind::History,
            })
            .collect();

        let vocab_hits = inner
            .vocabulary
            .iter()
            .filter(|token| token.contains(&needle))
            .take(MAX_VOCAB_MATCHES);
        for token in vocab_hits {
            if !suggestions.iter().any(|s| &s.text == token) {
                suggestions.push(Suggestion {
                    text: token.clone(),
                    kind: SuggestionKind::Vocabulary,
                });
            }
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }

    // -------------------------------------------------------------------------
    // EVENTS
    // -------------------------------------------------------------------------

    /// Watch for history changes. Works before `initialize` so UI can wire
    /// itself up early.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    /// Stop watching. Returns false for ids already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // INTERNALS
    // -------------------------------------------------------------------------

    fn lock_ready(&self) -> Result<MutexGuard<'_, StoreInner>, StoreError> {
        let inner = self.inner.lock();
        if inner.state != StoreState::Ready {
            return Err(StoreError::NotReady);
        }
        Ok(inner)
    }

    fn load_history(&self) -> Vec<HistoryEntry> {
        let blob = match self.storage.get(HISTORY_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read search history; starting empty: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&blob) {
            Ok(mut history) => {
                // A foreign or hand-edited snapshot may exceed the cap.
                history.truncate(MAX_HISTORY_SIZE);
                history
            }
            Err(e) => {
                warn!("corrupt search history snapshot; starting empty: {e}");
                Vec::new()
            }
        }
    }

    fn load_vocabulary(&self) -> VecDeque<String> {
        let blob = match self.storage.get(VOCABULARY_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return VecDeque::new(),
            Err(e) => {
                warn!("failed to read suggestion vocabulary; starting empty: {e}");
                return VecDeque::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&blob) {
            Ok(tokens) => {
                let mut vocabulary: VecDeque<String> = tokens.into();
                while vocabulary.len() > MAX_VOCAB_SIZE {
                    vocabulary.pop_front();
                }
                vocabulary
            }
            Err(e) => {
                warn!("corrupt vocabulary snapshot; starting empty: {e}");
                VecDeque::new()
            }
        }
    }

    fn persist_history(&self, snapshot: Vec<HistoryEntry>) {
        let storage = Arc::clone(&self.storage);
        self.writer.submit(Box::new(move || {
            match serde_json::to_string(&snapshot) {
                Ok(blob) => {
                    if let Err(e) = storage.set(HISTORY_KEY, &blob) {
                        warn!("failed to persist search history: {e}");
                    }
                }
                Err(e) => warn!("failed to serialize search history: {e}"),
            }
        }));
    }

    fn persist_vocabulary(&self, snapshot: Vec<String>) {
        let storage = Arc::clone(&self.storage);
        self.writer.submit(Box::new(move || {
            match serde_json::to_string(&snapshot) {
                Ok(blob) => {
                    if let Err(e) = storage.set(VOCABULARY_KEY, &blob) {
                        warn!("failed to persist suggestion vocabulary: {e}");
                    }
                }
                Err(e) => warn!("failed to serialize suggestion vocabulary: {e}"),
            }
        }));
    }
}
