//! In-process search, autocomplete, and ranking for Korean community content.
//!
//! This crate scores short records (posts, members, locations) against a
//! small structured query grammar, with Hangul-aware partial matching:
//! "ㅌㄴㅅ" finds "테니스" by leading consonants alone. Candidates come in
//! fresh on every call; the only state is a bounded search history and a
//! learned suggestion vocabulary, persisted best-effort through a pluggable
//! key-value store.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌───────────────┐     ┌──────────────┐
//! │  query.rs  │────▶│  scoring/*.rs │────▶│  engine.rs   │
//! │  (parse)   │     │  (score_item, │     │ (SearchEngine│
//! │            │     │   rank)       │     │   .search)   │
//! └────────────┘     └───────────────┘     └──────────────┘
//!        │                   │                     │
//!        ▼                   ▼                     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │     utils.rs (normalize) · hangul.rs (decompose,    │
//! │              initial_consonants)                    │
//! └─────────────────────────────────────────────────────┘
//!
//! ┌──────────────┐    ┌─────────────────────────────────┐
//! │ highlight.rs │    │ history/ (HistoryStore, events, │
//! │ (highlight)  │    │  autocomplete, persistence)     │
//! └──────────────┘    └─────────────────────────────────┘
//!
//!            service.rs (SearchService) fronts it all
//! ```
//!
//! # Scoring model
//!
//! Per field, per candidate. One tier per term (the best one), phrases
//! stack, exclusions zero the whole item:
//!
//! | Signal                        | Points | Notes                       |
//! |-------------------------------|--------|-----------------------------|
//! | Excluded term found anywhere  | veto   | whole item scores 0         |
//! | Exact phrase in field         | +100   | per phrase                  |
//! | Term equals whole field       | +50    | highest tier wins, per term |
//! | Field starts with term        | +30    |                             |
//! | Field contains term           | +20    |                             |
//! | Chosung containment           | +10    | "ㅌㄴ" inside "ㅌㄴㅅ"      |
//! | Term suffix fragment in field | +5     | longest fragment, once      |
//!
//! Field sums are weighted (title ×3, author ×2, content ×1) and added up.
//!
//! # Usage
//!
//! ```
//! use dongne_search::testing::make_post;
//! use dongne_search::{SearchEngine, SearchOptions};
//!
//! let engine = SearchEngine::new();
//! let posts = vec![
//!     make_post("테니스 모임 공지", "토요일 아침", "민수"),
//!     make_post("독서 모임", "한 달에 한 권", "지영"),
//! ];
//!
//! let response = engine.search(&posts, "테니스", &SearchOptions::default());
//! assert_eq!(response.results.len(), 1);
//! assert_eq!(response.results[0].item.title, "테니스 모임 공지");
//! ```

// Module declarations
pub mod engine;
pub mod hangul;
pub mod highlight;
pub mod history;
pub mod query;
pub mod scoring;
pub mod service;
pub mod testing;
mod types;
mod utils;

// Re-exports for public API
pub use engine::SearchEngine;
pub use hangul::{compose, decompose, initial_consonants, is_syllable, Decomposed};
pub use highlight::{highlight, Segment};
pub use history::{
    Clock, HistoryStore, JsonFileStore, KeyValueStore, MemoryStore, StorageError, StoreError,
    StoreEvent, StoreState, SubscriptionId, SystemClock, MAX_HISTORY_SIZE, MAX_SUGGESTIONS,
    MAX_VOCAB_SIZE,
};
pub use query::parse;
pub use scoring::ranking::rank;
pub use scoring::{
    score_item, ItemScore, PreparedQuery, CHOSUNG_MATCH_SCORE, EXACT_MATCH_SCORE,
    EXACT_PHRASE_BONUS, PREFIX_MATCH_SCORE, SUBSTRING_MATCH_SCORE, SUFFIX_MATCH_SCORE,
};
pub use service::SearchService;
pub use types::{
    BoolOp, FieldScore, FieldWeights, HistoryEntry, ParsedQuery, ScoredResult, SearchField,
    SearchInfo, SearchOptions, SearchResponse, Searchable, SortBy, Suggestion, SuggestionKind,
    DEFAULT_RESULT_LIMIT,
};
pub use utils::normalize;
