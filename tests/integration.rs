//! Integration tests for the search crate.
//!
//! These tests verify end-to-end behavior through the public API, with a
//! realistic neighborhood-board corpus.

mod common;

use common::{community_corpus, CommunityPost};
use dongne_search::{
    SearchEngine, SearchField, SearchOptions, SearchService, SortBy, StoreEvent,
};
use std::sync::Arc;

fn result_ids(results: &[dongne_search::ScoredResult<CommunityPost>]) -> Vec<u32> {
    results.iter().map(|r| r.item.id).collect()
}

// ============================================================================
// SEARCH FLOW
// ============================================================================

#[test]
fn search_returns_ranked_scored_results() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let response = engine.search(&posts, "테니스", &SearchOptions::default());

    // Title prefix (post 1) outranks mid-title substring (post 4)
    assert_eq!(result_ids(&response.results), vec![1, 4]);
    assert_eq!(response.info.total_results, 2);
    assert_eq!(response.info.query, "테니스");

    let top = &response.results[0];
    assert!(top.total_score > 0.0);
    assert_eq!(top.matched_terms, vec!["테니스"]);
    assert!(top
        .field_scores
        .iter()
        .any(|fs| fs.field == SearchField::Title && fs.score > 0.0));
}

#[test]
fn author_search_finds_posts_by_member() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let response = engine.search(&posts, "김민수", &SearchOptions::default());

    // Both posts by 김민수; equal author scores keep candidate order
    assert_eq!(result_ids(&response.results), vec![1, 4]);
}

#[test]
fn multi_term_queries_accumulate_across_fields() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let response = engine.search(&posts, "테니스 김민수", &SearchOptions::default());

    assert_eq!(result_ids(&response.results), vec![1, 4]);
    for result in &response.results {
        assert_eq!(result.matched_terms, vec!["테니스", "김민수"]);
    }
    // Accumulated title + author beats either alone
    let single = engine.search(&posts, "테니스", &SearchOptions::default());
    assert!(response.results[0].total_score > single.results[0].total_score);
}

#[test]
fn exclusion_drops_ad_posts() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let response = engine.search(&posts, "테니스 !광고", &SearchOptions::default());

    assert_eq!(result_ids(&response.results), vec![1]);
}

#[test]
fn quoted_phrase_requires_contiguity() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let hit = engine.search(&posts, "\"모임 공지\"", &SearchOptions::default());
    assert_eq!(result_ids(&hit.results), vec![1]);

    let miss = engine.search(&posts, "\"공지 모임\"", &SearchOptions::default());
    assert!(miss.results.is_empty());
}

#[test]
fn chosung_query_finds_korean_words() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let response = engine.search(&posts, "ㅌㄴㅅ", &SearchOptions::default());

    assert_eq!(result_ids(&response.results), vec![1, 4]);
}

#[test]
fn limit_caps_results_but_total_counts_all() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let options = SearchOptions {
        limit: 1,
        ..SearchOptions::default()
    };
    let response = engine.search(&posts, "테니스", &options);

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.info.total_results, 2);
}

#[test]
fn date_sort_returns_newest_matches_first() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let options = SearchOptions {
        sort_by: SortBy::Date,
        ..SearchOptions::default()
    };
    let response = engine.search(&posts, "테니스", &options);

    // Post 4 is newer than post 1
    assert_eq!(result_ids(&response.results), vec![4, 1]);
}

#[test]
fn field_restriction_skips_other_fields() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    let options = SearchOptions {
        fields: vec![SearchField::Title],
        ..SearchOptions::default()
    };
    let response = engine.search(&posts, "김민수", &options);

    assert!(response.results.is_empty());
}

#[test]
fn empty_query_returns_no_results_not_error() {
    let engine = SearchEngine::new();
    let posts = community_corpus();

    for query in ["", "   ", "\t"] {
        let response = engine.search(&posts, query, &SearchOptions::default());
        assert!(response.results.is_empty());
        assert_eq!(response.info.total_results, 0);
    }
}

// ============================================================================
// HISTORY AND AUTOCOMPLETE FLOW
// ============================================================================

#[test]
fn search_commit_then_autocomplete_flow() {
    let service = SearchService::in_memory();
    service.initialize();
    let posts = community_corpus();

    // The user searches and taps a result; the host commits both signals
    let response = service.search(&posts, "테니스", &SearchOptions::default());
    assert!(!response.results.is_empty());
    service.add_to_history("테니스").unwrap();
    service
        .add_suggestion_text(&response.results[0].item.title)
        .unwrap();

    // Next keystroke round: history first, then learned vocabulary
    let suggestions = service.autocomplete("테니스").unwrap();
    assert_eq!(suggestions[0].text, "테니스");
    assert!(suggestions.iter().any(|s| s.text == "테니스"));

    let from_title = service.autocomplete("공지").unwrap();
    assert!(from_title.iter().any(|s| s.text == "공지"));

    service.dispose();
}

#[test]
fn history_persists_across_service_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let service = SearchService::persistent(dir.path()).unwrap();
        service.initialize();
        service.add_to_history("테니스").unwrap();
        service.add_to_history("맛집").unwrap();
        service.add_suggestion_text("배드민턴 모임").unwrap();
        service.dispose();
    }

    let service = SearchService::persistent(dir.path()).unwrap();
    service.initialize();

    let history = service.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].query, "맛집");
    assert_eq!(history[1].query, "테니스");

    let suggestions = service.autocomplete("배드민턴").unwrap();
    assert_eq!(suggestions.len(), 1);
}

#[test]
fn events_notify_observers_of_history_changes() {
    use parking_lot::Mutex;

    let service = SearchService::in_memory();
    service.initialize();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    service.subscribe(move |event| {
        sink.lock().push(match event {
            StoreEvent::HistoryUpdated { history } => format!("updated({})", history.len()),
            StoreEvent::HistoryCleared => "cleared".to_string(),
        });
    });

    service.add_to_history("테니스").unwrap();
    service.remove_from_history("테니스").unwrap();
    service.clear_history().unwrap();

    assert_eq!(*events.lock(), vec!["updated(1)", "updated(0)", "cleared"]);
}

// ============================================================================
// HIGHLIGHTS
// ============================================================================

#[test]
fn highlights_mark_matched_terms_in_title() {
    let service = SearchService::in_memory();
    let posts = community_corpus();

    let response = service.search(&posts, "테니스 모임", &SearchOptions::default());
    let top = &response.results[0];

    let segments = service.generate_highlights(&top.item.title, &top.matched_terms);
    let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(rebuilt, top.item.title);

    let marked: Vec<&str> = segments
        .iter()
        .filter(|s| s.highlighted)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(marked, vec!["테니스", "모임"]);
}
