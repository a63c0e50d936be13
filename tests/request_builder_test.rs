//! Route selection and payload construction tests

use chunk_search_client::options::{
    FulltextBoost, MmrOptions, MultiQuery, ScoringOptions, SearchOptions, SemanticBoost, SortBy,
    SortByField, SortBySearchType,
};
use chunk_search_client::request::{RequestBody, SearchRequest, SearchRoute};

fn body_json(request: &SearchRequest) -> serde_json::Value {
    serde_json::to_value(&request.body).unwrap()
}

#[test]
fn test_empty_query_always_scrolls() {
    // Every other setting is as search-like as possible; the empty query
    // still wins.
    let options = SearchOptions {
        query: String::new(),
        search_type: "autocomplete-semantic".to_string(),
        group_unique_search: true,
        multi_queries: vec![MultiQuery {
            query: "present".to_string(),
            weight: 1.0,
        }],
        ..SearchOptions::default()
    };

    let request = SearchRequest::from_options(&options, 1);
    assert_eq!(request.route, SearchRoute::Scroll);
    assert_eq!(request.route.path(), "chunks/scroll");
}

#[test]
fn test_scroll_passes_field_sort_through() {
    let options = SearchOptions {
        sort_by: SortBy::Field(SortByField {
            field: "time_stamp".to_string(),
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert_eq!(body["sort_by"]["field"], "time_stamp");

    // Rerank sorts and empty placeholders are not forwarded to scroll.
    let options = SearchOptions {
        sort_by: SortBy::SearchType(SortBySearchType {
            rerank_type: "bm25".to_string(),
            rerank_query: None,
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body.get("sort_by").is_none());
}

#[test]
fn test_group_unique_beats_autocomplete() {
    let options = SearchOptions {
        query: "q".to_string(),
        search_type: "autocomplete-semantic".to_string(),
        group_unique_search: true,
        ..SearchOptions::default()
    };
    let request = SearchRequest::from_options(&options, 1);
    assert_eq!(request.route, SearchRoute::GroupOriented);
    assert_eq!(request.route.path(), "chunk_group/group_oriented_search");

    // Group-oriented search keeps the search type untouched.
    let body = body_json(&request);
    assert_eq!(body["search_type"], "autocomplete-semantic");
}

#[test]
fn test_autocomplete_strips_prefix_and_forwards_extend_results() {
    let options = SearchOptions {
        query: "typeahe".to_string(),
        search_type: "autocomplete-semantic".to_string(),
        extend_results: true,
        ..SearchOptions::default()
    };
    let request = SearchRequest::from_options(&options, 1);
    assert_eq!(request.route, SearchRoute::Autocomplete);

    let body = body_json(&request);
    assert_eq!(body["search_type"], "semantic");
    assert_eq!(body["extend_results"], true);
}

#[test]
fn test_standard_search_omits_extend_results() {
    let options = SearchOptions {
        query: "plain".to_string(),
        search_type: "hybrid".to_string(),
        extend_results: true,
        ..SearchOptions::default()
    };
    let request = SearchRequest::from_options(&options, 2);
    assert_eq!(request.route, SearchRoute::Search);

    let body = body_json(&request);
    assert_eq!(body["page"], 2);
    assert!(body.get("extend_results").is_none());
}

#[test]
fn test_empty_sort_is_never_sent() {
    let options = SearchOptions {
        query: "q".to_string(),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body["sort_options"].get("sort_by").is_none());

    let options = SearchOptions {
        query: "q".to_string(),
        sort_by: SortBy::SearchType(SortBySearchType {
            rerank_type: String::new(),
            rerank_query: Some("ignored".to_string()),
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body["sort_options"].get("sort_by").is_none());

    let options = SearchOptions {
        query: "q".to_string(),
        sort_by: SortBy::SearchType(SortBySearchType {
            rerank_type: "cross_encoder".to_string(),
            rerank_query: None,
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert_eq!(body["sort_options"]["sort_by"]["rerank_type"], "cross_encoder");
}

#[test]
fn test_mmr_omitted_unless_enabled() {
    let options = SearchOptions {
        query: "q".to_string(),
        mmr: MmrOptions {
            use_mmr: false,
            mmr_lambda: 0.9,
        },
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body["sort_options"].get("mmr").is_none());

    let options = SearchOptions {
        query: "q".to_string(),
        mmr: MmrOptions {
            use_mmr: true,
            mmr_lambda: 0.9,
        },
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert_eq!(body["sort_options"]["mmr"]["use_mmr"], true);
}

#[test]
fn test_multi_queries_override_plain_query_and_filter_empties() {
    let options = SearchOptions {
        query: "overridden".to_string(),
        multi_queries: vec![
            MultiQuery {
                query: "a".to_string(),
                weight: 0.5,
            },
            MultiQuery {
                query: String::new(),
                weight: 1.0,
            },
        ],
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert_eq!(body["query"], serde_json::json!([["a", 0.5]]));
}

#[test]
fn test_half_specified_boosts_are_dropped_independently() {
    let options = SearchOptions {
        query: "q".to_string(),
        scoring_options: Some(ScoringOptions {
            fulltext_boost: Some(FulltextBoost {
                phrase: String::new(),
                boost_factor: 2.0,
            }),
            semantic_boost: Some(SemanticBoost {
                phrase: "kept".to_string(),
                distance_factor: 0.4,
            }),
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    let scoring = &body["scoring_options"];
    assert!(scoring.get("fulltext_boost").is_none());
    assert_eq!(scoring["semantic_boost"]["phrase"], "kept");

    // Both halves unusable: the whole object is omitted.
    let options = SearchOptions {
        query: "q".to_string(),
        scoring_options: Some(ScoringOptions {
            fulltext_boost: Some(FulltextBoost {
                phrase: "p".to_string(),
                boost_factor: 0.0,
            }),
            semantic_boost: None,
        }),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body.get("scoring_options").is_none());
}

#[test]
fn test_typo_and_highlight_objects_carry_defaults() {
    let options = SearchOptions {
        query: "q".to_string(),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));

    let typo = &body["typo_options"];
    assert_eq!(typo["correct_typos"], false);
    assert_eq!(typo["one_typo_word_range"]["min"], 5);
    assert_eq!(typo["one_typo_word_range"]["max"], 8);
    assert_eq!(typo["two_typo_word_range"]["min"], 8);
    // The two ranges are independent; an unset max is simply omitted.
    assert!(typo["two_typo_word_range"].get("max").is_none());
    assert_eq!(typo["disable_on_words"], serde_json::json!([]));

    let highlight = &body["highlight_options"];
    assert_eq!(highlight["highlight_results"], true);
    assert_eq!(highlight["highlight_strategy"], "exactmatch");
    assert_eq!(highlight["highlight_threshold"], 0.8);
    assert_eq!(highlight["highlight_delimiters"], serde_json::json!(["?", ".", "!"]));
    assert_eq!(highlight["pre_tag"], "<mark><b>");
    assert_eq!(highlight["post_tag"], "</b></mark>");

    assert_eq!(body["group_size"], 3);
}

#[test]
fn test_independent_typo_ranges() {
    let options = SearchOptions {
        query: "q".to_string(),
        one_typo_word_range_max: Some(6),
        two_typo_word_range_max: Some(14),
        ..SearchOptions::default()
    };
    let body = body_json(&SearchRequest::from_options(&options, 1));
    let typo = &body["typo_options"];
    assert_eq!(typo["one_typo_word_range"]["max"], 6);
    assert_eq!(typo["two_typo_word_range"]["max"], 14);
}

#[test]
fn test_scroll_cursor_is_forwarded() {
    let options = SearchOptions::default();
    let cursor = uuid::Uuid::parse_str("4b4f768e-9d6a-44e8-a7b3-9e4d9a43e2a1").unwrap();

    let request = SearchRequest::scroll_after(&options, Some(cursor));
    assert_eq!(request.route, SearchRoute::Scroll);
    let body = body_json(&request);
    assert_eq!(body["offset_chunk_id"], cursor.to_string());

    // Building from options alone always starts from the top.
    let body = body_json(&SearchRequest::from_options(&options, 1));
    assert!(body.get("offset_chunk_id").is_none());
}

#[test]
fn test_request_body_matches_enum_shape() {
    let options = SearchOptions::default();
    let request = SearchRequest::from_options(&options, 1);
    assert!(matches!(request.body, RequestBody::Scroll(_)));

    let options = SearchOptions {
        query: "q".to_string(),
        ..SearchOptions::default()
    };
    let request = SearchRequest::from_options(&options, 1);
    assert!(matches!(request.body, RequestBody::Search(_)));
}
