//! Pure mapping from a resolved search options snapshot to an outgoing
//! `(route, payload)` pair
//!
//! Route selection (first match wins):
//!
//! 1. empty query -> scroll (non-ranked listing), field sorts pass through;
//! 2. group-unique search -> group-oriented search;
//! 3. a search type containing `autocomplete` -> autocomplete, with the
//!    `autocomplete-` prefix stripped from the transmitted `search_type`;
//! 4. otherwise -> standard chunk search.
//!
//! Payload construction never sends empty sort objects, `{"use_mmr": false}`
//! placeholders, or half-specified score boosts; typo tolerance, highlight
//! and group-size sub-objects are always present with explicit defaults.

use crate::filter::FilterSet;
use crate::options::{
    FulltextBoost, HighlightStrategy, MmrOptions, ScoringOptions, SearchOptions, SemanticBoost,
    SortBy, SortByField,
};
use serde::Serialize;
use uuid::Uuid;

/// The endpoint a search request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRoute {
    /// Non-ranked listing used when no query text is present
    Scroll,
    /// Standard flat chunk search
    Search,
    /// Prefix/typeahead search
    Autocomplete,
    /// Search returning results clustered by their parent group
    GroupOriented,
}

impl SearchRoute {
    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            SearchRoute::Scroll => "chunks/scroll",
            SearchRoute::Search => "chunk/search",
            SearchRoute::Autocomplete => "chunk/autocomplete",
            SearchRoute::GroupOriented => "chunk_group/group_oriented_search",
        }
    }
}

/// Query payload: a plain string, or weighted `[text, weight]` tuples when
/// multi-queries are active
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryPayload {
    Single(String),
    Multi(Vec<(String, f32)>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypoRange {
    pub min: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypoOptions {
    pub correct_typos: bool,
    pub one_typo_word_range: TypoRange,
    pub two_typo_word_range: TypoRange,
    pub disable_on_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightOptions {
    pub highlight_results: bool,
    pub highlight_strategy: HighlightStrategy,
    pub highlight_threshold: f64,
    pub highlight_delimiters: Vec<String>,
    pub highlight_max_length: u32,
    pub highlight_max_num: u32,
    pub highlight_window: u32,
    pub pre_tag: String,
    pub post_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mmr: Option<MmrOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulltext_boost: Option<FulltextBoost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_boost: Option<SemanticBoost>,
}

/// Body of the search, autocomplete and group-oriented search endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSearchPayload {
    pub query: QueryPayload,
    pub search_type: String,
    pub page: u64,
    pub page_size: u64,
    pub get_total_pages: bool,
    pub score_threshold: f32,
    pub slim_chunks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
    pub sort_options: SortOptions,
    pub typo_options: TypoOptions,
    pub highlight_options: HighlightOptions,
    pub group_size: u32,
    pub use_quote_negated_terms: bool,
    pub remove_stop_words: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_options: Option<ScoringPayload>,
    /// Autocomplete only: also rank results that merely extend the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend_results: Option<bool>,
}

/// Body of the scroll endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollPayload {
    pub page_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortByField>,
    /// Cursor: continue after this chunk id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_chunk_id: Option<Uuid>,
}

/// Request body, shaped by the selected route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Scroll(ScrollPayload),
    Search(Box<ChunkSearchPayload>),
}

/// A fully built outgoing search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub route: SearchRoute,
    pub body: RequestBody,
}

impl SearchRequest {
    /// Build the request for a resolved (debounced) options snapshot and a
    /// 1-indexed page
    pub fn from_options(options: &SearchOptions, page: u64) -> Self {
        if options.query.is_empty() {
            return Self::scroll(options, None);
        }

        let (route, search_type, extend_results) = if options.group_unique_search {
            (
                SearchRoute::GroupOriented,
                options.search_type.clone(),
                None,
            )
        } else if options.search_type.contains("autocomplete") {
            (
                SearchRoute::Autocomplete,
                options.search_type.replace("autocomplete-", ""),
                Some(options.extend_results),
            )
        } else {
            (SearchRoute::Search, options.search_type.clone(), None)
        };

        let payload = ChunkSearchPayload {
            query: query_payload(options),
            search_type,
            page,
            page_size: options.page_size,
            get_total_pages: options.get_total_pages,
            score_threshold: options.score_threshold,
            slim_chunks: options.slim_chunks,
            filters: options.filters.clone(),
            sort_options: SortOptions {
                sort_by: options.sort_by.effective().cloned(),
                // Never transmitted as {"use_mmr": false}; omitted entirely
                // unless diversification is on.
                mmr: options.mmr.use_mmr.then_some(options.mmr),
            },
            typo_options: TypoOptions {
                correct_typos: options.correct_typos,
                one_typo_word_range: TypoRange {
                    min: options.one_typo_word_range_min,
                    max: options.one_typo_word_range_max,
                },
                two_typo_word_range: TypoRange {
                    min: options.two_typo_word_range_min,
                    max: options.two_typo_word_range_max,
                },
                disable_on_words: options.disable_on_words.clone(),
            },
            highlight_options: HighlightOptions {
                highlight_results: options.highlight_results,
                highlight_strategy: options.highlight_strategy,
                highlight_threshold: options.highlight_threshold,
                highlight_delimiters: options.highlight_delimiters.clone(),
                highlight_max_length: options.highlight_max_length,
                highlight_max_num: options.highlight_max_num,
                highlight_window: options.highlight_window,
                pre_tag: options.highlight_pre_tag.clone(),
                post_tag: options.highlight_post_tag.clone(),
            },
            group_size: options.group_size,
            use_quote_negated_terms: options.use_quote_negated_terms,
            remove_stop_words: options.remove_stop_words,
            scoring_options: scoring_payload(options.scoring_options.as_ref()),
            extend_results,
        };

        SearchRequest {
            route,
            body: RequestBody::Search(Box::new(payload)),
        }
    }

    /// Build a scroll request continuing after the given chunk id. Scroll
    /// pagination is cursor-based, unlike the page-numbered search routes;
    /// [`Self::from_options`] always starts from the top.
    pub fn scroll_after(options: &SearchOptions, offset_chunk_id: Option<Uuid>) -> Self {
        Self::scroll(options, offset_chunk_id)
    }

    fn scroll(options: &SearchOptions, offset_chunk_id: Option<Uuid>) -> Self {
        let sort_by = match options.sort_by.effective() {
            Some(SortBy::Field(sort)) => Some(sort.clone()),
            // Rerank sorts are meaningless without a query to rerank by.
            _ => None,
        };

        SearchRequest {
            route: SearchRoute::Scroll,
            body: RequestBody::Scroll(ScrollPayload {
                page_size: options.page_size,
                filters: options.filters.clone(),
                sort_by,
                offset_chunk_id,
            }),
        }
    }
}

fn query_payload(options: &SearchOptions) -> QueryPayload {
    if options.multi_queries.is_empty() {
        QueryPayload::Single(options.query.clone())
    } else {
        QueryPayload::Multi(
            options
                .multi_queries
                .iter()
                .filter(|multi| !multi.query.is_empty())
                .map(|multi| (multi.query.clone(), multi.weight))
                .collect(),
        )
    }
}

/// A boost is transmitted only when both its phrase and factor are set;
/// the fulltext and semantic halves are filtered independently.
fn scoring_payload(scoring: Option<&ScoringOptions>) -> Option<ScoringPayload> {
    let scoring = scoring?;

    let fulltext_boost = scoring
        .fulltext_boost
        .as_ref()
        .filter(|boost| !boost.phrase.is_empty() && boost.boost_factor != 0.0)
        .cloned();
    let semantic_boost = scoring
        .semantic_boost
        .as_ref()
        .filter(|boost| !boost.phrase.is_empty() && boost.distance_factor != 0.0)
        .cloned();

    if fulltext_boost.is_none() && semantic_boost.is_none() {
        return None;
    }

    Some(ScoringPayload {
        fulltext_boost,
        semantic_boost,
    })
}
