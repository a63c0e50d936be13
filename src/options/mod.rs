//! Search options: the full client-side search state and its URL encoding
//!
//! [`SearchOptions`] is the single flat record of every search-affecting
//! parameter. It round-trips through a URL query string so searches are
//! shareable and bookmarkable: `from_url_params(to_url_params(s)) == s` for
//! every reachable state. Each key has a documented default and malformed
//! JSON in a structured key (`filters`, `sort_by`, `mmr`, `multiQueries`,
//! `scoringOptions`) falls back to that key's default instead of failing
//! initialization.
//!
//! The key names are the stable, user-visible encoding; they are kept
//! verbatim even where they mix naming styles (`searchType` vs `sort_by`).

use crate::filter::FilterSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use strum::{Display, EnumString};

/// Sort results by a named field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortByField {
    pub field: String,
}

/// Rerank results with a named strategy (e.g. cross_encoder, bm25)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBySearchType {
    pub rerank_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank_query: Option<String>,
}

/// Sort specification: either a field sort or a rerank-by-search-type.
///
/// Untagged on the wire; `Field` is tried first since it requires the
/// `field` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortBy {
    Field(SortByField),
    SearchType(SortBySearchType),
}

impl SortBy {
    pub fn is_field_sort(&self) -> bool {
        matches!(self, SortBy::Field(_))
    }

    pub fn is_rerank_sort(&self) -> bool {
        matches!(self, SortBy::SearchType(_))
    }

    /// The sort to transmit, or `None` when the sort is the empty
    /// placeholder (empty `field` / empty `rerank_type`). An empty sort
    /// object is never sent to the API.
    pub fn effective(&self) -> Option<&SortBy> {
        match self {
            SortBy::Field(sort) if sort.field.is_empty() => None,
            SortBy::SearchType(sort) if sort.rerank_type.is_empty() => None,
            other => Some(other),
        }
    }
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::Field(SortByField {
            field: String::new(),
        })
    }
}

/// Highlight splitting strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum HighlightStrategy {
    #[serde(rename = "v1")]
    #[strum(serialize = "v1")]
    V1,
    #[default]
    #[serde(rename = "exactmatch")]
    #[strum(serialize = "exactmatch")]
    ExactMatch,
}

/// Maximal Marginal Relevance re-ranking toggle with its lambda tradeoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MmrOptions {
    pub use_mmr: bool,
    pub mmr_lambda: f32,
}

impl Default for MmrOptions {
    fn default() -> Self {
        Self {
            use_mmr: false,
            mmr_lambda: 0.5,
        }
    }
}

/// One weighted query of a multi-query search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiQuery {
    pub query: String,
    pub weight: f32,
}

/// Boost fulltext scores for chunks matching a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulltextBoost {
    pub phrase: String,
    pub boost_factor: f32,
}

/// Bias the query embedding towards a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticBoost {
    pub phrase: String,
    pub distance_factor: f32,
}

/// Score boosting options, each included only when fully specified
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulltext_boost: Option<FulltextBoost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_boost: Option<SemanticBoost>,
}

/// The full client search state. See the module docs for the URL encoding;
/// defaults are the documented per-key fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub query: String,
    /// Free-form search type; an `autocomplete-` prefix selects the
    /// autocomplete route with the prefix stripped from the wire value
    pub search_type: String,
    pub score_threshold: f32,
    pub extend_results: bool,
    pub slim_chunks: bool,
    pub group_unique_search: bool,
    pub sort_by: SortBy,
    pub page_size: u64,
    pub get_total_pages: bool,
    pub highlight_results: bool,
    pub highlight_strategy: HighlightStrategy,
    pub highlight_threshold: f64,
    pub highlight_delimiters: Vec<String>,
    pub highlight_max_length: u32,
    pub highlight_max_num: u32,
    pub highlight_window: u32,
    pub highlight_pre_tag: String,
    pub highlight_post_tag: String,
    pub group_size: u32,
    pub use_quote_negated_terms: bool,
    pub remove_stop_words: bool,
    pub correct_typos: bool,
    pub one_typo_word_range_min: u32,
    pub one_typo_word_range_max: Option<u32>,
    pub two_typo_word_range_min: u32,
    pub two_typo_word_range_max: Option<u32>,
    pub disable_on_words: Vec<String>,
    pub mmr: MmrOptions,
    pub multi_queries: Vec<MultiQuery>,
    pub scoring_options: Option<ScoringOptions>,
    pub filters: Option<FilterSet>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_type: String::new(),
            score_threshold: 0.0,
            extend_results: false,
            slim_chunks: false,
            group_unique_search: false,
            sort_by: SortBy::default(),
            page_size: 10,
            get_total_pages: false,
            highlight_results: true,
            highlight_strategy: HighlightStrategy::ExactMatch,
            highlight_threshold: 0.8,
            highlight_delimiters: vec!["?".to_string(), ".".to_string(), "!".to_string()],
            highlight_max_length: 8,
            highlight_max_num: 3,
            highlight_window: 0,
            highlight_pre_tag: "<mark><b>".to_string(),
            highlight_post_tag: "</b></mark>".to_string(),
            group_size: 3,
            use_quote_negated_terms: false,
            remove_stop_words: false,
            correct_typos: false,
            one_typo_word_range_min: 5,
            one_typo_word_range_max: Some(8),
            two_typo_word_range_min: 8,
            two_typo_word_range_max: None,
            disable_on_words: Vec::new(),
            mmr: MmrOptions::default(),
            multi_queries: Vec::new(),
            scoring_options: None,
            filters: None,
        }
    }
}

impl SearchOptions {
    /// Encode every field under its stable URL key
    pub fn to_url_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("query".to_string(), self.query.clone()),
            ("searchType".to_string(), self.search_type.clone()),
            ("scoreThreshold".to_string(), self.score_threshold.to_string()),
            ("extendResults".to_string(), self.extend_results.to_string()),
            ("slimChunks".to_string(), self.slim_chunks.to_string()),
            (
                "groupUniqueSearch".to_string(),
                self.group_unique_search.to_string(),
            ),
            ("sort_by".to_string(), json_string(&self.sort_by)),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("getTotalPages".to_string(), self.get_total_pages.to_string()),
            (
                "highlightResults".to_string(),
                self.highlight_results.to_string(),
            ),
            (
                "highlightStrategy".to_string(),
                self.highlight_strategy.to_string(),
            ),
            (
                "highlightThreshold".to_string(),
                self.highlight_threshold.to_string(),
            ),
            (
                "highlightDelimiters".to_string(),
                self.highlight_delimiters.join(","),
            ),
            (
                "highlightMaxLength".to_string(),
                self.highlight_max_length.to_string(),
            ),
            (
                "highlightMaxNum".to_string(),
                self.highlight_max_num.to_string(),
            ),
            (
                "highlightWindow".to_string(),
                self.highlight_window.to_string(),
            ),
            (
                "highlightPreTag".to_string(),
                self.highlight_pre_tag.clone(),
            ),
            (
                "highlightPostTag".to_string(),
                self.highlight_post_tag.clone(),
            ),
            ("group_size".to_string(), self.group_size.to_string()),
            (
                "useQuoteNegatedTerms".to_string(),
                self.use_quote_negated_terms.to_string(),
            ),
            (
                "removeStopWords".to_string(),
                self.remove_stop_words.to_string(),
            ),
            ("correctTypos".to_string(), self.correct_typos.to_string()),
            (
                "oneTypoWordRangeMin".to_string(),
                self.one_typo_word_range_min.to_string(),
            ),
            (
                "oneTypoWordRangeMax".to_string(),
                optional_number(self.one_typo_word_range_max),
            ),
            (
                "twoTypoWordRangeMin".to_string(),
                self.two_typo_word_range_min.to_string(),
            ),
            (
                "twoTypoWordRangeMax".to_string(),
                optional_number(self.two_typo_word_range_max),
            ),
            (
                "disableOnWords".to_string(),
                self.disable_on_words.join(","),
            ),
            ("mmr".to_string(), json_string(&self.mmr)),
            ("multiQueries".to_string(), json_string(&self.multi_queries)),
        ];

        if let Some(scoring) = &self.scoring_options {
            params.push(("scoringOptions".to_string(), json_string(scoring)));
        }
        if let Some(filters) = &self.filters {
            params.push(("filters".to_string(), json_string(filters)));
        }

        params
    }

    /// Decode from URL key/value pairs, substituting the documented default
    /// for every missing or malformed key. Never fails.
    pub fn from_url_params<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let defaults = SearchOptions::default();

        SearchOptions {
            query: string_or(&map, "query", defaults.query),
            search_type: string_or(&map, "searchType", defaults.search_type),
            score_threshold: number_or(&map, "scoreThreshold", defaults.score_threshold),
            extend_results: flag_or(&map, "extendResults", defaults.extend_results),
            slim_chunks: flag_or(&map, "slimChunks", defaults.slim_chunks),
            group_unique_search: flag_or(&map, "groupUniqueSearch", defaults.group_unique_search),
            sort_by: json_or(&map, "sort_by", defaults.sort_by),
            page_size: number_or(&map, "pageSize", defaults.page_size),
            get_total_pages: flag_or(&map, "getTotalPages", defaults.get_total_pages),
            highlight_results: flag_or(&map, "highlightResults", defaults.highlight_results),
            highlight_strategy: map
                .get("highlightStrategy")
                .and_then(|raw| HighlightStrategy::from_str(raw).ok())
                .unwrap_or(defaults.highlight_strategy),
            highlight_threshold: number_or(&map, "highlightThreshold", defaults.highlight_threshold),
            highlight_delimiters: list_or(&map, "highlightDelimiters", defaults.highlight_delimiters),
            highlight_max_length: number_or(&map, "highlightMaxLength", defaults.highlight_max_length),
            highlight_max_num: number_or(&map, "highlightMaxNum", defaults.highlight_max_num),
            highlight_window: number_or(&map, "highlightWindow", defaults.highlight_window),
            highlight_pre_tag: string_or(&map, "highlightPreTag", defaults.highlight_pre_tag),
            highlight_post_tag: string_or(&map, "highlightPostTag", defaults.highlight_post_tag),
            group_size: number_or(&map, "group_size", defaults.group_size),
            use_quote_negated_terms: flag_or(
                &map,
                "useQuoteNegatedTerms",
                defaults.use_quote_negated_terms,
            ),
            remove_stop_words: flag_or(&map, "removeStopWords", defaults.remove_stop_words),
            correct_typos: flag_or(&map, "correctTypos", defaults.correct_typos),
            one_typo_word_range_min: number_or(
                &map,
                "oneTypoWordRangeMin",
                defaults.one_typo_word_range_min,
            ),
            one_typo_word_range_max: optional_number_or(
                &map,
                "oneTypoWordRangeMax",
                defaults.one_typo_word_range_max,
            ),
            two_typo_word_range_min: number_or(
                &map,
                "twoTypoWordRangeMin",
                defaults.two_typo_word_range_min,
            ),
            two_typo_word_range_max: optional_number_or(
                &map,
                "twoTypoWordRangeMax",
                defaults.two_typo_word_range_max,
            ),
            disable_on_words: list_or(&map, "disableOnWords", defaults.disable_on_words),
            mmr: json_or(&map, "mmr", defaults.mmr),
            multi_queries: json_or(&map, "multiQueries", defaults.multi_queries),
            scoring_options: map
                .get("scoringOptions")
                .map(|raw| json_value_or(raw, "scoringOptions", ScoringOptions::default()))
                .map(Some)
                .unwrap_or(defaults.scoring_options),
            filters: map
                .get("filters")
                .map(|raw| json_value_or(raw, "filters", FilterSet::default()))
                .map(Some)
                .unwrap_or(defaults.filters),
        }
    }

    /// Encode to a `a=b&c=d` query string (percent-encoded)
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_url_params() {
            serializer.append_pair(&key, &value);
        }
        serializer.finish()
    }

    /// Decode from a query string produced by [`Self::to_query_string`] (a
    /// leading `?` is tolerated)
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self::from_url_params(pairs)
    }
}

fn json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn string_or(map: &HashMap<String, String>, key: &str, default: String) -> String {
    map.get(key).cloned().unwrap_or(default)
}

fn flag_or(map: &HashMap<String, String>, key: &str, default: bool) -> bool {
    map.get(key).map(|raw| raw == "true").unwrap_or(default)
}

fn number_or<T: FromStr + Copy>(map: &HashMap<String, String>, key: &str, default: T) -> T {
    match map.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable numeric URL param, using default");
            default
        }),
        None => default,
    }
}

fn optional_number_or(
    map: &HashMap<String, String>,
    key: &str,
    default: Option<u32>,
) -> Option<u32> {
    match map.get(key) {
        Some(raw) if raw.is_empty() => None,
        Some(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "unparseable numeric URL param, using default");
                default
            }
        },
        None => default,
    }
}

fn list_or(map: &HashMap<String, String>, key: &str, default: Vec<String>) -> Vec<String> {
    match map.get(key) {
        Some(raw) if raw.is_empty() => Vec::new(),
        Some(raw) => raw.split(',').map(str::to_string).collect(),
        None => default,
    }
}

fn json_or<T: DeserializeOwned>(map: &HashMap<String, String>, key: &str, default: T) -> T {
    match map.get(key) {
        Some(raw) => json_value_or(raw, key, default),
        None => default,
    }
}

fn json_value_or<T: DeserializeOwned>(raw: &str, key: &str, default: T) -> T {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        tracing::warn!(key, %err, "malformed JSON URL param, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_table() {
        let options = SearchOptions::default();
        assert_eq!(options.score_threshold, 0.0);
        assert_eq!(options.page_size, 10);
        assert_eq!(options.highlight_strategy, HighlightStrategy::ExactMatch);
        assert_eq!(options.highlight_threshold, 0.8);
        assert_eq!(options.highlight_delimiters, vec!["?", ".", "!"]);
        assert_eq!(options.one_typo_word_range_min, 5);
        assert_eq!(options.one_typo_word_range_max, Some(8));
        assert_eq!(options.two_typo_word_range_min, 8);
        assert_eq!(options.two_typo_word_range_max, None);
        assert!(!options.mmr.use_mmr);
        assert_eq!(options.mmr.mmr_lambda, 0.5);
    }

    #[test]
    fn test_empty_params_yield_defaults() {
        let options = SearchOptions::from_url_params(Vec::<(String, String)>::new());
        assert_eq!(options, SearchOptions::default());
    }

    #[test]
    fn test_malformed_structured_params_fall_back() {
        let options = SearchOptions::from_url_params(vec![
            ("filters", "{not json"),
            ("sort_by", "[[["),
            ("mmr", "garbage"),
            ("multiQueries", "{\"wrong\": \"shape\"}"),
            ("scoringOptions", "!!"),
        ]);

        assert_eq!(options.filters, Some(FilterSet::default()));
        assert_eq!(options.sort_by, SortBy::default());
        assert_eq!(options.mmr, MmrOptions::default());
        assert!(options.multi_queries.is_empty());
        assert_eq!(options.scoring_options, Some(ScoringOptions::default()));
    }

    #[test]
    fn test_unknown_highlight_strategy_falls_back() {
        let options = SearchOptions::from_url_params(vec![("highlightStrategy", "v9")]);
        assert_eq!(options.highlight_strategy, HighlightStrategy::ExactMatch);
    }

    #[test]
    fn test_sort_by_discrimination() {
        let field: SortBy = serde_json::from_str(r#"{"field":"time_stamp"}"#).unwrap();
        assert!(field.is_field_sort());
        assert!(field.effective().is_some());

        let rerank: SortBy =
            serde_json::from_str(r#"{"rerank_type":"cross_encoder","rerank_query":"q"}"#).unwrap();
        assert!(rerank.is_rerank_sort());

        let placeholder = SortBy::default();
        assert!(placeholder.effective().is_none());
    }

    #[test]
    fn test_query_string_round_trip() {
        let mut options = SearchOptions {
            query: "rust debounce & url".to_string(),
            search_type: "hybrid".to_string(),
            score_threshold: 0.25,
            page_size: 30,
            get_total_pages: true,
            sort_by: SortBy::SearchType(SortBySearchType {
                rerank_type: "bm25".to_string(),
                rerank_query: Some("reorder me".to_string()),
            }),
            disable_on_words: vec!["nginx".to_string(), "k8s".to_string()],
            mmr: MmrOptions {
                use_mmr: true,
                mmr_lambda: 0.75,
            },
            multi_queries: vec![MultiQuery {
                query: "alpha".to_string(),
                weight: 0.5,
            }],
            scoring_options: Some(ScoringOptions {
                fulltext_boost: Some(FulltextBoost {
                    phrase: "exact phrase".to_string(),
                    boost_factor: 2.0,
                }),
                semantic_boost: None,
            }),
            ..SearchOptions::default()
        };
        options.filters = Some(FilterSet {
            must: vec![crate::filter::FieldFilter::new("tag_set").into()],
            ..FilterSet::default()
        });

        let decoded = SearchOptions::from_query_string(&options.to_query_string());
        assert_eq!(decoded, options);
    }
}
