//! HTTP client for the chunk search API
//!
//! Thin reqwest wrapper that attaches the API-version and dataset-scoping
//! headers, maps non-2xx responses into the error taxonomy (server message
//! surfaced verbatim when the body is parseable JSON, 401 split out for
//! login handling), and parses the `Server-Timing` breakdown. No automatic
//! retry and no client-side timeout: a hung request only ever blocks its
//! own view's loading state.

mod dispatcher;
mod session;

pub use dispatcher::{DispatchResult, SearchDispatcher};
pub use session::SearchSession;

use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::models::{
    ChunkBookmarks, GroupPage, GroupSearchResponse, ScrollResponse, SearchResponse,
};
use crate::request::{SearchRequest, SearchRoute};
use crate::timing::{parse_server_timing, ServerTiming};
use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

/// Parsed response body, shaped by the route that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Chunks(SearchResponse),
    Grouped(GroupSearchResponse),
    Scroll(ScrollResponse),
}

impl SearchResults {
    /// Total page count for the applied filters, when the server computed it
    pub fn total_pages(&self) -> i64 {
        match self {
            SearchResults::Chunks(response) => response.total_pages,
            SearchResults::Grouped(response) => response.total_pages,
            SearchResults::Scroll(_) => 0,
        }
    }

    /// Number of top-level results in this page
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Chunks(response) => response.chunks.len(),
            SearchResults::Grouped(response) => response.results.len(),
            SearchResults::Scroll(response) => response.chunks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A successful search response plus its server-side timing breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub results: SearchResults,
    pub timings: Vec<ServerTiming>,
    /// Server-assigned search id when the route reports one
    pub search_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the chunk search API
#[derive(Clone)]
pub struct SearchApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SearchApiClient {
    /// Create a client; the dataset id must be configured up front since
    /// every endpoint is dataset-scoped
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.dataset_id.is_empty() {
            return Err(AppError::Configuration(
                "dataset_id must be set before issuing requests".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.endpoint(path))
            .header("X-API-version", &self.config.api_version)
            .header("TR-Dataset", &self.config.dataset_id)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint(path))
            .header("X-API-version", &self.config.api_version)
            .header("TR-Dataset", &self.config.dataset_id)
    }

    /// Execute a built search request against its route
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let route = request.route;
        tracing::debug!(path = route.path(), "dispatching search request");

        let response = self.post(route.path()).json(&request.body).send().await?;

        let timings = response
            .headers()
            .get("Server-Timing")
            .and_then(|value| value.to_str().ok())
            .map(parse_server_timing)
            .unwrap_or_default();

        let response = Self::check_status(response).await?;

        let (results, search_id) = match route {
            SearchRoute::Scroll => {
                let body: ScrollResponse = Self::decode(response).await?;
                (SearchResults::Scroll(body), None)
            }
            SearchRoute::GroupOriented => {
                let body: GroupSearchResponse = Self::decode(response).await?;
                let id = body.id;
                (SearchResults::Grouped(body), id)
            }
            SearchRoute::Search | SearchRoute::Autocomplete => {
                let body: SearchResponse = Self::decode(response).await?;
                let id = body.id;
                (SearchResults::Chunks(body), id)
            }
        };

        Ok(SearchOutcome {
            results,
            timings,
            search_id,
        })
    }

    /// Fetch one page of the dataset's groups (independent of, and unordered
    /// relative to, searches)
    pub async fn list_groups(&self, page: u64) -> Result<GroupPage> {
        let path = format!("dataset/groups/{}/{}", self.config.dataset_id, page);
        let response = self.get(&path).send().await?;
        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    /// Fetch the groups each of the given chunks is bookmarked into
    pub async fn chunk_bookmarks(&self, chunk_ids: &[Uuid]) -> Result<Vec<ChunkBookmarks>> {
        let response = self
            .post("chunk_group/chunks")
            .json(&serde_json::json!({ "chunk_ids": chunk_ids }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    /// Map non-2xx responses into the error taxonomy
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "An unknown error occurred while searching".to_string());

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("request rejected with 401");
            return Err(AppError::Authentication(message));
        }

        tracing::warn!(status = status.as_u16(), %message, "search request failed");
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Serialization(e.to_string()))
    }
}
