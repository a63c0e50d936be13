//! Client SDK for a chunk storage, search, and recommendation API
//!
//! The crate models the search-state pipeline of a search UI without any UI
//! framework attached:
//!
//! - **Filter model** ([`filter`]): tagged filter conditions with the
//!   backend's structural wire encoding
//! - **Search options** ([`options`]): the full search state with a stable,
//!   shareable URL query-string encoding
//! - **Store** ([`store`]): versioned state container plus a debounced
//!   projection that throttles outgoing requests
//! - **Request builder** ([`request`]): pure mapping from an options
//!   snapshot to a `(route, payload)` pair
//! - **Client** ([`client`]): reqwest-based dispatch with latest-request-wins
//!   cancellation, the error taxonomy, and `Server-Timing` parsing
//!
//! # Example
//!
//! ```no_run
//! use chunk_search_client::client::{SearchApiClient, SearchSession};
//! use chunk_search_client::config::ClientConfig;
//! use chunk_search_client::options::SearchOptions;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ClientConfig::new("https://api.example.com/api", "my-dataset");
//! let client = Arc::new(SearchApiClient::new(config)?);
//!
//! let session = SearchSession::new(client, SearchOptions::default());
//! let mut results = session.results();
//! session.set(|options| {
//!     options.query = "maximal marginal relevance".to_string();
//!     options.search_type = "hybrid".to_string();
//! });
//!
//! results.changed().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod models;
pub mod options;
pub mod request;
pub mod store;
pub mod timing;

pub use client::{SearchApiClient, SearchOutcome, SearchResults, SearchSession};
pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use options::SearchOptions;
pub use request::{SearchRequest, SearchRoute};
pub use store::SearchStore;
