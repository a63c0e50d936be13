use crate::models::{ChunkMetadata, GroupScoreChunk, ScoreChunk};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of the standard and autocomplete chunk search endpoints.
/// Legacy field names (`score_chunks`, `total_chunk_pages`) are accepted as
/// aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Server-assigned search id, used for analytics correlation
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(alias = "score_chunks")]
    pub chunks: Vec<ScoreChunk>,
    #[serde(default, alias = "total_chunk_pages")]
    pub total_pages: i64,
    #[serde(default)]
    pub corrected_query: Option<String>,
}

/// Response of the group-oriented search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSearchResponse {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(alias = "group_chunks")]
    pub results: Vec<GroupScoreChunk>,
    #[serde(default, alias = "total_chunk_pages")]
    pub total_pages: i64,
    #[serde(default)]
    pub corrected_query: Option<String>,
}

/// Response of the non-ranked scroll endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollResponse {
    pub chunks: Vec<ChunkMetadata>,
}
