use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored chunk as returned by the search and scroll endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub id: Uuid,
    /// Absent when `slim_chunks` was requested
    #[serde(default)]
    pub chunk_html: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tag_set: Option<String>,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub time_stamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A scored search hit; `metadata` holds the chunk plus any collisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreChunk {
    pub metadata: Vec<ChunkMetadata>,
    pub score: f64,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
}

impl ScoreChunk {
    /// The primary chunk of this hit
    pub fn chunk(&self) -> Option<&ChunkMetadata> {
        self.metadata.first()
    }
}
