use crate::models::ScoreChunk;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk group (parent clustering entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub tag_set: Option<String>,
    #[serde(default)]
    pub file_id: Option<Uuid>,
}

/// One group of a group-oriented search result, with its scored hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScoreChunk {
    pub group_id: Uuid,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_tracking_id: Option<String>,
    #[serde(default)]
    pub file_id: Option<Uuid>,
    pub metadata: Vec<ScoreChunk>,
}

/// One page of a dataset's groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPage {
    pub groups: Vec<ChunkGroup>,
    #[serde(default)]
    pub total_pages: i64,
}

/// Groups a chunk is bookmarked into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkBookmarks {
    pub chunk_uuid: Uuid,
    pub slim_groups: Vec<ChunkGroup>,
}
