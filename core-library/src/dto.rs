//! Response objects returned by the catalog services.
//!
//! Field names serialize in camelCase. Optional relations are skipped when
//! absent rather than rendered as `null`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDto {
    /// 1-based rank, continuous across pages
    pub index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub year: i32,
    pub total_plays: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<SongAlbumDto>,
    pub writers: Vec<String>,
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plays: Option<Vec<PlayDto>>,
}

/// Album reference embedded in a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongAlbumDto {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayDto {
    pub month: i32,
    pub year: i32,
    pub play_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDto {
    pub index: u64,
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<SongDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSongEntryDto {
    pub play_count: i64,
    pub song: SongDto,
}

/// Chart of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSongsDto {
    pub month: u32,
    pub year: i32,
    pub top_songs: Vec<TopSongEntryDto>,
}
