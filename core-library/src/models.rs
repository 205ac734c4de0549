//! Row models for the catalog database
//!
//! These mirror what the repositories select, not the full table layout:
//! a `SongRow` already carries its album title from the join, and the
//! aggregates bundle a row with the relations loaded for it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A song as selected by the repositories, joined with its album title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SongRow {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub total_plays: i64,
    pub album_id: Option<i64>,
    pub album_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AlbumRow {
    pub id: i64,
    pub title: String,
}

/// Play count of one song for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlayRow {
    pub song_id: i64,
    pub month: i32,
    pub year: i32,
    pub play_count: i64,
}

/// A person credited on a song, either as writer or as artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CreditRow {
    pub song_id: i64,
    pub name: String,
}

/// One entry of a monthly chart: the play count plus the song it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TopPlayRow {
    pub play_count: i64,
    #[sqlx(flatten)]
    pub song: SongRow,
}

/// A song together with the relations fetched for it.
///
/// `plays` is `None` when play history was not requested, which is distinct
/// from `Some(vec![])` for a song that has no recorded plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongAggregate {
    pub song: SongRow,
    pub writers: Vec<String>,
    pub artists: Vec<String>,
    pub plays: Option<Vec<PlayRow>>,
}

impl SongAggregate {
    /// Aggregate with no credits and no play history loaded.
    pub fn bare(song: SongRow) -> Self {
        Self {
            song,
            writers: Vec::new(),
            artists: Vec::new(),
            plays: None,
        }
    }
}

/// An album together with its songs, when those were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumAggregate {
    pub album: AlbumRow,
    pub songs: Option<Vec<SongAggregate>>,
}

/// A chart entry with the song's credits loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPlayAggregate {
    pub play_count: i64,
    pub song: SongAggregate,
}

/// Which relations to load alongside a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongProjection {
    /// Load the most recent monthly plays
    pub include_plays: bool,
}

impl SongProjection {
    /// Most recent monthly play rows loaded per song.
    pub const PLAY_HISTORY_CAP: u32 = 12;

    pub fn with_plays(include_plays: bool) -> Self {
        Self { include_plays }
    }
}

/// Which relations to load alongside an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlbumProjection {
    /// Load the album's songs (with writer and artist credits)
    pub include_songs: bool,
}

impl AlbumProjection {
    pub fn with_songs(include_songs: bool) -> Self {
        Self { include_songs }
    }
}

/// Rows of one result window together with the number of rows matching the
/// filter across all windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Counted<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}
