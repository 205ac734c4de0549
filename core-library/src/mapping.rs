//! Conversion of repository aggregates into response objects.
//!
//! Every function here is pure: the same aggregate and offset always give
//! the same DTO.

use crate::dto::{AlbumDto, PlayDto, SongAlbumDto, SongDto, TopSongEntryDto, TopSongsDto};
use crate::models::{AlbumAggregate, PlayRow, SongAggregate, TopPlayAggregate};
use crate::repositories::record_index;

/// Which optional song fields end up in the DTO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongFields {
    pub id: bool,
    pub album: bool,
}

impl SongFields {
    /// Every field.
    pub const FULL: Self = Self {
        id: true,
        album: true,
    };

    /// Rows of a song search, which do not expose the song id.
    pub const SEARCH_ROW: Self = Self {
        id: false,
        album: true,
    };

    /// Songs nested in their own album.
    pub const ALBUM_TRACK: Self = Self {
        id: true,
        album: false,
    };
}

fn map_play(play: &PlayRow) -> PlayDto {
    PlayDto {
        month: play.month,
        year: play.year,
        play_count: play.play_count,
    }
}

/// Map one song at `position` within a window starting at `offset`.
pub fn map_song_row(
    aggregate: SongAggregate,
    position: usize,
    offset: u64,
    fields: SongFields,
) -> SongDto {
    let SongAggregate {
        song,
        writers,
        artists,
        plays,
    } = aggregate;

    let album = if fields.album {
        match (song.album_id, song.album_title) {
            (Some(id), Some(title)) => Some(SongAlbumDto { id, title }),
            _ => None,
        }
    } else {
        None
    };

    SongDto {
        index: record_index(position, offset),
        id: fields.id.then_some(song.id),
        title: song.title,
        year: song.year,
        total_plays: song.total_plays,
        album,
        writers,
        artists,
        plays: plays.map(|plays| plays.iter().map(map_play).collect()),
    }
}

pub fn map_song_rows(rows: Vec<SongAggregate>, offset: u64, fields: SongFields) -> Vec<SongDto> {
    rows.into_iter()
        .enumerate()
        .map(|(position, row)| map_song_row(row, position, offset, fields))
        .collect()
}

/// Map one album; nested songs are ranked from 1 within the album.
pub fn map_album_row(aggregate: AlbumAggregate, position: usize, offset: u64) -> AlbumDto {
    let AlbumAggregate { album, songs } = aggregate;

    AlbumDto {
        index: record_index(position, offset),
        id: album.id,
        title: album.title,
        songs: songs.map(|songs| map_song_rows(songs, 0, SongFields::ALBUM_TRACK)),
    }
}

pub fn map_album_rows(rows: Vec<AlbumAggregate>, offset: u64) -> Vec<AlbumDto> {
    rows.into_iter()
        .enumerate()
        .map(|(position, row)| map_album_row(row, position, offset))
        .collect()
}

/// Map the chart of one month.
pub fn map_top_songs(month: u32, year: i32, entries: Vec<TopPlayAggregate>) -> TopSongsDto {
    let top_songs = entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| TopSongEntryDto {
            play_count: entry.play_count,
            song: map_song_row(entry.song, position, 0, SongFields::FULL),
        })
        .collect();

    TopSongsDto {
        month,
        year,
        top_songs,
    }
}
