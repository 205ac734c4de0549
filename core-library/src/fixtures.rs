//! Small catalog used by tests across the workspace.
//!
//! | id | song | year | album | total plays | writers | artists |
//! |----|------|------|-------|-------------|---------|---------|
//! | 1 | Love Story | 2009 | Fearless | 5000 | Taylor Swift | Taylor Swift |
//! | 2 | Fifteen | 2008 | Fearless | 3000 | Liz Rose, Taylor Swift | Taylor Swift |
//! | 3 | Shake It Off | 2014 | 1989 | 9000 | Max Martin, Shellback, Taylor Swift | Taylor Swift |
//! | 4 | Blank Space | 2014 | 1989 | 8000 | Max Martin, Shellback, Taylor Swift | Taylor Swift |
//! | 5 | Bad Blood | 2015 | 1989 | 6000 | Taylor Swift | Kendrick Lamar, Taylor Swift |
//! | 6 | All Too Well | 2012 | Red | 4000 | Liz Rose, Taylor Swift | Taylor Swift |
//!
//! Monthly plays: song 1 has 400 plays in every month from January 2023 to
//! February 2024. January 2024 adds song 3 (900) and song 4 (700);
//! February 2024 adds song 4 (650) and song 5 (300).

use crate::error::Result;
use sqlx::SqlitePool;

const ALBUMS: &[(i64, &str)] = &[(1, "Fearless"), (2, "1989"), (3, "Red")];

const PERSONS: &[(i64, &str)] = &[
    (1, "Taylor Swift"),
    (2, "Max Martin"),
    (3, "Shellback"),
    (4, "Liz Rose"),
    (5, "Kendrick Lamar"),
];

// (id, title, year, total_plays, album_id)
const SONGS: &[(i64, &str, i32, i64, i64)] = &[
    (1, "Love Story", 2009, 5000, 1),
    (2, "Fifteen", 2008, 3000, 1),
    (3, "Shake It Off", 2014, 9000, 2),
    (4, "Blank Space", 2014, 8000, 2),
    (5, "Bad Blood", 2015, 6000, 2),
    (6, "All Too Well", 2012, 4000, 3),
];

// (song_id, person_id)
const WRITERS: &[(i64, i64)] = &[
    (1, 1),
    (2, 1),
    (2, 4),
    (3, 1),
    (3, 2),
    (3, 3),
    (4, 1),
    (4, 2),
    (4, 3),
    (5, 1),
    (6, 1),
    (6, 4),
];

const ARTISTS: &[(i64, i64)] = &[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (5, 5), (6, 1)];

// (song_id, month, year, play_count)
const CHART_PLAYS: &[(i64, i32, i32, i64)] = &[
    (3, 1, 2024, 900),
    (4, 1, 2024, 700),
    (4, 2, 2024, 650),
    (5, 2, 2024, 300),
];

/// Insert the fixture catalog into an empty, migrated database.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for &(id, title) in ALBUMS {
        sqlx::query("INSERT INTO albums (id, title) VALUES (?, ?)")
            .bind(id)
            .bind(title)
            .execute(&mut *tx)
            .await?;
    }

    for &(id, name) in PERSONS {
        sqlx::query("INSERT INTO persons (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    for &(id, title, year, total_plays, album_id) in SONGS {
        sqlx::query(
            "INSERT INTO songs (id, title, year, total_plays, album_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(year)
        .bind(total_plays)
        .bind(album_id)
        .execute(&mut *tx)
        .await?;
    }

    for &(song_id, person_id) in WRITERS {
        sqlx::query("INSERT INTO song_writers (song_id, person_id) VALUES (?, ?)")
            .bind(song_id)
            .bind(person_id)
            .execute(&mut *tx)
            .await?;
    }

    for &(song_id, person_id) in ARTISTS {
        sqlx::query("INSERT INTO song_artists (song_id, person_id) VALUES (?, ?)")
            .bind(song_id)
            .bind(person_id)
            .execute(&mut *tx)
            .await?;
    }

    let history = (1..=12)
        .map(|month| (month, 2023))
        .chain([(1, 2024), (2, 2024)]);
    for (month, year) in history {
        insert_play(&mut tx, 1, month, year, 400).await?;
    }

    for &(song_id, month, year, play_count) in CHART_PLAYS {
        insert_play(&mut tx, song_id, month, year, play_count).await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn insert_play(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    song_id: i64,
    month: i32,
    year: i32,
    play_count: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO plays (song_id, month, year, play_count) VALUES (?, ?, ?, ?)")
        .bind(song_id)
        .bind(month)
        .bind(year)
        .bind(play_count)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Insert `count` bare songs without album or credits, ids starting at `first_id`.
pub async fn seed_bulk_songs(pool: &SqlitePool, first_id: i64, count: i64) -> Result<()> {
    let mut tx = pool.begin().await?;
    for id in first_id..first_id + count {
        sqlx::query("INSERT INTO songs (id, title, year, total_plays) VALUES (?, ?, 2000, 0)")
            .bind(id)
            .bind(format!("Song {}", id))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}
