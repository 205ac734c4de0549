//! Song repository trait and implementation

use crate::error::Result;
use crate::models::{Counted, SongAggregate, SongProjection, SongRow, TopPlayAggregate, TopPlayRow};
use crate::query::{build_by_id_sql, CatalogFilter, SongSearch};
use crate::repositories::relations::{count_all, fetch_by_ordinals, hydrate_songs, search_window};
use crate::repositories::sorting::OrderClause;
use crate::repositories::PageRequest;
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};
use tracing::debug;

/// Song repository interface for data access operations
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Search songs matching `filter`, one page at a time
    ///
    /// # Returns
    /// The songs of the requested page and the number of songs matching the
    /// filter across all pages
    async fn search(
        &self,
        filter: &CatalogFilter,
        order: &[OrderClause],
        page: PageRequest,
        projection: SongProjection,
    ) -> Result<Counted<SongAggregate>>;

    /// Find a song by its ID
    ///
    /// # Returns
    /// - `Ok(Some(song))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: i64, projection: SongProjection)
        -> Result<Option<SongAggregate>>;

    /// Count total songs
    async fn count(&self) -> Result<i64>;

    /// Fetch the songs ranked at `ordinals` (1-based, primary key order)
    async fn find_by_ordinals(
        &self,
        ordinals: &[i64],
        order: &[OrderClause],
        projection: SongProjection,
    ) -> Result<Vec<SongAggregate>>;

    /// Most played songs of one month, highest play count first
    async fn top_by_month(&self, month: u32, year: i32, limit: u32)
        -> Result<Vec<TopPlayAggregate>>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SqliteSongRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn search(
        &self,
        filter: &CatalogFilter,
        order: &[OrderClause],
        page: PageRequest,
        projection: SongProjection,
    ) -> Result<Counted<SongAggregate>> {
        let window =
            search_window::<SongSearch, SongRow>(&self.pool, filter, order, page).await?;
        let items = hydrate_songs(&self.pool, window.items, projection).await?;
        Ok(Counted::new(items, window.total))
    }

    async fn find_by_id(
        &self,
        id: i64,
        projection: SongProjection,
    ) -> Result<Option<SongAggregate>> {
        let row = query_as::<_, SongRow>(&build_by_id_sql::<SongSearch>())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(song_id = id, "Song not found");
            return Ok(None);
        };

        Ok(hydrate_songs(&self.pool, vec![row], projection)
            .await?
            .into_iter()
            .next())
    }

    async fn count(&self) -> Result<i64> {
        count_all::<SongSearch>(&self.pool).await
    }

    async fn find_by_ordinals(
        &self,
        ordinals: &[i64],
        order: &[OrderClause],
        projection: SongProjection,
    ) -> Result<Vec<SongAggregate>> {
        let rows = fetch_by_ordinals::<SongSearch, SongRow>(&self.pool, ordinals, order).await?;
        hydrate_songs(&self.pool, rows, projection).await
    }

    async fn top_by_month(
        &self,
        month: u32,
        year: i32,
        limit: u32,
    ) -> Result<Vec<TopPlayAggregate>> {
        let rows = query_as::<_, TopPlayRow>(
            r#"
            SELECT pl.play_count, s.id, s.title, s.year, s.total_plays, s.album_id,
                   alb.title AS album_title
            FROM plays pl
            JOIN songs s ON s.id = pl.song_id
            LEFT JOIN albums alb ON alb.id = s.album_id
            WHERE pl.month = ? AND pl.year = ?
            ORDER BY pl.play_count DESC, s.id ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(month))
        .bind(year)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(month, year, entries = rows.len(), "Loaded monthly chart");

        let play_counts: Vec<i64> = rows.iter().map(|row| row.play_count).collect();
        let songs = rows.into_iter().map(|row| row.song).collect();
        let songs = hydrate_songs(&self.pool, songs, SongProjection::default()).await?;

        Ok(play_counts
            .into_iter()
            .zip(songs)
            .map(|(play_count, song)| TopPlayAggregate { play_count, song })
            .collect())
    }
}
