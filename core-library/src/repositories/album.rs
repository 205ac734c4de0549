//! Album repository trait and implementation

use crate::error::Result;
use crate::models::{
    AlbumAggregate, AlbumProjection, AlbumRow, Counted, SongAggregate, SongProjection, SongRow,
};
use crate::query::{
    build_by_id_sql, placeholders, AlbumSearch, CatalogFilter, SearchableEntity, SongSearch,
};
use crate::repositories::relations::{count_all, fetch_by_ordinals, hydrate_songs, search_window};
use crate::repositories::sorting::OrderClause;
use crate::repositories::PageRequest;
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

/// Album repository interface for data access operations
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Search albums matching `filter`, one page at a time
    async fn search(
        &self,
        filter: &CatalogFilter,
        order: &[OrderClause],
        page: PageRequest,
        projection: AlbumProjection,
    ) -> Result<Counted<AlbumAggregate>>;

    /// Find an album by its ID
    ///
    /// # Returns
    /// - `Ok(Some(album))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(
        &self,
        id: i64,
        projection: AlbumProjection,
    ) -> Result<Option<AlbumAggregate>>;

    /// Count total albums
    async fn count(&self) -> Result<i64>;

    /// Fetch the albums ranked at `ordinals` (1-based, primary key order)
    async fn find_by_ordinals(
        &self,
        ordinals: &[i64],
        order: &[OrderClause],
        projection: AlbumProjection,
    ) -> Result<Vec<AlbumAggregate>>;
}

/// SQLite implementation of AlbumRepository
pub struct SqliteAlbumRepository {
    pool: SqlitePool,
}

impl SqliteAlbumRepository {
    /// Create a new SqliteAlbumRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Songs of each album in primary key order, with writer and artist names.
    async fn songs_for(&self, album_ids: &[i64]) -> Result<HashMap<i64, Vec<SongAggregate>>> {
        let sql = format!(
            "SELECT {} {} WHERE s.album_id IN ({}) ORDER BY s.album_id, s.id",
            SongSearch::COLUMNS,
            SongSearch::SELECT_FROM,
            placeholders(album_ids.len())
        );

        let mut query = query_as::<_, SongRow>(&sql);
        for id in album_ids {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let songs = hydrate_songs(&self.pool, rows, SongProjection::default()).await?;

        let mut by_album: HashMap<i64, Vec<SongAggregate>> = HashMap::new();
        for song in songs {
            if let Some(album_id) = song.song.album_id {
                by_album.entry(album_id).or_default().push(song);
            }
        }
        Ok(by_album)
    }

    /// Pair album rows with their songs when the projection asks for them.
    async fn attach_songs(
        &self,
        albums: Vec<AlbumRow>,
        projection: AlbumProjection,
    ) -> Result<Vec<AlbumAggregate>> {
        if !projection.include_songs || albums.is_empty() {
            return Ok(albums
                .into_iter()
                .map(|album| AlbumAggregate { album, songs: None })
                .collect());
        }

        let ids: Vec<i64> = albums.iter().map(|album| album.id).collect();
        let mut songs = self.songs_for(&ids).await?;
        debug!(albums = ids.len(), "Loaded album songs");

        Ok(albums
            .into_iter()
            .map(|album| AlbumAggregate {
                songs: Some(songs.remove(&album.id).unwrap_or_default()),
                album,
            })
            .collect())
    }
}

#[async_trait]
impl AlbumRepository for SqliteAlbumRepository {
    async fn search(
        &self,
        filter: &CatalogFilter,
        order: &[OrderClause],
        page: PageRequest,
        projection: AlbumProjection,
    ) -> Result<Counted<AlbumAggregate>> {
        let window =
            search_window::<AlbumSearch, AlbumRow>(&self.pool, filter, order, page).await?;
        let items = self.attach_songs(window.items, projection).await?;
        Ok(Counted::new(items, window.total))
    }

    async fn find_by_id(
        &self,
        id: i64,
        projection: AlbumProjection,
    ) -> Result<Option<AlbumAggregate>> {
        let row = query_as::<_, AlbumRow>(&build_by_id_sql::<AlbumSearch>())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(album_id = id, "Album not found");
            return Ok(None);
        };

        Ok(self.attach_songs(vec![row], projection).await?.into_iter().next())
    }

    async fn count(&self) -> Result<i64> {
        count_all::<AlbumSearch>(&self.pool).await
    }

    async fn find_by_ordinals(
        &self,
        ordinals: &[i64],
        order: &[OrderClause],
        projection: AlbumProjection,
    ) -> Result<Vec<AlbumAggregate>> {
        let rows = fetch_by_ordinals::<AlbumSearch, AlbumRow>(&self.pool, ordinals, order).await?;
        self.attach_songs(rows, projection).await
    }
}
