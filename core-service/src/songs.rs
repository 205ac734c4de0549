//! Song service: search, lookup, recommendations and monthly charts.

use crate::criteria::{
    SearchSongCriteria, SongByIdCriteria, SongRecommendationCriteria, SortCriteria,
    TopSongsCriteria,
};
use crate::error::Result;
use core_library::dto::{SongDto, TopSongsDto};
use core_library::mapping::{map_song_row, map_song_rows, map_top_songs, SongFields};
use core_library::models::SongProjection;
use core_library::query::CatalogFilter;
use core_library::repositories::{
    build_order_by, OrderClause, Page, RandomRecommender, Recommender, SongRepository,
    SongSortField, SqliteSongRepository,
};
use futures::future::try_join_all;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

fn song_order(sort: &SortCriteria<SongSortField>) -> Vec<OrderClause> {
    build_order_by::<SongSortField, _>(&sort.field_names(), sort.direction)
}

/// Orchestrates song queries and shapes their results.
#[derive(Clone)]
pub struct SongService {
    repository: Arc<dyn SongRepository>,
    recommender: Arc<dyn Recommender>,
}

impl SongService {
    pub fn new(repository: Arc<dyn SongRepository>, recommender: Arc<dyn Recommender>) -> Self {
        Self {
            repository,
            recommender,
        }
    }

    /// Service backed by SQLite and uniform random recommendations.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteSongRepository::new(pool)),
            Arc::new(RandomRecommender),
        )
    }

    /// Search songs by year and keyword, one page at a time.
    ///
    /// Rows carry no `id`; their `index` continues across pages.
    pub async fn search(&self, criteria: &SearchSongCriteria) -> Result<Page<SongDto>> {
        info!(
            year = ?criteria.year,
            keyword = ?criteria.keyword,
            page = criteria.page.page,
            limit = criteria.page.limit,
            "Searching songs"
        );

        let filter = CatalogFilter::new(criteria.year, criteria.keyword.clone());
        let order = song_order(&criteria.sort);
        let projection = SongProjection::with_plays(criteria.include_play_data);

        let result = self
            .repository
            .search(&filter, &order, criteria.page, projection)
            .await?;

        let data = map_song_rows(result.items, criteria.page.offset(), SongFields::SEARCH_ROW);
        Ok(Page::new(data, result.total, criteria.page))
    }

    /// Look a song up by id. `None` when it does not exist.
    pub async fn get_by_id(&self, id: i64, criteria: &SongByIdCriteria) -> Result<Option<SongDto>> {
        info!(song_id = id, include_play_data = criteria.include_play_data, "Get song by id");

        let projection = SongProjection::with_plays(criteria.include_play_data);
        let song = self.repository.find_by_id(id, projection).await?;

        Ok(song.map(|song| map_song_row(song, 0, 0, SongFields::FULL)))
    }

    /// `limit` songs picked by the recommender.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when `limit` exceeds the number of songs.
    pub async fn get_recommendations(
        &self,
        criteria: &SongRecommendationCriteria,
    ) -> Result<Vec<SongDto>> {
        let total = self.repository.count().await?;
        let ordinals = self.recommender.pick(i64::from(criteria.limit), total)?;
        debug!(total, picked = ?ordinals, "Picked song recommendations");

        let order = song_order(&criteria.sort);
        let projection = SongProjection::with_plays(criteria.include_play_data);
        let songs = self
            .repository
            .find_by_ordinals(&ordinals, &order, projection)
            .await?;

        Ok(map_song_rows(songs, 0, SongFields::FULL))
    }

    /// One chart per requested month, in request order.
    pub async fn get_top_by_months(&self, criteria: &TopSongsCriteria) -> Result<Vec<TopSongsDto>> {
        info!(
            months = criteria.month_years.len(),
            limit = criteria.limit,
            "Get top songs by months"
        );

        let charts = criteria.month_years.iter().map(|month_year| async move {
            let entries = self
                .repository
                .top_by_month(month_year.month, month_year.year, criteria.limit)
                .await?;
            Ok::<_, crate::error::ServiceError>(map_top_songs(
                month_year.month,
                month_year.year,
                entries,
            ))
        });

        try_join_all(charts).await
    }
}
