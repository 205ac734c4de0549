//! Album service: search, lookup and recommendations.

use crate::criteria::{
    AlbumByIdCriteria, AlbumRecommendationCriteria, SearchAlbumCriteria, SortCriteria,
};
use crate::error::Result;
use core_library::dto::AlbumDto;
use core_library::mapping::{map_album_row, map_album_rows};
use core_library::models::AlbumProjection;
use core_library::query::CatalogFilter;
use core_library::repositories::{
    build_order_by, AlbumRepository, AlbumSortField, OrderClause, Page, RandomRecommender,
    Recommender, SqliteAlbumRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

fn album_order(sort: &SortCriteria<AlbumSortField>) -> Vec<OrderClause> {
    build_order_by::<AlbumSortField, _>(&sort.field_names(), sort.direction)
}

/// Orchestrates album queries and shapes their results.
#[derive(Clone)]
pub struct AlbumService {
    repository: Arc<dyn AlbumRepository>,
    recommender: Arc<dyn Recommender>,
}

impl AlbumService {
    pub fn new(repository: Arc<dyn AlbumRepository>, recommender: Arc<dyn Recommender>) -> Self {
        Self {
            repository,
            recommender,
        }
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteAlbumRepository::new(pool)),
            Arc::new(RandomRecommender),
        )
    }

    pub async fn search(&self, criteria: &SearchAlbumCriteria) -> Result<Page<AlbumDto>> {
        info!(
            year = ?criteria.year,
            keyword = ?criteria.keyword,
            page = criteria.page.page,
            limit = criteria.page.limit,
            "Searching albums"
        );

        let filter = CatalogFilter::new(criteria.year, criteria.keyword.clone());
        let order = album_order(&criteria.sort);
        let projection = AlbumProjection::with_songs(criteria.include_song_data);

        let result = self
            .repository
            .search(&filter, &order, criteria.page, projection)
            .await?;

        let data = map_album_rows(result.items, criteria.page.offset());
        Ok(Page::new(data, result.total, criteria.page))
    }

    /// Look an album up by id. `None` when it does not exist.
    pub async fn get_by_id(
        &self,
        id: i64,
        criteria: &AlbumByIdCriteria,
    ) -> Result<Option<AlbumDto>> {
        info!(album_id = id, include_song_data = criteria.include_song_data, "Get album by id");

        let projection = AlbumProjection::with_songs(criteria.include_song_data);
        let album = self.repository.find_by_id(id, projection).await?;

        Ok(album.map(|album| map_album_row(album, 0, 0)))
    }

    /// `limit` albums picked by the recommender.
    pub async fn get_recommendations(
        &self,
        criteria: &AlbumRecommendationCriteria,
    ) -> Result<Vec<AlbumDto>> {
        let total = self.repository.count().await?;
        let ordinals = self.recommender.pick(i64::from(criteria.limit), total)?;
        debug!(total, picked = ?ordinals, "Picked album recommendations");

        let order = album_order(&criteria.sort);
        let projection = AlbumProjection::with_songs(criteria.include_song_data);
        let albums = self
            .repository
            .find_by_ordinals(&ordinals, &order, projection)
            .await?;

        Ok(map_album_rows(albums, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use core_library::db::create_test_pool;
    use core_library::fixtures::seed_catalog;
    use core_library::models::{AlbumAggregate, AlbumRow, Counted};
    use core_library::repositories::{PageRequest, SortDirection};
    use core_library::LibraryError;
    use mockall::mock;
    use mockall::predicate::*;

    mock! {
        pub AlbumRepo {}

        #[async_trait::async_trait]
        impl AlbumRepository for AlbumRepo {
            async fn search(
                &self,
                filter: &CatalogFilter,
                order: &[OrderClause],
                page: PageRequest,
                projection: AlbumProjection,
            ) -> core_library::Result<Counted<AlbumAggregate>>;
            async fn find_by_id(&self, id: i64, projection: AlbumProjection) -> core_library::Result<Option<AlbumAggregate>>;
            async fn count(&self) -> core_library::Result<i64>;
            async fn find_by_ordinals(
                &self,
                ordinals: &[i64],
                order: &[OrderClause],
                projection: AlbumProjection,
            ) -> core_library::Result<Vec<AlbumAggregate>>;
        }
    }

    fn album(id: i64) -> AlbumAggregate {
        AlbumAggregate {
            album: AlbumRow {
                id,
                title: format!("Album {}", id),
            },
            songs: None,
        }
    }

    fn search_criteria() -> SearchAlbumCriteria {
        SearchAlbumCriteria {
            year: None,
            keyword: None,
            include_song_data: false,
            page: PageRequest::new(1, 10),
            sort: SortCriteria::default(),
        }
    }

    #[tokio::test]
    async fn test_search_maps_sort_and_projection() {
        let mut repo = MockAlbumRepo::new();
        repo.expect_search()
            .withf(|filter, order, _, projection| {
                filter.keyword.as_deref() == Some("red")
                    && order == [OrderClause::new("a.title", SortDirection::Desc)]
                    && projection.include_songs
            })
            .times(1)
            .returning(|_, _, _, _| Ok(Counted::new(vec![album(3)], 1)));

        let service = AlbumService::new(Arc::new(repo), Arc::new(RandomRecommender));
        let mut criteria = search_criteria();
        criteria.keyword = Some("red".to_string());
        criteria.include_song_data = true;
        criteria.sort = SortCriteria {
            fields: vec![AlbumSortField::AlbumName],
            direction: SortDirection::Desc,
        };

        let page = service.search(&criteria).await.unwrap();
        assert_eq!(page.data[0].index, 1);
        assert_eq!(page.data[0].id, 3);
        assert_eq!(page.pagination.unwrap().total_pages, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let mut repo = MockAlbumRepo::new();
        repo.expect_find_by_id()
            .with(eq(404), always())
            .returning(|_, _| Ok(None));

        let service = AlbumService::new(Arc::new(repo), Arc::new(RandomRecommender));
        assert!(service
            .get_by_id(404, &AlbumByIdCriteria::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_recommendations_fail_when_limit_exceeds_albums() {
        let mut repo = MockAlbumRepo::new();
        repo.expect_count().returning(|| Ok(3));
        repo.expect_find_by_ordinals().never();

        let service = AlbumService::new(Arc::new(repo), Arc::new(RandomRecommender));
        let criteria = AlbumRecommendationCriteria {
            include_song_data: false,
            sort: SortCriteria::default(),
            limit: 10,
        };

        let err = service.get_recommendations(&criteria).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Library(LibraryError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_recommendations_against_catalog() {
        let pool = create_test_pool().await.unwrap();
        seed_catalog(&pool).await.unwrap();
        let service = AlbumService::from_pool(pool);

        let criteria = AlbumRecommendationCriteria {
            include_song_data: true,
            sort: SortCriteria {
                fields: vec![AlbumSortField::AlbumName],
                direction: SortDirection::Asc,
            },
            limit: 3,
        };

        let albums = service.get_recommendations(&criteria).await.unwrap();
        let titles: Vec<&str> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["1989", "Fearless", "Red"]);
        assert!(albums.iter().all(|a| a.songs.is_some()));
    }

    #[tokio::test]
    async fn test_get_by_id_with_songs_against_catalog() {
        let pool = create_test_pool().await.unwrap();
        seed_catalog(&pool).await.unwrap();
        let service = AlbumService::from_pool(pool);

        let album = service
            .get_by_id(
                1,
                &AlbumByIdCriteria {
                    include_song_data: true,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(album.index, 1);
        assert_eq!(album.title, "Fearless");
        let songs = album.songs.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].index, 2);
        assert_eq!(songs[1].writers, vec!["Liz Rose", "Taylor Swift"]);
    }
}
