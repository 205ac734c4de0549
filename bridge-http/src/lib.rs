//! HTTP server setup with Axum
//!
//! Routes:
//! - `GET /` - liveness probe
//! - `GET /songs`, `/songs/recommendations`, `/songs/top-songs-by-months`, `/songs/:id`
//! - `GET /albums`, `/albums/recommendations`, `/albums/:id`

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{albums, songs};

/// Body of the liveness probe.
pub const HEALTH_MESSAGE: &str = "The server is running.";

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/songs", get(songs::search_songs))
        .route("/songs/recommendations", get(songs::song_recommendations))
        .route("/songs/top-songs-by-months", get(songs::top_songs_by_months))
        .route("/songs/:id", get(songs::get_song))
        .route("/albums", get(albums::search_albums))
        .route("/albums/recommendations", get(albums::album_recommendations))
        .route("/albums/:id", get(albums::get_album))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_library::db::create_test_pool;
    use core_runtime::config::PaginationLimits;
    use core_service::CatalogService;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let pool = create_test_pool().await.unwrap();
        let catalog = CatalogService::with_system_clock(pool, PaginationLimits::default());
        let app = create_router(Arc::new(AppState::new(catalog)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], HEALTH_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let pool = create_test_pool().await.unwrap();
        let catalog = CatalogService::with_system_clock(pool, PaginationLimits::default());
        let app = create_router(Arc::new(AppState::new(catalog)));

        let response = app
            .oneshot(Request::builder().uri("/artists").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
