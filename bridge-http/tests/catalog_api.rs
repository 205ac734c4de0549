//! End-to-end tests of the HTTP surface over the fixture catalog.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bridge_http::{create_router, AppState};
use core_library::db::create_test_pool;
use core_library::fixtures::seed_catalog;
use core_runtime::config::PaginationLimits;
use core_runtime::time::FixedClock;
use core_service::CatalogService;
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn setup_app() -> Router {
    let pool = create_test_pool().await.unwrap();
    seed_catalog(&pool).await.unwrap();

    let clock = FixedClock::at_month(2024, 1).unwrap();
    let catalog = CatalogService::from_pool(pool, PaginationLimits::default(), Arc::new(clock));
    create_router(Arc::new(AppState::new(catalog)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn titles(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_search_songs_sorted_and_paged() {
    let app = setup_app().await;
    let (status, body) = get_json(
        app,
        "/songs?keyword=SWIFT&orderBy=totalPlays&orderDirection=desc&limit=2&page=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body["data"]), vec!["Shake It Off", "Blank Space"]);
    assert_eq!(
        body["pagination"],
        json!({ "total": 6, "page": 1, "limit": 2, "totalPages": 3 })
    );

    let first = &body["data"][0];
    assert_eq!(first["index"], json!(1));
    assert!(first.get("id").is_none());
    assert_eq!(first["album"], json!({ "id": 2, "title": "1989" }));
}

#[tokio::test]
async fn test_search_songs_second_page_continues_index() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs?orderBy=year&limit=4&page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body["data"]), vec!["Blank Space", "Bad Blood"]);
    assert_eq!(body["data"][0]["index"], json!(5));
    assert_eq!(body["pagination"]["totalPages"], json!(2));
}

#[tokio::test]
async fn test_search_songs_by_artist_keyword() {
    let app = setup_app().await;
    let (_, body) = get_json(app, "/songs?keyword=kendrick").await;

    assert_eq!(titles(&body["data"]), vec!["Bad Blood"]);
    assert_eq!(
        body["data"][0]["artists"],
        json!(["Kendrick Lamar", "Taylor Swift"])
    );
}

#[tokio::test]
async fn test_search_without_matches_omits_pagination() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs?year=1999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_search_songs_reports_every_violation() {
    let app = setup_app().await;
    let (status, body) = get_json(
        app,
        "/songs?year=24&page=0&limit=51&orderBy=rating&orderDirection=DESC",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "Validation failed",
            "errors": [
                { "field": "year", "message": "Year must be a 4-digit number or omitted" },
                { "field": "page", "message": "Page must be greater than 0" },
                { "field": "limit", "message": "Limit must be less than or equal to 50" },
                { "field": "orderBy", "message": "Invalid orderBy value. Use songName, albumName, year, totalPlays" },
                { "field": "orderDirection", "message": "Invalid orderDirection value. Use \"asc\" or \"desc\"" }
            ]
        })
    );
}

#[tokio::test]
async fn test_get_song_with_play_history() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs/1?includePlayData=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["index"], json!(1));
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["title"], json!("Love Story"));
    assert_eq!(body["album"], json!({ "id": 1, "title": "Fearless" }));

    let plays = body["plays"].as_array().unwrap();
    assert_eq!(plays.len(), 12);
    assert_eq!(plays[0], json!({ "month": 2, "year": 2024, "playCount": 400 }));
    assert_eq!(plays[11], json!({ "month": 3, "year": 2023, "playCount": 400 }));
}

#[tokio::test]
async fn test_get_missing_song_is_no_content() {
    let app = setup_app().await;
    let (status, body) = get(app, "/songs/999").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_get_song_rejects_non_numeric_id() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Validation failed (numeric string is expected)" })
    );
}

#[tokio::test]
async fn test_song_recommendations_cover_catalog_in_order() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs/recommendations?limit=6&orderBy=year").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec![
            "Fifteen",
            "Love Story",
            "All Too Well",
            "Shake It Off",
            "Blank Space",
            "Bad Blood"
        ]
    );
    assert_eq!(body[5]["index"], json!(6));
    assert!(body[0].get("plays").is_none());
}

#[tokio::test]
async fn test_song_recommendations_beyond_catalog_fail() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs/recommendations?limit=7").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal server error" }));
}

#[tokio::test]
async fn test_top_songs_for_requested_months() {
    let app = setup_app().await;
    let (status, body) = get_json(
        app,
        "/songs/top-songs-by-months?monthYears=2024-02,2024-01&limit=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let charts = body.as_array().unwrap();
    assert_eq!(charts.len(), 2);

    assert_eq!(charts[0]["month"], json!(2));
    assert_eq!(charts[0]["year"], json!(2024));
    let counts: Vec<i64> = charts[0]["topSongs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["playCount"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![650, 400]);

    assert_eq!(charts[1]["month"], json!(1));
    assert_eq!(charts[1]["topSongs"][0]["song"]["title"], json!("Shake It Off"));
}

#[tokio::test]
async fn test_top_songs_default_to_current_month() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/songs/top-songs-by-months").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["month"], json!(1));
    assert_eq!(body[0]["year"], json!(2024));
    assert_eq!(body[0]["topSongs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_top_songs_reject_bad_months() {
    let app = setup_app().await;
    let (status, body) = get_json(
        app,
        "/songs/top-songs-by-months?monthYears=2024-13&limit=60",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            { "field": "monthYears", "message": "Invalid date format, expected YYYY-MM,YYYY-MM,..." },
            { "field": "limit", "message": "Song limit must be less than or equal to 50" }
        ])
    );
}

#[tokio::test]
async fn test_search_albums_by_year_with_songs() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/albums?year=2014&includeSongData=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body["data"]), vec!["1989"]);

    let songs = &body["data"][0]["songs"];
    assert_eq!(titles(songs), vec!["Shake It Off", "Blank Space", "Bad Blood"]);
    assert_eq!(songs[2]["index"], json!(3));
    assert!(songs[0].get("album").is_none());
}

#[tokio::test]
async fn test_get_album_without_songs() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/albums/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "index": 1, "id": 3, "title": "Red" }));
}

#[tokio::test]
async fn test_get_missing_album_is_no_content() {
    let app = setup_app().await;
    let (status, body) = get(app, "/albums/42").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_album_recommendations_sorted() {
    let app = setup_app().await;
    let (status, body) = get_json(
        app,
        "/albums/recommendations?limit=3&orderBy=albumName&orderDirection=desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Red", "Fearless", "1989"]);
}

#[tokio::test]
async fn test_album_flag_must_be_boolean() {
    let app = setup_app().await;
    let (status, body) = get_json(app, "/albums/1?includeSongData=yes").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([{ "field": "includeSongData", "message": "includeSongData must be \"true\" or \"false\"" }])
    );
}
