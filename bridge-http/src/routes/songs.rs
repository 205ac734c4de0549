//! Song endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_service::QueryParams;

use super::json_or_no_content;
use crate::error::{parse_id, ApiError};
use crate::state::AppState;

/// GET /songs - Search songs with filters, sorting and pagination
pub async fn search_songs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let criteria = state.catalog.criteria().search_songs(&params)?;
    let page = state.catalog.songs().search(&criteria).await?;
    Ok(Json(page).into_response())
}

/// GET /songs/recommendations - Random songs
pub async fn song_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let criteria = state.catalog.criteria().song_recommendations(&params)?;
    let songs = state.catalog.songs().get_recommendations(&criteria).await?;
    Ok(Json(songs).into_response())
}

/// GET /songs/top-songs-by-months - Most played songs of each requested month
pub async fn top_songs_by_months(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let criteria = state.catalog.criteria().top_songs(&params)?;
    let charts = state.catalog.songs().get_top_by_months(&criteria).await?;
    Ok(Json(charts).into_response())
}

/// GET /songs/:id - Single song
pub async fn get_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let criteria = state.catalog.criteria().song_by_id(&params)?;

    let song = state.catalog.songs().get_by_id(id, &criteria).await?;
    Ok(json_or_no_content(song))
}
