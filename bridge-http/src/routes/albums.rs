//! Album endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_service::QueryParams;

use super::json_or_no_content;
use crate::error::{parse_id, ApiError};
use crate::state::AppState;

/// GET /albums - Search albums
pub async fn search_albums(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let criteria = state.catalog.criteria().search_albums(&params)?;
    let page = state.catalog.albums().search(&criteria).await?;
    Ok(Json(page).into_response())
}

/// GET /albums/recommendations
pub async fn album_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let criteria = state.catalog.criteria().album_recommendations(&params)?;
    let albums = state.catalog.albums().get_recommendations(&criteria).await?;
    Ok(Json(albums).into_response())
}

/// GET /albums/:id
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let criteria = state.catalog.criteria().album_by_id(&params)?;

    let album = state.catalog.albums().get_by_id(id, &criteria).await?;
    Ok(json_or_no_content(album))
}
