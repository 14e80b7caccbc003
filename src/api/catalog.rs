use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;

use crate::{error::ApiError, server::AppState};

/// `GET /spotify/{artistId}`
pub async fn artist_albums(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.spotify.artist_albums(&artist_id).await?))
}

/// `GET /spotify/artists/{artistName}`
pub async fn search_artists(
    State(state): State<AppState>,
    Path(artist_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.spotify.search_artists(&artist_name).await?))
}
