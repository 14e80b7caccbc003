use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::ApiError,
    server::AppState,
    types::{Document, RatingUpdate},
};

const MISSING_BODY: &str = "[Error] please specify request body";

/// `GET /album`
pub async fn list_albums(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

/// `GET /album/by-artist/{artistName}`
pub async fn list_artist_albums(
    State(state): State<AppState>,
    Path(artist_name): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.store.list_by_artist(&artist_name).await?))
}

/// `POST /album`
pub async fn add_rating(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    let document = parse_document(&body)?;
    let id = state.store.insert(document).await?;
    info!(%id, "rating added");

    Ok(Json("Data successfully added"))
}

/// `PUT /album`
pub async fn update_rating(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let document = parse_document(&body)?;
    let update: RatingUpdate = serde_json::from_value(Value::Object(document))
        .map_err(|e| ApiError::BadRequest(format!("[Error] invalid update body: {e}")))?;

    let updated = state
        .store
        .update_by_name(&update.name, &update.rating, &update.review)
        .await?;
    info!(album = %update.name, updated, "rating updated");

    Ok(Json(json!({
        "message": "Album successfully updated",
        "updated": updated,
    })))
}

/// Parses a request body that must be a non-empty JSON object.
///
/// An absent body, `null`, `{}` and anything that is not an object are all
/// treated as a missing body.
fn parse_document(body: &[u8]) -> Result<Document, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest(MISSING_BODY.to_string()));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(document)) if !document.is_empty() => Ok(document),
        Ok(_) => Err(ApiError::BadRequest(MISSING_BODY.to_string())),
        Err(e) => Err(ApiError::BadRequest(format!("[Error] invalid JSON body: {e}"))),
    }
}
