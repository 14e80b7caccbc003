use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored rating as it travels over the wire: any JSON object.
///
/// Inserts are not validated against any schema, so extra or missing fields
/// are kept exactly as the client sent them.
pub type Document = Map<String, Value>;

pub const ALBUM_NAME_FIELD: &str = "albumName";
pub const ARTIST_NAME_FIELD: &str = "artistName";
pub const ALBUM_RATING_FIELD: &str = "albumRating";
pub const ALBUM_REVIEW_FIELD: &str = "albumReview";

/// Body of `PUT /album`.
///
/// `rating` and `review` must be present but may hold any JSON value; they are
/// written into the matching documents as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub name: String,
    pub rating: Value,
    pub review: Value,
}

/// A document together with the id the store assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRating {
    pub id: String,
    pub document: Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}
