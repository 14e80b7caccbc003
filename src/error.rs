//! Error kinds surfaced by the HTTP layer.
//!
//! | Kind | Status |
//! |---|---|
//! | `BadRequest` | 400 |
//! | `NotFound` | 404 |
//! | `StorageFailure` | 500 |
//! | `UpstreamAuthFailure` | 502 |
//! | `UpstreamFailure` | 502 |
//!
//! Every error is rendered as `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{spotify::CatalogError, store::StoreError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    StorageFailure(StoreError),
    #[error("upstream authentication failed")]
    UpstreamAuthFailure,
    #[error("upstream request failed: {0}")]
    UpstreamFailure(CatalogError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamAuthFailure | ApiError::UpstreamFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// The message sent to the client. Backend details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::StorageFailure(_) => "[Error] storage backend failure".to_string(),
            ApiError::UpstreamAuthFailure => "[Error] upstream authentication failed".to_string(),
            ApiError::UpstreamFailure(CatalogError::Status { status, .. }) => {
                format!("[Error] upstream responded with {status}")
            }
            ApiError::UpstreamFailure(_) => "[Error] upstream request failed".to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ArtistNotFound(_) => {
                ApiError::NotFound("error artist does not exist".to_string())
            }
            StoreError::AlbumNotFound(_) => {
                ApiError::NotFound("[Error] Album could not be updated".to_string())
            }
            StoreError::EmptyDocument => {
                ApiError::BadRequest("[Error] please specify request body".to_string())
            }
            other => ApiError::StorageFailure(other),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Auth => ApiError::UpstreamAuthFailure,
            other => ApiError::UpstreamFailure(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status() {
        let cases = [
            (StoreError::ArtistNotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::AlbumNotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::EmptyDocument, StatusCode::BAD_REQUEST),
            (
                StoreError::Io(std::io::Error::other("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_catalog_errors_map_to_status() {
        assert!(matches!(
            ApiError::from(CatalogError::Auth),
            ApiError::UpstreamAuthFailure
        ));
        assert_eq!(
            ApiError::from(CatalogError::MissingItems).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err = ApiError::from(StoreError::Io(std::io::Error::other("/secret/path")));
        assert!(!err.public_message().contains("/secret/path"));
        assert!(err.to_string().contains("/secret/path"));
    }
}
