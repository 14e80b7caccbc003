//! # Rating Store
//!
//! Storage adapters for album rating documents. The HTTP layer talks to a
//! [`RatingStore`] and never to a backend directly, so both adapters expose the
//! same four operations with the same semantics:
//!
//! - `list_all` - every stored document, an empty collection is not an error
//! - `list_by_artist` - exact, case-sensitive match on `artistName`; no match is
//!   [`StoreError::ArtistNotFound`]
//! - `insert` - stores any non-empty JSON object under a fresh UUID
//! - `update_by_name` - sets `albumRating` and `albumReview` on **every** record
//!   whose `albumName` matches and returns how many were touched; no match is
//!   [`StoreError::AlbumNotFound`]
//!
//! ## Backends
//!
//! - [`SqliteStore`] keeps a connection pool for the whole process. Its update
//!   is one SQL statement and is atomic.
//! - [`FileStore`] opens its JSON file for every operation and lets go of it
//!   before returning. Updates within one process are serialised, but two
//!   processes sharing a file can still lose writes.

mod file;
mod sqlite;

pub use file::FileStore;
pub use sqlite::SqliteStore;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::{
    config::{Backend, Config},
    types::Document,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no ratings found for artist {0}")]
    ArtistNotFound(String),
    #[error("no rating found for album {0}")]
    AlbumNotFound(String),
    #[error("refusing to store an empty document")]
    EmptyDocument,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub enum RatingStore {
    Sqlite(SqliteStore),
    File(FileStore),
}

impl RatingStore {
    /// Opens the backend selected in the configuration.
    pub async fn open(config: &Config) -> StoreResult<Self> {
        let store = match config.backend {
            Backend::Sqlite => Self::Sqlite(SqliteStore::connect(&config.database_url).await?),
            Backend::File => Self::File(FileStore::new(&config.ratings_file)),
        };
        info!(backend = %store.backend(), "rating store ready");
        Ok(store)
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Sqlite(_) => Backend::Sqlite,
            Self::File(_) => Backend::File,
        }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Document>> {
        match self {
            Self::Sqlite(store) => store.list_all().await,
            Self::File(store) => store.list_all().await,
        }
    }

    pub async fn list_by_artist(&self, artist_name: &str) -> StoreResult<Vec<Document>> {
        let albums = match self {
            Self::Sqlite(store) => store.list_by_artist(artist_name).await?,
            Self::File(store) => store.list_by_artist(artist_name).await?,
        };

        if albums.is_empty() {
            return Err(StoreError::ArtistNotFound(artist_name.to_string()));
        }
        Ok(albums)
    }

    /// Stores a new document and returns the id it was filed under.
    pub async fn insert(&self, document: Document) -> StoreResult<String> {
        if document.is_empty() {
            return Err(StoreError::EmptyDocument);
        }

        match self {
            Self::Sqlite(store) => store.insert(document).await,
            Self::File(store) => store.insert(document).await,
        }
    }

    pub async fn update_by_name(
        &self,
        album_name: &str,
        rating: &Value,
        review: &Value,
    ) -> StoreResult<u64> {
        let updated = match self {
            Self::Sqlite(store) => store.update_by_name(album_name, rating, review).await?,
            Self::File(store) => store.update_by_name(album_name, rating, review).await?,
        };

        if updated == 0 {
            return Err(StoreError::AlbumNotFound(album_name.to_string()));
        }
        Ok(updated)
    }
}
