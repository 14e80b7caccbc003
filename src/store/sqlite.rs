use std::str::FromStr;

use serde_json::Value;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::StoreResult;
use crate::types::{
    ALBUM_NAME_FIELD, ALBUM_RATING_FIELD, ALBUM_REVIEW_FIELD, ARTIST_NAME_FIELD, Document,
};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS album_ratings (
    id TEXT PRIMARY KEY NOT NULL,
    document TEXT NOT NULL CHECK (json_valid(document))
)";

const SELECT_ALL: &str = "SELECT document FROM album_ratings ORDER BY rowid";

// JSON paths are bound as parameters, built from the field names in `types`.
const SELECT_BY_ARTIST: &str = "SELECT document FROM album_ratings
    WHERE json_extract(document, ?1) = ?2
    ORDER BY rowid";

const INSERT: &str = "INSERT INTO album_ratings (id, document) VALUES (?1, ?2)";

const UPDATE_BY_NAME: &str = "UPDATE album_ratings
    SET document = json_set(document, ?1, json(?2), ?3, json(?4))
    WHERE json_extract(document, ?5) = ?6";

/// Rating documents in a single SQLite table, one JSON text column per record.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `url` and creates the table if it does not exist yet.
    ///
    /// File databases are created on first use together with their parent
    /// directory. `sqlite::memory:` is supported for tests and throwaway runs.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            // each connection to an in-memory database sees its own empty database
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    async_fs::create_dir_all(parent).await?;
                }
            }
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        debug!(url, "connected to sqlite rating store");

        Ok(Self { pool })
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> StoreResult<Vec<Document>> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|raw| parse_document(raw)).collect()
    }

    #[instrument(skip(self))]
    pub async fn list_by_artist(&self, artist_name: &str) -> StoreResult<Vec<Document>> {
        let rows: Vec<String> = sqlx::query_scalar(SELECT_BY_ARTIST)
            .bind(json_path(ARTIST_NAME_FIELD))
            .bind(artist_name)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|raw| parse_document(raw)).collect()
    }

    #[instrument(skip_all)]
    pub async fn insert(&self, document: Document) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let raw = serde_json::to_string(&document)?;

        sqlx::query(INSERT)
            .bind(&id)
            .bind(raw)
            .execute(&self.pool)
            .await?;

        debug!(%id, "inserted rating");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_by_name(
        &self,
        album_name: &str,
        rating: &Value,
        review: &Value,
    ) -> StoreResult<u64> {
        let result = sqlx::query(UPDATE_BY_NAME)
            .bind(json_path(ALBUM_RATING_FIELD))
            .bind(serde_json::to_string(rating)?)
            .bind(json_path(ALBUM_REVIEW_FIELD))
            .bind(serde_json::to_string(review)?)
            .bind(json_path(ALBUM_NAME_FIELD))
            .bind(album_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// SQLite JSON path of a top-level field, e.g. `$.albumName`.
fn json_path(field: &str) -> String {
    format!("$.{field}")
}

fn parse_document(raw: &str) -> StoreResult<Document> {
    Ok(serde_json::from_str(raw)?)
}
