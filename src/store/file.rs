use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::StoreResult;
use crate::types::{
    ALBUM_NAME_FIELD, ALBUM_RATING_FIELD, ALBUM_REVIEW_FIELD, ARTIST_NAME_FIELD, Document,
    StoredRating,
};

/// Rating documents kept in one pretty-printed JSON file.
///
/// Nothing is held open between calls: every operation loads the file, works on
/// the loaded copy and, for writes, persists it again before returning.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> StoreResult<Vec<Document>> {
        let ratings = self.load().await?;
        Ok(ratings.into_iter().map(|r| r.document).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_by_artist(&self, artist_name: &str) -> StoreResult<Vec<Document>> {
        let ratings = self.load().await?;
        Ok(ratings
            .into_iter()
            .filter(|r| field_equals(&r.document, ARTIST_NAME_FIELD, artist_name))
            .map(|r| r.document)
            .collect())
    }

    #[instrument(skip_all)]
    pub async fn insert(&self, document: Document) -> StoreResult<String> {
        let _guard = self.write_lock.lock().await;

        let mut ratings = self.load().await?;
        let id = Uuid::new_v4().to_string();
        ratings.push(StoredRating {
            id: id.clone(),
            document,
        });
        self.persist(&ratings).await?;

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
        let _guard = self.write_lock.lock().await;

        let mut ratings = self.load().await?;
        let mut updated = 0;
        for stored in ratings
            .iter_mut()
            .filter(|r| field_equals(&r.document, ALBUM_NAME_FIELD, album_name))
        {
            stored
                .document
                .insert(ALBUM_RATING_FIELD.to_string(), rating.clone());
            stored
                .document
                .insert(ALBUM_REVIEW_FIELD.to_string(), review.clone());
            updated += 1;
        }

        if updated > 0 {
            self.persist(&ratings).await?;
        }
        Ok(updated)
    }

    /// Reads every stored rating. A file that does not exist yet is an empty store.
    async fn load(&self) -> StoreResult<Vec<StoredRating>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes to a sibling temp file first so readers never see half a file.
    async fn persist(&self, ratings: &[StoredRating]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(ratings)?;
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn field_equals(document: &Document, field: &str, expected: &str) -> bool {
    document.get(field).and_then(Value::as_str) == Some(expected)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("does/not/exist.json"));

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_insert_creates_file_with_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data/ratings.json"));

        let mut document = Document::new();
        document.insert("albumName".into(), json!("Dummy"));
        let id = store.insert(document.clone()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let stored: Vec<StoredRating> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].document, document);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(path);
        assert!(matches!(
            store.list_all().await,
            Err(crate::store::StoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("ratings.json"));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut document = Document::new();
                document.insert("albumName".into(), json!(format!("Album {i}")));
                store.insert(document).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list_all().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_update_without_match_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("ratings.json"));

        let updated = store
            .update_by_name("Nothing", &json!(1), &json!("x"))
            .await
            .unwrap();
        assert_eq!(updated, 0);
        assert!(!store.path().exists());
    }
}
