use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{instrument, warn};

use super::{CatalogError, SpotifyClient};

/// Albums fetched per artist lookup. The proxy never pages further.
pub const ALBUM_PAGE_LIMIT: u32 = 30;

impl SpotifyClient {
    /// Fetches the first page of an artist's albums.
    ///
    /// Returns only the `items` array of the response; paging metadata is
    /// dropped.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Auth`] if no access token could be obtained
    /// - [`CatalogError::Status`] for any non-200 answer from Spotify
    /// - [`CatalogError::MissingItems`] if the body has no `items` array
    #[instrument(skip(self))]
    pub async fn artist_albums(&self, artist_id: &str) -> Result<Value, CatalogError> {
        let mut url = self.endpoint(["artists", artist_id, "albums"])?;
        url.query_pairs_mut()
            .append_pair("limit", &ALBUM_PAGE_LIMIT.to_string())
            .append_pair("offset", "0");

        let mut body = self.get_json(url).await?;
        match body.get_mut("items").map(Value::take) {
            Some(items @ Value::Array(_)) => Ok(items),
            _ => Err(CatalogError::MissingItems),
        }
    }

    /// Searches artists by name and returns Spotify's response untouched.
    #[instrument(skip(self))]
    pub async fn search_artists(&self, artist_name: &str) -> Result<Value, CatalogError> {
        let mut url = self.endpoint(["search"])?;
        url.query_pairs_mut()
            .append_pair("q", &format!("artist:{artist_name}"))
            .append_pair("type", "artist");

        self.get_json(url).await
    }

    async fn get_json(&self, url: Url) -> Result<Value, CatalogError> {
        let token = self.bearer_token().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Spotify catalog request failed");
            return Err(CatalogError::Status { status, body });
        }

        Ok(response.json::<Value>().await?)
    }
}
