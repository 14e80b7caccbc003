//! # Spotify Integration Module
//!
//! A thin client for the two Spotify Web API reads the service proxies. It does
//! not act on behalf of a user: every request authenticates the application
//! itself with the OAuth 2.0 client-credentials grant.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (crate::api::catalog)
//!          ↓
//! SpotifyClient
//!     ├── Credential exchange (POST /api/token, Basic auth)
//!     └── Catalog reads (GET /artists/{id}/albums, GET /search)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Token handling
//!
//! A token is requested for every catalog call and thrown away afterwards; there
//! is no cache and no refresh. When the exchange fails the catalog is not
//! contacted at all and the caller gets [`CatalogError::Auth`].
//!
//! ## Timeouts
//!
//! The underlying `reqwest` client carries the timeout from
//! [`SpotifyConfig::timeout`](crate::config::SpotifyConfig), so a stalled
//! upstream fails the request instead of holding it forever.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials exchange
//! - `GET /artists/{id}/albums?limit=30&offset=0` - an artist's albums
//! - `GET /search?q=artist:{name}&type=artist` - artist search

pub mod auth;
pub mod catalog;

use std::fmt;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::config::SpotifyConfig;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("could not obtain a Spotify access token")]
    Auth,
    #[error("Spotify responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Spotify response has no `items` array")]
    MissingItems,
    #[error("invalid Spotify API url: {0}")]
    BaseUrl(String),
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Spotify Web API client using the client-credentials flow.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    credentials: Option<(String, String)>,
    api_url: Url,
    token_url: String,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.api_url.as_str())
            .field("token_url", &self.token_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

impl SpotifyClient {
    /// Builds the client and its HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Fails if the API base URL does not parse or cannot carry path segments,
    /// or if the TLS backend cannot be initialised.
    pub fn new(config: &SpotifyConfig) -> Result<Self, CatalogError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| CatalogError::BaseUrl(format!("{}: {e}", config.api_url)))?;
        if api_url.cannot_be_a_base() {
            return Err(CatalogError::BaseUrl(config.api_url.clone()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            credentials: config
                .credentials()
                .map(|(id, secret)| (id.to_string(), secret.to_string())),
            api_url,
            token_url: config.token_url.clone(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// `api_url` with `segments` appended, each percent-encoded as needed.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, CatalogError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::BaseUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(api_url: &str) -> SpotifyConfig {
        SpotifyConfig {
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            api_url: api_url.into(),
            token_url: "http://127.0.0.1:1/api/token".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = SpotifyClient::new(&config("https://api.spotify.com/v1")).unwrap();
        let url = client.endpoint(["artists", "a/b c?", "albums"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.spotify.com/v1/artists/a%2Fb%20c%3F/albums"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let client = SpotifyClient::new(&config("https://api.spotify.com/v1/")).unwrap();
        let url = client.endpoint(["search"]).unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/search");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            SpotifyClient::new(&config("not a url")),
            Err(CatalogError::BaseUrl(_))
        ));
        assert!(matches!(
            SpotifyClient::new(&config("mailto:someone@example.com")),
            Err(CatalogError::BaseUrl(_))
        ));
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = config("https://api.spotify.com/v1");
        config.client_secret = None;
        assert!(!SpotifyClient::new(&config).unwrap().has_credentials());
    }
}
