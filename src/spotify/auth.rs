use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{StatusCode, header};
use tracing::{debug, warn};

use super::{CatalogError, SpotifyClient};
use crate::types::TokenResponse;

/// Value of the `Authorization` header for the token endpoint.
///
/// ```text
/// Basic base64("<client_id>:<client_secret>")
/// ```
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

impl SpotifyClient {
    /// Exchanges the client credentials for a bearer token.
    ///
    /// Sends a form-encoded `grant_type=client_credentials` request to the
    /// token endpoint. A fresh token is requested on every call.
    ///
    /// # Returns
    ///
    /// - `Some(token)` - the `access_token` of a 200 response
    /// - `None` - credentials are not configured, the endpoint answered with
    ///   anything but 200, the body was not a token, or the request failed.
    ///   The reason is logged; nothing is returned to the caller.
    pub async fn request_access_token(&self) -> Option<String> {
        let Some((client_id, client_secret)) = &self.credentials else {
            warn!("Spotify client credentials are not configured");
            return None;
        };

        let response = self
            .http
            .post(&self.token_url)
            .header(
                header::AUTHORIZATION,
                basic_auth_header(client_id, client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token request failed");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "token endpoint rejected client credentials");
            return None;
        }

        match response.json::<TokenResponse>().await {
            Ok(token) => {
                debug!(expires_in = ?token.expires_in, "obtained Spotify access token");
                Some(token.access_token)
            }
            Err(e) => {
                warn!(error = %e, "token endpoint returned an unexpected body");
                None
            }
        }
    }

    /// Like [`request_access_token`](Self::request_access_token), but a missing
    /// token is an error so callers can stop before touching the catalog.
    pub async fn bearer_token(&self) -> Result<String, CatalogError> {
        self.request_access_token().await.ok_or(CatalogError::Auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        // "id:secret"
        assert_eq!(basic_auth_header("id", "secret"), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn test_basic_auth_header_keeps_colons_in_secret() {
        let header = basic_auth_header("client", "se:cret");
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"client:se:cret");
    }
}
