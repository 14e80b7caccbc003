//! # API Module
//!
//! HTTP handlers of the Album Ratings API, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Ratings
//!
//! - [`list_albums`] - `GET /album`, every stored rating
//! - [`list_artist_albums`] - `GET /album/by-artist/{artistName}`, 404 when the
//!   artist has no ratings
//! - [`add_rating`] - `POST /album`, stores any non-empty JSON object
//! - [`update_rating`] - `PUT /album`, sets rating and review on every album
//!   with the given name
//!
//! ### Catalog
//!
//! - [`artist_albums`] - `GET /spotify/{artistId}`, the artist's albums
//! - [`search_artists`] - `GET /spotify/artists/{artistName}`, Spotify's artist
//!   search response
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, status, version and active storage backend
//!
//! Handlers return `Result<_, ApiError>`; see [`crate::error`] for how errors
//! become status codes.

mod catalog;
mod health;
mod ratings;

pub use catalog::{artist_albums, search_artists};
pub use health::health;
pub use ratings::{add_rating, list_albums, list_artist_albums, update_rating};
