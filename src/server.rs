use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    Res, api,
    config::Config,
    spotify::SpotifyClient,
    store::RatingStore,
};

/// Shared by every handler. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<RatingStore>,
    pub spotify: Arc<SpotifyClient>,
}

impl AppState {
    pub fn new(store: RatingStore, spotify: SpotifyClient) -> Self {
        Self {
            store: Arc::new(store),
            spotify: Arc::new(spotify),
        }
    }
}

/// All routes of the service. Request bodies are not size-limited.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/album", get(api::list_albums).post(api::add_rating).put(api::update_rating))
        .route("/album/by-artist/{artist_name}", get(api::list_artist_albums))
        .route("/spotify/{artist_id}", get(api::artist_albums))
        .route("/spotify/artists/{artist_name}", get(api::search_artists))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Opens storage, builds the Spotify client and serves until Ctrl-C.
pub async fn start_api_server(config: Config) -> Res<()> {
    let store = RatingStore::open(&config).await?;
    let spotify = SpotifyClient::new(&config.spotify)?;
    let app = build_router(AppState::new(store, spotify));

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
