#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode, header},
    routing::{get, post},
};
use ratings_api::{
    config::SpotifyConfig,
    server::{AppState, build_router},
    spotify::SpotifyClient,
    store::{FileStore, RatingStore, SqliteStore},
};
use serde_json::{Value, json};

pub const CLIENT_ID: &str = "id";
pub const CLIENT_SECRET: &str = "secret";
pub const ACCESS_TOKEN: &str = "test-token";

/// Test helper: Spotify settings pointing at `base` (a mock server or nowhere)
pub fn spotify_config(base: &str) -> SpotifyConfig {
    SpotifyConfig {
        client_id: Some(CLIENT_ID.to_string()),
        client_secret: Some(CLIENT_SECRET.to_string()),
        api_url: format!("{base}/v1"),
        token_url: format!("{base}/api/token"),
        timeout: Duration::from_secs(1),
    }
}

/// Test helper: Router over an in-memory SQLite store; Spotify is unreachable
pub async fn sqlite_app() -> Router {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    app_with(RatingStore::Sqlite(store), spotify_config("http://127.0.0.1:9"))
}

/// Test helper: Router over a JSON file store inside `dir`
pub fn file_app(dir: &tempfile::TempDir) -> Router {
    let store = FileStore::new(dir.path().join("ratings.json"));
    app_with(RatingStore::File(store), spotify_config("http://127.0.0.1:9"))
}

pub fn app_with(store: RatingStore, spotify: SpotifyConfig) -> Router {
    let spotify = SpotifyClient::new(&spotify).unwrap();
    build_router(AppState::new(store, spotify))
}

/// Test helper: Create request, with a JSON body when given one
pub fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Test helper: Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[derive(Default)]
pub struct MockState {
    pub reject_credentials: bool,
    pub token_calls: AtomicUsize,
    pub catalog_calls: AtomicUsize,
    pub last_query: Mutex<HashMap<String, String>>,
}

/// An in-process stand-in for the Spotify token and catalog endpoints.
pub struct MockSpotify {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockSpotify {
    pub async fn start(reject_credentials: bool) -> Self {
        let state = Arc::new(MockState {
            reject_credentials,
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/artists/{id}/albums", get(albums))
            .route("/v1/search", get(search))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn catalog_calls(&self) -> usize {
        self.state.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.state.last_query.lock().unwrap().clone()
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.token_calls.fetch_add(1, Ordering::SeqCst);

    // base64("id:secret")
    let authorized = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
        == Some("Basic aWQ6c2VjcmV0");
    let grant_ok = form.get("grant_type").map(String::as_str) == Some("client_credentials");

    if state.reject_credentials || !authorized || !grant_ok {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_client"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
        })),
    )
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {ACCESS_TOKEN}")[..])
}

async fn albums(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.catalog_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = query;

    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})));
    }

    match id.as_str() {
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Resource not found"}})),
        ),
        "no-items" => (StatusCode::OK, Json(json!({"total": 0}))),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, Json(json!({"items": []})))
        }
        _ => (
            StatusCode::OK,
            Json(json!({
                "href": format!("https://api.spotify.com/v1/artists/{id}/albums"),
                "limit": 30,
                "offset": 0,
                "total": 3,
                "items": [
                    {"id": "a1", "name": "Pablo Honey", "album_type": "album"},
                    {"id": "a2", "name": "The Bends", "album_type": "album"},
                    {"id": "a3", "name": "OK Computer", "album_type": "album"},
                ],
            })),
        ),
    }
}

async fn search(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.catalog_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = query.clone();

    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "artists": {
                "href": "https://api.spotify.com/v1/search",
                "items": [{"id": "r1", "name": query.get("q")}],
                "total": 1,
            }
        })),
    )
}
