//! Configuration management for the Album Ratings API.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including the storage backend, Spotify API credentials and server
//! settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command line flags of the `serve` subcommand (highest priority)
//! 2. Environment variables
//! 3. `.env` files in the local data directory and the working directory
//! 4. Application defaults (where applicable)

use std::{env, fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::ValueEnum;
use thiserror::Error;

const APP_DIR: &str = "ratings-api";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment mode, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    /// Default `tracing` filter directive when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Mode::Development => "ratings_api=debug,tower_http=debug",
            Mode::Production => "ratings_api=info,tower_http=info",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!("unknown mode `{other}`")),
        }
    }
}

/// Which rating store adapter the service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// SQLite database with a pooled, process-wide connection
    #[default]
    Sqlite,
    /// JSON document file opened for every request
    File,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => f.write_str("sqlite"),
            Backend::File => f.write_str("file"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "file" => Ok(Backend::File),
            other => Err(format!("unknown backend `{other}`")),
        }
    }
}

/// Settings for the outbound Spotify client.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl SpotifyConfig {
    /// Both halves of the client credentials, if configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub server_addr: SocketAddr,
    pub backend: Backend,
    pub database_url: String,
    pub ratings_file: PathBuf,
    pub spotify: SpotifyConfig,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first variable whose value cannot be
    /// parsed. Unset variables fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mode = parse_or_default::<Mode>("APP_ENV", get("APP_ENV"))?;
        let backend = parse_or_default::<Backend>("RATINGS_BACKEND", get("RATINGS_BACKEND"))?;

        let server_addr = {
            let raw = get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
            SocketAddr::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                name: "SERVER_ADDRESS",
                value: raw.clone(),
                reason: e.to_string(),
            })?
        };

        let timeout = match get("SPOTIFY_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    name: "SPOTIFY_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let database_url = get("DATABASE_URL").unwrap_or_else(|| {
            format!("sqlite://{}", data_dir().join("ratings.db").display())
        });
        let ratings_file = get("RATINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("ratings.json"));

        Ok(Self {
            mode,
            server_addr,
            backend,
            database_url,
            ratings_file,
            spotify: SpotifyConfig {
                client_id: get("SPOTIFY_CLIENT_ID"),
                client_secret: get("SPOTIFY_CLIENT_SECRET"),
                api_url: get("SPOTIFY_API_URL")
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
                token_url: get("SPOTIFY_API_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
                timeout,
            },
        })
    }
}

fn parse_or_default<T>(name: &'static str, raw: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr<Err = String> + Default,
{
    match raw {
        Some(value) => value.parse().map_err(|reason| ConfigError::InvalidValue {
            name,
            value,
            reason,
        }),
        None => Ok(T::default()),
    }
}

/// Platform-specific data directory of the service.
///
/// - Linux: `~/.local/share/ratings-api`
/// - macOS: `~/Library/Application Support/ratings-api`
/// - Windows: `%LOCALAPPDATA%/ratings-api`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `.env` files.
///
/// Looks for `ratings-api/.env` in the local data directory first and then for a
/// `.env` in the working directory. Variables that are already set in the
/// process environment are never overwritten, and a missing file is not an
/// error.
///
/// # Errors
///
/// Returns an error string if an existing `.env` file cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}
