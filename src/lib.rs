//! Album Ratings API Library
//!
//! This library provides a small HTTP service that stores album ratings in a
//! document store and proxies a read-only subset of the Spotify Web API using
//! the client-credentials flow.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for ratings, catalog lookups and health checks
//! - `config` - Configuration management and environment variables
//! - `error` - HTTP error kinds and their status-code mapping
//! - `server` - Router construction and the HTTP server loop
//! - `spotify` - Spotify Web API client (token exchange and catalog reads)
//! - `store` - Rating storage adapters (SQLite and JSON file backends)
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use ratings_api::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> ratings_api::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;

/// A convenient Result type alias for startup and wiring code.
///
/// Request handling uses the typed errors in [`error`], [`store`] and
/// [`spotify`]; this alias covers the plumbing around them (binding sockets,
/// opening storage, loading configuration) where any error is fatal anyway.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Using {} backend", backend);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to confirm that the service came up and is accepting connections.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only meant for the binary's
/// startup path, never for request handling.
///
/// # Example
///
/// ```
/// error!("Invalid configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable startup issues, such as missing Spotify credentials.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
