//! MelodyMap Library
//!
//! Maps a Spotify listening history: logs the user in, reads their recently
//! played tracks, enriches each one with album and genre details, and offers
//! tables plus language-model reflections (a poem, a travel idea, some
//! history) built from the result.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from `.env` and environment variables
//! - `error` - Error taxonomy shared by all components
//! - `management` - Session state and dataset aggregation
//! - `openai` - Reflection prompts and the chat completions client
//! - `server` - Local HTTP server receiving the OAuth redirect
//! - `spotify` - Spotify Web API client (token exchange, history, metadata)
//! - `types` - Data structures and type definitions
//! - `utils` - Small helpers shared across modules
//!
//! # Example
//!
//! ```
//! use melodymap::{config, management, spotify};
//!
//! #[tokio::main]
//! async fn main() -> melodymap::Result<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let client = spotify::http_client(settings.http_timeout)?;
//!     // spotify::history::fetch_recent_tracks(&client, ...)
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod openai;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::MelodyError;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, MelodyError>;

/// Prints a status line with a blue bullet.
///
/// ```
/// info!("Waiting for Spotify authorization...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
///
/// ```
/// success!("Fetched {} tracks!", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red exclamation mark and exits with code 1.
///
/// Only for fatal errors in the binary; library code returns
/// [`MelodyError`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark.
///
/// Used for recoverable problems: a failed reflection, a login the user
/// can retry, a lookup that fell back to placeholders.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
