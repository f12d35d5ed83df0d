//! Configuration management for MelodyMap.
//!
//! Configuration is read once at process start from environment variables and
//! an optional `.env` file, then handed around as a typed [`Settings`] value.
//! The pipeline components never read the environment themselves; they take
//! the credentials and URLs they need as plain parameters.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults for endpoints and tuning knobs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::MelodyError;

pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-recently-played";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8501/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8501";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Largest page the recently played endpoint serves.
pub const MAX_HISTORY_LIMIT: u32 = 50;
pub const DEFAULT_ENRICH_WORKERS: usize = 4;
pub const MAX_ENRICH_WORKERS: usize = 16;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from `.env` in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/melodymap/.env`
/// - macOS: `~/Library/Application Support/melodymap/.env`
/// - Windows: `%LOCALAPPDATA%/melodymap/.env`
///
/// The directory is created when missing. A missing `.env` file is not an
/// error, since every value can also come from the process environment.
pub async fn load_env() -> Result<(), MelodyError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| {
            MelodyError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        log::debug!("loaded environment from {}", path.display());
    }
    Ok(())
}

/// Path of the `.env` file this application reads.
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("melodymap/.env");
    path
}

/// Runtime settings for one process.
#[derive(Clone)]
pub struct Settings {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub spotify_scope: String,
    pub server_address: String,
    /// Optional: reflections are unavailable without it.
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub history_limit: u32,
    pub enrich_workers: usize,
    pub http_timeout: Duration,
    pub auth_timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_client_secret", &"<redacted>")
            .field("spotify_redirect_uri", &self.spotify_redirect_uri)
            .field("spotify_api_url", &self.spotify_api_url)
            .field("server_address", &self.server_address)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_model", &self.openai_model)
            .field("history_limit", &self.history_limit)
            .field("enrich_workers", &self.enrich_workers)
            .finish()
    }
}

impl Settings {
    /// Builds settings from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns [`MelodyError::Config`] when `SPOTIFY_CLIENT_ID` or
    /// `SPOTIFY_CLIENT_SECRET` is unset, or when a numeric knob does not parse.
    pub fn from_env() -> Result<Self, MelodyError> {
        Ok(Self {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: optional("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            spotify_auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            spotify_token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            spotify_api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            spotify_scope: optional("SPOTIFY_SCOPE", DEFAULT_SPOTIFY_SCOPE),
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_api_url: optional("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            openai_model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            history_limit: numeric("HISTORY_LIMIT", MAX_HISTORY_LIMIT)?,
            enrich_workers: numeric("ENRICH_WORKERS", DEFAULT_ENRICH_WORKERS)?,
            http_timeout: Duration::from_secs(numeric(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            auth_timeout: Duration::from_secs(numeric(
                "AUTH_TIMEOUT_SECS",
                DEFAULT_AUTH_TIMEOUT_SECS,
            )?),
        })
    }

    /// Returns the OpenAI key or a config error explaining how to set it.
    pub fn require_openai_key(&self) -> Result<&str, MelodyError> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            MelodyError::Config(format!(
                "OPENAI_API_KEY must be set (environment or {})",
                env_path().display()
            ))
        })
    }
}

fn required(key: &str) -> Result<String, MelodyError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MelodyError::Config(format!("{} must be set", key))),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn numeric<T: FromStr>(key: &str, default: T) -> Result<T, MelodyError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| MelodyError::Config(format!("{} must be a number, got {:?}", key, raw))),
        _ => Ok(default),
    }
}
