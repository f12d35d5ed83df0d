//! Error types for MelodyMap.
//!
//! Every network-facing component returns [`MelodyError`]. The variants mirror
//! the places the pipeline can stop: the token exchange, the history fetch and
//! the text generation each have their own variant carrying the HTTP status and
//! a snippet of the response body, so the CLI can tell the user what happened
//! and whether logging in again will help.

use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnostics.
pub const BODY_SNIPPET_LEN: usize = 512;

#[derive(Error, Debug)]
pub enum MelodyError {
    /// The token endpoint answered with something other than 200.
    ///
    /// Usually the authorization code was already used or has expired; the
    /// caller should start a new login.
    #[error("authorization rejected ({status}): {body}")]
    AuthRejected { status: u16, body: String },

    /// The token endpoint answered 200 but the body had no `access_token`.
    #[error("token response did not contain an access token")]
    MissingToken,

    /// The recently played endpoint answered with something other than 200.
    #[error("failed to fetch listening history ({status}): {body}")]
    FetchError { status: u16, body: String },

    /// The text-generation endpoint failed or returned no usable completion.
    #[error("text generation failed ({status}): {body}")]
    GenerationError { status: u16, body: String },

    /// A request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    /// The browser login could not be completed (callback never arrived,
    /// state mismatch, server could not bind).
    #[error("login failed: {0}")]
    AuthFlow(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MelodyError {
    /// HTTP status attached to the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MelodyError::AuthRejected { status, .. }
            | MelodyError::FetchError { status, .. }
            | MelodyError::GenerationError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MelodyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MelodyError::Timeout(e.to_string())
        } else if e.is_decode() {
            MelodyError::Parse(e.to_string())
        } else {
            MelodyError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for MelodyError {
    fn from(e: serde_json::Error) -> Self {
        MelodyError::Parse(e.to_string())
    }
}

/// Shortens a response body to [`BODY_SNIPPET_LEN`] characters.
pub fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_LEN {
        return trimmed.to_string();
    }
    let mut snippet: String = trimmed.chars().take(BODY_SNIPPET_LEN).collect();
    snippet.push('…');
    snippet
}
