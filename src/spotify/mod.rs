//! # Spotify Integration Module
//!
//! Everything that talks to Spotify lives here:
//!
//! - [`auth`] builds the authorize URL, drives the browser login and trades the
//!   authorization code for an access token (client secret + HTTP Basic auth).
//! - [`history`] reads the user's recently played tracks.
//! - [`metadata`] looks up album and artist details for each track and merges
//!   them into [`EnrichedTrack`](crate::types::EnrichedTrack) records.
//!
//! ## Endpoints
//!
//! - `POST /api/token` - authorization code exchange
//! - `GET /me/player/recently-played` - listening history (single page)
//! - `GET /albums/{id}` - release date and album name
//! - `GET /artists/{id}` - genre list
//!
//! Every call goes through a client built by [`http_client`], which applies a
//! bounded timeout so a stalled request surfaces as
//! [`MelodyError::Timeout`] instead of blocking the session. There is no retry
//! logic: each operation issues its requests once and reports what came back.

pub mod auth;
pub mod history;
pub mod metadata;

use std::time::Duration;

use reqwest::{Client, Response, header};

use crate::error::{MelodyError, body_snippet};

/// Builds the shared HTTP client with a per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, MelodyError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
        .map_err(|e| MelodyError::Http(format!("build client: {e}")))
}

/// Joins an API base URL and a path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Splits a response into its status code and a body snippet for errors.
pub(crate) async fn status_and_body(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body_snippet(&body))
}
