use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;

use crate::{
    config::Settings,
    error::MelodyError,
    server::{PendingAuth, start_api_server},
    spotify::status_and_body,
    types::{AccessToken, TokenResponse},
    utils, warning,
};

/// Builds the Spotify authorize URL the user is sent to.
///
/// # Arguments
///
/// * `auth_url` - Authorize endpoint, e.g. `https://accounts.spotify.com/authorize`
/// * `client_id` - Application client id
/// * `redirect_uri` - Registered redirect URI the local server listens on
/// * `scope` - Space separated scopes; `user-read-recently-played` is enough
/// * `state` - Random value echoed back on the callback
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<String, MelodyError> {
    let url = reqwest::Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
        ],
    )
    .map_err(|e| MelodyError::Config(format!("invalid authorize url {}: {}", auth_url, e)))?;
    Ok(url.to_string())
}

/// Runs the browser login and returns the authorization code.
///
/// 1. Generates a random `state` and stores it in the shared pending slot
/// 2. Starts the local callback server
/// 3. Opens the authorize URL in the default browser (or prints it)
/// 4. Waits until the callback delivers a code or `auth_timeout` elapses
///
/// The code is returned rather than exchanged here so the caller can hand it
/// to the session, which consumes it exactly once.
pub async fn login(settings: &Settings) -> Result<String, MelodyError> {
    let state = utils::generate_state();
    let pending = Arc::new(Mutex::new(PendingAuth::new(state.clone())));

    let server = start_api_server(&settings.server_address, Arc::clone(&pending)).await?;

    let url = authorize_url(
        &settings.spotify_auth_url,
        &settings.spotify_client_id,
        &settings.spotify_redirect_uri,
        &settings.spotify_scope,
        &state,
    )?;

    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }

    let result = wait_for_code(Arc::clone(&pending), settings.auth_timeout).await;
    server.abort();
    result
}

/// Polls the pending slot until the callback handler fills it.
async fn wait_for_code(
    pending: Arc<Mutex<PendingAuth>>,
    max_wait: Duration,
) -> Result<String, MelodyError> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let mut lock = pending.lock().await;
        if let Some(error) = lock.error.take() {
            return Err(MelodyError::AuthFlow(error));
        }
        if let Some(code) = lock.code.take() {
            return Ok(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Err(MelodyError::AuthFlow(format!(
        "no authorization callback within {} seconds",
        max_wait.as_secs()
    )))
}

/// Exchanges an authorization code for an access token.
///
/// Sends one `authorization_code` grant to `token_url`, authenticated with
/// HTTP Basic auth from the client id and secret. No retry is attempted.
///
/// # Errors
///
/// - [`MelodyError::AuthRejected`] for any non-200 answer, including a code
///   that was already used
/// - [`MelodyError::MissingToken`] when a 200 body has no `access_token`
/// - [`MelodyError::Timeout`] / [`MelodyError::Http`] for transport failures
pub async fn exchange_code(
    client: &Client,
    token_url: &str,
    code: &str,
    redirect_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken, MelodyError> {
    let response = client
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let (status, body) = status_and_body(response).await;
        log::debug!("token endpoint rejected code with {}", status);
        return Err(MelodyError::AuthRejected { status, body });
    }

    let token = response.json::<TokenResponse>().await?;
    match token.access_token {
        Some(access_token) if !access_token.is_empty() => {
            log::debug!(
                "obtained {} token, expires in {:?}s",
                token.token_type.as_deref().unwrap_or("bearer"),
                token.expires_in
            );
            Ok(AccessToken::new(access_token))
        }
        _ => Err(MelodyError::MissingToken),
    }
}
