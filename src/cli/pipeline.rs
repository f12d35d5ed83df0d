use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    config::Settings,
    error::MelodyError,
    info,
    management::{self, Session, TrackDataset},
    openai::{self, PromptKind},
    spotify, success,
};

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

fn counter(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_message(message);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

/// Logs in through the browser and stores a fresh access token in the session.
///
/// A new login always wipes the previous token and dataset first. On failure
/// the session is left without a token.
pub async fn authenticate(
    session: &mut Session,
    settings: &Settings,
    client: &Client,
) -> Result<(), MelodyError> {
    session.reset();

    info!("Waiting for Spotify authorization in your browser...");
    let code = spotify::auth::login(settings).await?;
    exchange_into_session(session, settings, client, code).await
}

/// Trades an authorization code for a token and stores it in the session.
///
/// The code is consumed even when the exchange is rejected.
pub async fn exchange_into_session(
    session: &mut Session,
    settings: &Settings,
    client: &Client,
    code: String,
) -> Result<(), MelodyError> {
    session.begin_login(code);

    let code = session
        .take_auth_code()
        .ok_or_else(|| MelodyError::AuthFlow("authorization code already used".to_string()))?;

    let pb = spinner("Exchanging authorization code...");
    let token = spotify::auth::exchange_code(
        client,
        &settings.spotify_token_url,
        &code,
        &settings.spotify_redirect_uri,
        &settings.spotify_client_id,
        &settings.spotify_client_secret,
    )
    .await;
    pb.finish_and_clear();

    session.set_token(token?);
    success!("Authentication successful!");
    Ok(())
}

/// Fetches, enriches and aggregates the listening history into the session.
pub async fn refresh_dataset(
    session: &mut Session,
    settings: &Settings,
    client: &Client,
    limit: u32,
    workers: usize,
) -> Result<(), MelodyError> {
    let token = session
        .token()
        .cloned()
        .ok_or_else(|| MelodyError::AuthFlow("not logged in".to_string()))?;

    let pb = spinner("Fetching your recently played tracks...");
    let events =
        spotify::history::fetch_recent_tracks(client, &settings.spotify_api_url, &token, limit)
            .await;
    pb.finish_and_clear();
    let events = events?;

    let pb = counter("Looking up albums and genres");
    let tracks = spotify::metadata::enrich_all(
        client,
        &settings.spotify_api_url,
        &token,
        events,
        workers,
        &pb,
    )
    .await;
    pb.finish_and_clear();

    let dataset = management::aggregate(tracks);
    success!("Fetched {} tracks!", dataset.len());
    session.set_dataset(dataset);
    Ok(())
}

/// Requests one reflection on the dataset.
pub async fn reflect(
    dataset: &TrackDataset,
    settings: &Settings,
    client: &Client,
    kind: PromptKind,
) -> Result<String, MelodyError> {
    let api_key = settings.require_openai_key()?;
    let descriptions = management::track_descriptions(dataset);

    let pb = spinner(kind.progress_message());
    let text = openai::generate(
        client,
        &settings.openai_api_url,
        api_key,
        &settings.openai_model,
        kind,
        &descriptions,
    )
    .await;
    pb.finish_and_clear();
    text
}
