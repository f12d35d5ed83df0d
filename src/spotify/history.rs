use reqwest::{Client, StatusCode};

use crate::{
    error::MelodyError,
    spotify::{endpoint, status_and_body},
    types::{AccessToken, PlayHistoryItem, RawTrackEvent, RecentlyPlayedResponse},
    utils,
};

/// Retrieves the user's most recently played tracks.
///
/// Issues a single `GET /me/player/recently-played?limit={limit}`; the limit is
/// clamped to `1..=50` since the endpoint serves one page only. The order of
/// the returned events is the endpoint's order (newest first).
///
/// # Errors
///
/// - [`MelodyError::FetchError`] for any non-200 answer; nothing is returned
///   in that case, not even a partial page
/// - [`MelodyError::Timeout`], [`MelodyError::Http`], [`MelodyError::Parse`]
///   for transport and decoding failures
pub async fn fetch_recent_tracks(
    client: &Client,
    api_url: &str,
    token: &AccessToken,
    limit: u32,
) -> Result<Vec<RawTrackEvent>, MelodyError> {
    let limit = utils::clamp_history_limit(limit);
    let response = client
        .get(endpoint(api_url, "me/player/recently-played"))
        .bearer_auth(token.as_str())
        .query(&[("limit", limit)])
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let (status, body) = status_and_body(response).await;
        return Err(MelodyError::FetchError { status, body });
    }

    let history = response.json::<RecentlyPlayedResponse>().await?;
    let events: Vec<RawTrackEvent> = history.items.into_iter().filter_map(to_event).collect();
    log::debug!("fetched {} recently played tracks", events.len());

    Ok(events)
}

/// Flattens a history item into a play event. Items without a track object
/// (local files removed from the catalogue, podcasts) are dropped.
fn to_event(item: PlayHistoryItem) -> Option<RawTrackEvent> {
    let track = item.track?;
    Some(RawTrackEvent {
        name: track.name,
        artists: track.artists,
        album_id: track.album.map(|a| a.id).unwrap_or_default(),
        raw_popularity: track.popularity,
        played_at: item.played_at,
    })
}
