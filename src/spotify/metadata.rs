use std::sync::Arc;

use indicatif::ProgressBar;
use reqwest::{Client, StatusCode};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::MelodyError,
    spotify::{endpoint, status_and_body},
    types::{
        AccessToken, AlbumMetadata, AlbumResponse, ArtistMetadata, ArtistResponse, EnrichedTrack,
        RawTrackEvent, UNKNOWN,
    },
    utils, warning,
};

/// Looks up the release date and display name of an album.
pub async fn fetch_album(
    client: &Client,
    api_url: &str,
    token: &AccessToken,
    album_id: &str,
) -> Result<AlbumMetadata, MelodyError> {
    if album_id.is_empty() {
        return Err(MelodyError::Parse("track has no album id".to_string()));
    }

    let response = client
        .get(endpoint(api_url, &format!("albums/{}", album_id)))
        .bearer_auth(token.as_str())
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let (status, body) = status_and_body(response).await;
        return Err(MelodyError::FetchError { status, body });
    }

    let album = response.json::<AlbumResponse>().await?;
    Ok(AlbumMetadata {
        release_date: album.release_date.unwrap_or_else(|| UNKNOWN.to_string()),
        name: album.name.unwrap_or_else(|| UNKNOWN.to_string()),
    })
}

/// Looks up the genre labels of an artist.
pub async fn fetch_artist(
    client: &Client,
    api_url: &str,
    token: &AccessToken,
    artist_id: &str,
) -> Result<ArtistMetadata, MelodyError> {
    if artist_id.is_empty() {
        return Err(MelodyError::Parse("track has no artist id".to_string()));
    }

    let response = client
        .get(endpoint(api_url, &format!("artists/{}", artist_id)))
        .bearer_auth(token.as_str())
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let (status, body) = status_and_body(response).await;
        return Err(MelodyError::FetchError { status, body });
    }

    let artist = response.json::<ArtistResponse>().await?;
    Ok(ArtistMetadata {
        genres: artist.genres,
    })
}

/// Enriches one play event with album and genre details.
///
/// The album and primary-artist lookups run concurrently. Neither can fail the
/// caller: a failed album lookup leaves album name and release date as
/// `Unknown`, a failed artist lookup (or an artist without genres) leaves the
/// genre list as `["Unknown"]`.
pub async fn enrich(
    client: &Client,
    api_url: &str,
    token: &AccessToken,
    event: RawTrackEvent,
) -> EnrichedTrack {
    let artist_id = event
        .primary_artist()
        .map(|a| a.id.clone())
        .unwrap_or_default();

    let (album, artist) = tokio::join!(
        fetch_album(client, api_url, token, &event.album_id),
        fetch_artist(client, api_url, token, &artist_id),
    );

    let album = album.unwrap_or_else(|e| {
        log::warn!("album lookup for {:?} failed: {}", event.name, e);
        AlbumMetadata::unknown()
    });
    let artist = match artist {
        Ok(meta) if !meta.genres.is_empty() => meta,
        Ok(_) => ArtistMetadata::unknown(),
        Err(e) => {
            log::warn!("artist lookup for {:?} failed: {}", event.name, e);
            ArtistMetadata::unknown()
        }
    };

    merge(event, album, artist)
}

/// Combines a play event with its looked-up metadata and derives the year and
/// squared popularity.
pub fn merge(event: RawTrackEvent, album: AlbumMetadata, artist: ArtistMetadata) -> EnrichedTrack {
    let artists = event.artist_names();
    EnrichedTrack {
        release_year: utils::parse_release_year(&album.release_date),
        popularity: utils::square_popularity(event.raw_popularity),
        raw_popularity: event.raw_popularity,
        name: event.name,
        artists,
        album: album.name,
        release_date: album.release_date,
        genres: artist.genres,
        played_at: event.played_at,
    }
}

/// Enriches every event using at most `workers` concurrent tracks.
///
/// Tasks may finish in any order; each result is written back to the slot of
/// its input index, so the output order always matches `events`.
pub async fn enrich_all(
    client: &Client,
    api_url: &str,
    token: &AccessToken,
    events: Vec<RawTrackEvent>,
    workers: usize,
    progress: &ProgressBar,
) -> Vec<EnrichedTrack> {
    let permits = Arc::new(Semaphore::new(utils::clamp_workers(workers)));
    let mut slots: Vec<Option<EnrichedTrack>> = vec![None; events.len()];
    let mut tasks = JoinSet::new();

    progress.set_length(events.len() as u64);

    for (index, event) in events.iter().cloned().enumerate() {
        let permits = Arc::clone(&permits);
        let client = client.clone();
        let api_url = api_url.to_string();
        let token = token.clone();

        tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits.
            let _permit = permits.acquire_owned().await.ok();
            (index, enrich(&client, &api_url, &token, event).await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, track)) => slots[index] = Some(track),
            Err(e) => warning!("Enrichment task failed: {}", e),
        }
        progress.inc(1);
    }

    slots
        .into_iter()
        .zip(events)
        .map(|(slot, event)| {
            slot.unwrap_or_else(|| merge(event, AlbumMetadata::unknown(), ArtistMetadata::unknown()))
        })
        .collect()
}
