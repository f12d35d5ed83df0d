use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    types::{EnrichedTrack, TimelinePoint, UNKNOWN_RELEASE_YEAR},
    utils,
};

/// Enriched listening history, newest play first.
///
/// Built once per fetch and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDataset {
    tracks: Vec<EnrichedTrack>,
    fetched_at: DateTime<Utc>,
}

impl TrackDataset {
    pub fn tracks(&self) -> &[EnrichedTrack] {
        &self.tracks
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wraps enriched tracks into a dataset, keeping their order.
pub fn aggregate(tracks: Vec<EnrichedTrack>) -> TrackDataset {
    TrackDataset {
        tracks,
        fetched_at: Utc::now(),
    }
}

/// Counts how often each genre label occurs across all tracks.
pub fn genre_frequency(dataset: &TrackDataset) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for genre in dataset.tracks.iter().flat_map(|t| t.genres.iter()) {
        *counts.entry(genre.clone()).or_insert(0) += 1;
    }
    counts
}

/// The `n` most frequent genres, ties broken alphabetically.
pub fn top_genres(dataset: &TrackDataset, n: usize) -> Vec<(String, usize)> {
    let mut genres: Vec<(String, usize)> = genre_frequency(dataset).into_iter().collect();
    genres.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    genres.truncate(n);
    genres
}

/// One `(release year, popularity, name)` point per track, in dataset order.
pub fn timeline_view(dataset: &TrackDataset) -> Vec<TimelinePoint> {
    dataset
        .tracks
        .iter()
        .map(|t| TimelinePoint {
            release_year: t.release_year,
            popularity: t.popularity,
            name: t.name.clone(),
        })
        .collect()
}

/// Axis bounds for the timeline: one year of padding on either side.
///
/// Tracks with [`UNKNOWN_RELEASE_YEAR`] are left out of the bounds. Returns
/// `None` when no track has a known release year.
pub fn year_axis(dataset: &TrackDataset) -> Option<(i32, i32)> {
    let years = dataset
        .tracks
        .iter()
        .map(|t| t.release_year)
        .filter(|&y| y != UNKNOWN_RELEASE_YEAR);
    let min = years.clone().min()?;
    let max = years.max()?;
    Some((min - 1, max + 1))
}

/// `"<track> by <artists>"` for every track, used as reflection input.
pub fn track_descriptions(dataset: &TrackDataset) -> Vec<String> {
    dataset
        .tracks
        .iter()
        .map(|t| utils::describe_track(&t.name, &t.artists))
        .collect()
}
