use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::{
    config::{MAX_ENRICH_WORKERS, MAX_HISTORY_LIMIT},
    types::UNKNOWN_RELEASE_YEAR,
};

/// Random, URL-safe value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 24];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Year part of a release date such as `1997`, `1997-05` or `1997-05-21`.
///
/// Anything that does not start with an integer before the first `-`
/// (including the `Unknown` placeholder) yields [`UNKNOWN_RELEASE_YEAR`].
pub fn parse_release_year(release_date: &str) -> i32 {
    release_date
        .split('-')
        .next()
        .map(str::trim)
        .and_then(|year| year.parse::<i32>().ok())
        .unwrap_or(UNKNOWN_RELEASE_YEAR)
}

/// Squares the raw popularity so size differences stand out in the timeline.
pub fn square_popularity(raw: u32) -> u64 {
    let raw = raw as u64;
    raw * raw
}

/// Keeps a history limit within what the endpoint accepts.
pub fn clamp_history_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_HISTORY_LIMIT)
}

/// Keeps the enrichment worker count between one and the configured ceiling.
pub fn clamp_workers(workers: usize) -> usize {
    workers.clamp(1, MAX_ENRICH_WORKERS)
}

/// `"<track> by <artists>"`, the line format fed to the reflection prompts.
pub fn describe_track(name: &str, artists: &str) -> String {
    format!("{} by {}", name, artists)
}

/// Cuts `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Display form of a release year, hiding the placeholder year.
pub fn format_year(year: i32) -> String {
    if year == UNKNOWN_RELEASE_YEAR {
        "?".to_string()
    } else {
        year.to_string()
    }
}
