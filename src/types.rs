use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Placeholder used for album fields and genres when a lookup fails.
pub const UNKNOWN: &str = "Unknown";

/// Release year recorded when the release date cannot be parsed.
pub const UNKNOWN_RELEASE_YEAR: i32 = 0;

/// Bearer credential for the Spotify Web API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ---- Spotify wire types ----

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub popularity: u32,
}

fn unknown_name() -> String {
    UNKNOWN.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumResponse {
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistResponse {
    #[serde(default)]
    pub genres: Vec<String>,
}

// ---- OpenAI wire types ----

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// ---- Pipeline records ----

/// One entry of the listening history, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTrackEvent {
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album_id: String,
    pub raw_popularity: u32,
    pub played_at: Option<DateTime<Utc>>,
}

impl RawTrackEvent {
    /// All artist names joined with ", ".
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The artist genres are looked up for. Only the first credited artist
    /// is consulted, even on collaborations.
    pub fn primary_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumMetadata {
    pub release_date: String,
    pub name: String,
}

impl AlbumMetadata {
    pub fn unknown() -> Self {
        Self {
            release_date: UNKNOWN.to_string(),
            name: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistMetadata {
    pub genres: Vec<String>,
}

impl ArtistMetadata {
    pub fn unknown() -> Self {
        Self {
            genres: vec![UNKNOWN.to_string()],
        }
    }
}

/// A play event merged with its album and artist metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrack {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub release_date: String,
    pub release_year: i32,
    pub raw_popularity: u32,
    pub popularity: u64,
    pub genres: Vec<String>,
    pub played_at: Option<DateTime<Utc>>,
}

/// One point of the release-year timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub release_year: i32,
    pub popularity: u64,
    pub name: String,
}

// ---- Table rows ----

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub year: String,
    pub popularity: u32,
    pub genres: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub count: usize,
    pub share: String,
}

#[derive(Tabled)]
pub struct TimelineTableRow {
    pub year: String,
    pub popularity: u64,
    pub track: String,
}
