use std::time::Duration;

use indicatif::ProgressBar;
use mockito::Matcher;
use reqwest::Client;

use melodymap::MelodyError;
use melodymap::spotify::{auth, history, http_client, metadata};
use melodymap::types::{AccessToken, ArtistRef, RawTrackEvent, UNKNOWN, UNKNOWN_RELEASE_YEAR};

const CLIENT_ID: &str = "client-id";
const CLIENT_SECRET: &str = "client-secret";
// base64("client-id:client-secret")
const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";
const REDIRECT_URI: &str = "http://127.0.0.1:8501/callback";

fn client() -> Client {
    http_client(Duration::from_secs(5)).unwrap()
}

fn token() -> AccessToken {
    AccessToken::new("test-token")
}

fn create_test_event(name: &str, album_id: &str, artist_id: &str) -> RawTrackEvent {
    RawTrackEvent {
        name: name.to_string(),
        artists: vec![ArtistRef {
            name: format!("{} artist", name),
            id: artist_id.to_string(),
        }],
        album_id: album_id.to_string(),
        raw_popularity: 50,
        played_at: None,
    }
}

#[tokio::test]
async fn test_exchange_code_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/token")
        .match_header("authorization", BASIC_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "auth-code".into()),
            Matcher::UrlEncoded("redirect_uri".into(), REDIRECT_URI.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"abc123","token_type":"Bearer","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;

    let token = auth::exchange_code(
        &client(),
        &format!("{}/api/token", server.url()),
        "auth-code",
        REDIRECT_URI,
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .await
    .unwrap();

    assert_eq!(token.as_str(), "abc123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_exchange_code_rejected_with_401() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client"}"#)
        .expect(1)
        .create_async()
        .await;

    let result = auth::exchange_code(
        &client(),
        &format!("{}/api/token", server.url()),
        "auth-code",
        REDIRECT_URI,
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .await;

    match result {
        Err(MelodyError::AuthRejected { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected AuthRejected, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_exchange_code_used_twice_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#)
        .create_async()
        .await;

    let result = auth::exchange_code(
        &client(),
        &format!("{}/api/token", server.url()),
        "already-used",
        REDIRECT_URI,
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .await;

    assert!(matches!(
        result,
        Err(MelodyError::AuthRejected { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_exchange_code_missing_token() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token_type":"Bearer"}"#)
        .create_async()
        .await;

    let result = auth::exchange_code(
        &client(),
        &format!("{}/api/token", server.url()),
        "auth-code",
        REDIRECT_URI,
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .await;

    assert!(matches!(result, Err(MelodyError::MissingToken)));
}

#[tokio::test]
async fn test_exchange_code_times_out() {
    // accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = http_client(Duration::from_millis(200)).unwrap();
    let result = auth::exchange_code(
        &client,
        &format!("http://{}/api/token", addr),
        "auth-code",
        REDIRECT_URI,
        CLIENT_ID,
        CLIENT_SECRET,
    )
    .await;

    assert!(matches!(result, Err(MelodyError::Timeout(_))));
}

#[test]
fn test_authorize_url() {
    let url = auth::authorize_url(
        "https://accounts.spotify.com/authorize",
        CLIENT_ID,
        REDIRECT_URI,
        "user-read-recently-played",
        "xyz",
    )
    .unwrap();

    let parsed = reqwest::Url::parse(&url).unwrap();
    let params: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert_eq!(parsed.path(), "/authorize");
    assert!(params.contains(&("client_id".into(), CLIENT_ID.into())));
    assert!(params.contains(&("response_type".into(), "code".into())));
    assert!(params.contains(&("redirect_uri".into(), REDIRECT_URI.into())));
    assert!(params.contains(&("scope".into(), "user-read-recently-played".into())));
    assert!(params.contains(&("state".into(), "xyz".into())));
}

#[tokio::test]
async fn test_fetch_recent_tracks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "items": [
                    {
                        "track": {
                            "name": "Song A",
                            "artists": [{"name": "Artist X", "id": "x"}, {"name": "Artist Z", "id": "z"}],
                            "album": {"id": "album-a"},
                            "popularity": 61
                        },
                        "played_at": "2024-03-01T10:15:00.000Z"
                    },
                    {
                        "track": {
                            "name": "Song B",
                            "artists": [{"name": "Artist Y", "id": "y"}],
                            "album": {"id": "album-b"},
                            "popularity": 12
                        },
                        "played_at": "2024-03-01T10:11:00.000Z"
                    }
                ],
                "limit": 50
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let events = history::fetch_recent_tracks(&client(), &server.url(), &token(), 50)
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "Song A");
    assert_eq!(events[0].album_id, "album-a");
    assert_eq!(events[0].raw_popularity, 61);
    assert_eq!(events[0].artist_names(), "Artist X, Artist Z");
    assert_eq!(events[0].primary_artist().unwrap().id, "x");
    assert!(events[0].played_at.is_some());
    assert_eq!(events[1].name, "Song B");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_recent_tracks_clamps_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items": []}"#)
        .expect(1)
        .create_async()
        .await;

    history::fetch_recent_tracks(&client(), &server.url(), &token(), 200)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_recent_tracks_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let events = history::fetch_recent_tracks(&client(), &server.url(), &token(), 50)
        .await
        .unwrap();
    assert!(events.is_empty());

    let tracks =
        metadata::enrich_all(&client(), &server.url(), &token(), events, 4, &ProgressBar::hidden())
            .await;
    let dataset = melodymap::management::aggregate(tracks);

    assert!(dataset.is_empty());
    assert!(melodymap::management::genre_frequency(&dataset).is_empty());
    assert!(melodymap::management::timeline_view(&dataset).is_empty());
}

#[tokio::test]
async fn test_fetch_recent_tracks_skips_items_without_track() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [
                {"track": null, "played_at": "2024-03-01T10:15:00Z"},
                {"track": {"name": "Song B", "artists": [], "album": {"id": "b"}, "popularity": 3}}
            ]}"#,
        )
        .create_async()
        .await;

    let events = history::fetch_recent_tracks(&client(), &server.url(), &token(), 50)
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Song B");
    assert!(events[0].primary_artist().is_none());
}

#[tokio::test]
async fn test_fetch_recent_tracks_missing_names_fall_back() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [
                {"track": {"artists": [{"id": "x"}], "album": {"id": "a"}, "popularity": 1}},
                {"track": {"name": "Song B", "artists": [], "album": {"id": "b"}, "popularity": 3}}
            ]}"#,
        )
        .create_async()
        .await;

    let events = history::fetch_recent_tracks(&client(), &server.url(), &token(), 50)
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, UNKNOWN);
    assert_eq!(events[0].artists[0].name, UNKNOWN);
    assert_eq!(events[0].artists[0].id, "x");
    assert_eq!(events[1].name, "Song B");
}

#[tokio::test]
async fn test_fetch_recent_tracks_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/me/player/recently-played")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .create_async()
        .await;

    let result = history::fetch_recent_tracks(&client(), &server.url(), &token(), 50).await;

    match result {
        Err(MelodyError::FetchError { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("expired"));
        }
        other => panic!("expected FetchError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enrich_success() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/albums/album-a")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "Album A", "release_date": "1991-09-24", "release_date_precision": "day"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/artists/artist-x")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "Artist X", "genres": ["grunge", "rock"]}"#)
        .create_async()
        .await;

    let track = metadata::enrich(
        &client(),
        &server.url(),
        &token(),
        create_test_event("Song A", "album-a", "artist-x"),
    )
    .await;

    assert_eq!(track.album, "Album A");
    assert_eq!(track.release_date, "1991-09-24");
    assert_eq!(track.release_year, 1991);
    assert_eq!(track.popularity, 2500);
    assert_eq!(track.genres, vec!["grunge".to_string(), "rock".to_string()]);
}

#[tokio::test]
async fn test_enrich_album_404_uses_sentinels() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/albums/missing")
        .with_status(404)
        .with_body(r#"{"error":{"status":404,"message":"Not found"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/artists/artist-x")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"genres": ["jazz"]}"#)
        .create_async()
        .await;

    let track = metadata::enrich(
        &client(),
        &server.url(),
        &token(),
        create_test_event("Song A", "missing", "artist-x"),
    )
    .await;

    assert_eq!(track.album, UNKNOWN);
    assert_eq!(track.release_date, UNKNOWN);
    assert_eq!(track.release_year, UNKNOWN_RELEASE_YEAR);
    assert_eq!(track.genres, vec!["jazz".to_string()]);
}

#[tokio::test]
async fn test_enrich_artist_failure_uses_sentinel_genres() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/albums/album-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "Album A", "release_date": "2012"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/artists/artist-x")
        .with_status(500)
        .create_async()
        .await;

    let track = metadata::enrich(
        &client(),
        &server.url(),
        &token(),
        create_test_event("Song A", "album-a", "artist-x"),
    )
    .await;

    assert_eq!(track.release_year, 2012);
    assert_eq!(track.genres, vec![UNKNOWN.to_string()]);
}

#[tokio::test]
async fn test_enrich_artist_without_genres_uses_sentinel() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/albums/album-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "Album A", "release_date": "2012"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/artists/artist-x")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"genres": []}"#)
        .create_async()
        .await;

    let track = metadata::enrich(
        &client(),
        &server.url(),
        &token(),
        create_test_event("Song A", "album-a", "artist-x"),
    )
    .await;

    assert_eq!(track.genres, vec![UNKNOWN.to_string()]);
}

#[tokio::test]
async fn test_enrich_looks_up_first_artist_only() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/albums/album-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "Album A", "release_date": "2012"}"#)
        .create_async()
        .await;
    let first = server
        .mock("GET", "/artists/first")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"genres": ["house"]}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/artists/second")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"genres": ["techno"]}"#)
        .expect(0)
        .create_async()
        .await;

    let mut event = create_test_event("Collab", "album-a", "first");
    event.artists.push(ArtistRef {
        name: "Second".to_string(),
        id: "second".to_string(),
    });

    let track = metadata::enrich(&client(), &server.url(), &token(), event).await;

    assert_eq!(track.genres, vec!["house".to_string()]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_enrich_never_fails_when_api_unreachable() {
    // bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let track = metadata::enrich(
        &client(),
        &format!("http://{}", addr),
        &token(),
        create_test_event("Song A", "album-a", "artist-x"),
    )
    .await;

    assert_eq!(track.name, "Song A");
    assert_eq!(track.album, UNKNOWN);
    assert_eq!(track.release_year, UNKNOWN_RELEASE_YEAR);
    assert_eq!(track.genres, vec![UNKNOWN.to_string()]);
}
