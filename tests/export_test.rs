use std::{
    collections::HashMap,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use noscrubs::{
    cli::{PlaylistOptions, export_liked_songs, export_playlists},
    config::Settings,
    spotify::SpotifyClient,
    utils::LONG_AGO,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// In-memory stand-in for the Web API endpoints an export touches.
#[derive(Default)]
struct MockSpotify {
    base: String,
    saved: Vec<Value>,
    playlists: Vec<Value>,
    playlist_items: HashMap<String, Vec<Value>>,
    forbidden_features: Vec<String>,
    artist_lookups: AtomicUsize,
}

type Shared = Arc<MockSpotify>;

fn track_item(n: usize, added_at: &str) -> Value {
    json!({
        "added_at": added_at,
        "track": {
            "id": format!("t{n}"),
            "name": format!("Song {n}"),
            "artists": [{ "id": format!("a{n}"), "name": format!("Artist {n}") }],
            "album": { "id": format!("al{n}"), "name": format!("Album {n}") },
            "popularity": 20,
            "explicit": false,
            "preview_url": null,
            "is_local": false
        }
    })
}

fn local_item(name: &str, added_at: &str) -> Value {
    json!({
        "added_at": added_at,
        "track": {
            "id": null,
            "name": name,
            "artists": [{ "id": null, "name": "" }],
            "album": { "id": null, "name": "" },
            "popularity": 0,
            "explicit": false,
            "preview_url": null,
            "is_local": true
        }
    })
}

fn playlist(id: &str, name: &str, owner: &str) -> Value {
    json!({ "id": id, "name": name, "owner": { "id": owner } })
}

fn paginate(items: &[Value], url: &str, query: &HashMap<String, String>) -> Value {
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: usize = query
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (offset + limit).min(items.len());
    let next = if end < items.len() {
        Value::String(format!("{url}?limit={limit}&offset={end}"))
    } else {
        Value::Null
    };

    json!({ "items": items[offset..end].to_vec(), "next": next, "total": items.len() })
}

async fn saved_tracks(
    State(mock): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let url = format!("{}/me/tracks", mock.base);
    Json(paginate(&mock.saved, &url, &query))
}

async fn my_playlists(
    State(mock): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let url = format!("{}/me/playlists", mock.base);
    Json(paginate(&mock.playlists, &url, &query))
}

async fn playlist_tracks(
    State(mock): State<Shared>,
    UrlPath(id): UrlPath<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match mock.playlist_items.get(&id) {
        Some(items) => {
            let url = format!("{}/playlists/{}/tracks", mock.base, id);
            Json(paginate(items, &url, &query)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn album(UrlPath(id): UrlPath<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "name": format!("Album {}", id.trim_start_matches("al")),
        "album_type": "album",
        "label": "Indie Label",
        "release_date": "2020-01-01",
        "total_tracks": 10
    }))
}

async fn artist(State(mock): State<Shared>, UrlPath(id): UrlPath<String>) -> Json<Value> {
    mock.artist_lookups.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "id": id,
        "name": format!("Artist {}", id.trim_start_matches('a')),
        "genres": ["indie pop", "dream pop"],
        "popularity": 30
    }))
}

async fn audio_features(State(mock): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    if mock.forbidden_features.contains(&id) {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!({
        "id": id,
        "danceability": 0.5,
        "energy": 0.7,
        "tempo": 98.0,
        "valence": 0.2,
        "acousticness": 0.3,
        "instrumentalness": 0,
        "speechiness": 0.05,
        "loudness": -7.1,
        "liveness": 0.12
    }))
    .into_response()
}

/// Starts the mock on an ephemeral port; `setup` fills in the catalog once
/// the base URL is known.
async fn start_mock(setup: impl FnOnce(&mut MockSpotify)) -> Shared {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut mock = MockSpotify {
        base: format!("http://{addr}"),
        ..MockSpotify::default()
    };
    setup(&mut mock);
    let mock = Arc::new(mock);

    let app = Router::new()
        .route("/me/tracks", get(saved_tracks))
        .route("/me/playlists", get(my_playlists))
        .route("/playlists/{id}/tracks", get(playlist_tracks))
        .route("/albums/{id}", get(album))
        .route("/artists/{id}", get(artist))
        .route("/audio-features/{id}", get(audio_features))
        .with_state(mock.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    mock
}

fn settings(mock: &MockSpotify, output_dir: &Path) -> Settings {
    Settings {
        api_url: mock.base.clone(),
        page_size: 2,
        max_retries: 0,
        output_dir: output_dir.to_path_buf(),
        ..Settings::default()
    }
}

fn data_lines(contents: &str) -> Vec<&str> {
    contents.lines().skip(1).collect()
}

#[tokio::test]
async fn test_liked_songs_span_pages_in_order() {
    let mock = start_mock(|mock| {
        mock.saved = vec![
            track_item(1, "2023-06-01T12:00:00Z"),
            track_item(2, "2023-06-02T12:00:00Z"),
            local_item("Basement Demo", "2023-06-03T12:00:00Z"),
            track_item(4, "2023-06-04T12:00:00Z"),
            track_item(5, "2023-06-05T12:00:00Z"),
        ];
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&mock, dir.path());
    let client = SpotifyClient::new(&settings, "test-token".to_string());

    let summary = export_liked_songs(&client, &settings, LONG_AGO)
        .await
        .unwrap();

    assert_eq!(summary.path, dir.path().join("Liked_Songs.tsv"));
    assert_eq!(summary.written, 5);
    assert_eq!(summary.skipped, 0);

    let contents = std::fs::read_to_string(&summary.path).unwrap();
    assert!(contents.starts_with("Artist\tTrack\tAlbum\t"));

    let lines = data_lines(&contents);
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Artist 1\tSong 1\tAlbum 1\tIndie Label\tindie pop, dream pop\tA\t20\t30\tNo\t2020-01-01\t2023-06-01\t\t0.5\t0.7\t98.0\t0.2\t0.3\t0\t"));
    assert!(lines[1].starts_with("Artist 2\tSong 2\t"));
    assert_eq!(lines[2], "(local)\tBasement Demo");
    assert!(lines[3].starts_with("Artist 4\tSong 4\t"));
    assert!(lines[4].starts_with("Artist 5\tSong 5\t"));

    for n in [1, 2, 4, 5] {
        let title = format!("\tSong {n}\t");
        assert_eq!(contents.matches(&title).count(), 1, "{}", title);
    }

    // one artist lookup per remote track
    assert_eq!(mock.artist_lookups.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_liked_songs_respect_cutoff() {
    let mock = start_mock(|mock| {
        mock.saved = vec![
            track_item(1, "2023-06-01T12:00:00Z"),
            track_item(2, "2023-06-03T02:00:00Z"),
            track_item(3, "2023-06-03T12:00:00Z"),
            track_item(4, "2023-06-04T12:00:00Z"),
        ];
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&mock, dir.path());
    let client = SpotifyClient::new(&settings, "test-token".to_string());

    let cutoff = NaiveDate::from_ymd_opt(2023, 6, 3).unwrap();
    let summary = export_liked_songs(&client, &settings, cutoff).await.unwrap();

    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 2);

    let contents = std::fs::read_to_string(&summary.path).unwrap();
    let lines = data_lines(&contents);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\tSong 3\t"));
    assert!(lines[1].contains("\tSong 4\t"));
    assert_eq!(mock.artist_lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_forbidden_audio_features_leave_columns_empty() {
    let mock = start_mock(|mock| {
        mock.saved = vec![
            track_item(1, "2023-06-01T12:00:00Z"),
            track_item(2, "2023-06-02T12:00:00Z"),
        ];
        mock.forbidden_features = vec!["t2".to_string()];
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&mock, dir.path());
    let client = SpotifyClient::new(&settings, "test-token".to_string());

    let summary = export_liked_songs(&client, &settings, LONG_AGO)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&summary.path).unwrap();
    let lines = data_lines(&contents);
    assert!(lines[0].ends_with("\t0.12\t"));
    assert!(lines[1].ends_with("\t2023-06-02\t\t\t\t\t\t\t\t\t\t\t"));
    assert_eq!(lines[1].matches('\t').count(), 21);
}

#[tokio::test]
async fn test_playlists_skip_stale_and_foreign() {
    let mock = start_mock(|mock| {
        mock.playlists = vec![
            playlist("p1", "Fresh: Picks", "dj"),
            playlist("p2", "Old Stuff", "dj"),
            playlist("p3", "Friend Mix", "pal"),
            playlist("p4", "Empty", "dj"),
        ];
        mock.playlist_items.insert(
            "p1".to_string(),
            vec![
                track_item(1, "2022-11-20T12:00:00Z"),
                track_item(2, "2023-02-01T12:00:00Z"),
                track_item(3, "2023-02-02T12:00:00Z"),
            ],
        );
        mock.playlist_items.insert(
            "p2".to_string(),
            vec![track_item(4, "2019-01-01T12:00:00Z")],
        );
        mock.playlist_items.insert(
            "p3".to_string(),
            vec![track_item(5, "2023-05-01T12:00:00Z")],
        );
        mock.playlist_items.insert("p4".to_string(), Vec::new());
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&mock, dir.path());
    let client = SpotifyClient::new(&settings, "test-token".to_string());

    let options = PlaylistOptions {
        cutoff: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        new_songs_only: false,
        include_others: false,
    };
    export_playlists(&client, &settings, "dj", &options)
        .await
        .unwrap();

    let mut files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["Fresh-_Picks.tsv".to_string()]);

    // the full playlist is written, older songs included
    let contents = std::fs::read_to_string(dir.path().join("Fresh-_Picks.tsv")).unwrap();
    assert_eq!(data_lines(&contents).len(), 3);
}

#[tokio::test]
async fn test_playlists_new_songs_only_and_others() {
    let mock = start_mock(|mock| {
        mock.playlists = vec![playlist("p3", "Friend Mix", "pal")];
        mock.playlist_items.insert(
            "p3".to_string(),
            vec![
                track_item(1, "2022-12-01T12:00:00Z"),
                track_item(2, "2023-05-01T12:00:00Z"),
            ],
        );
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&mock, dir.path());
    let client = SpotifyClient::new(&settings, "test-token".to_string());

    let options = PlaylistOptions {
        cutoff: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        new_songs_only: true,
        include_others: true,
    };
    export_playlists(&client, &settings, "dj", &options)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(dir.path().join("Friend_Mix.tsv")).unwrap();
    let lines = data_lines(&contents);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Artist 2\tSong 2\t"));
}
