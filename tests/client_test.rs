use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use noscrubs::{ExportError, config::Settings, spotify::SpotifyClient};
use serde_json::json;
use tokio::net::TcpListener;

/// Answers `429` for the first `failures` requests, then serves the album.
struct RateLimited {
    failures: usize,
    retry_after: &'static str,
    calls: AtomicUsize,
}

async fn album(State(mock): State<Arc<RateLimited>>, Path(id): Path<String>) -> Response {
    let call = mock.calls.fetch_add(1, Ordering::SeqCst);
    if call < mock.failures {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", mock.retry_after)],
            "slow down",
        )
            .into_response();
    }

    Json(json!({
        "id": id,
        "name": "Album",
        "album_type": "album",
        "label": "Indie Label",
        "release_date": "2020-01-01",
        "total_tracks": 10
    }))
    .into_response()
}

async fn overstated_total() -> Json<serde_json::Value> {
    Json(json!({
        "items": [{ "added_at": "2023-06-01T12:00:00Z", "track": null }],
        "next": null,
        "total": u32::MAX
    }))
}

async fn start(failures: usize, retry_after: &'static str) -> (String, Arc<RateLimited>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mock = Arc::new(RateLimited {
        failures,
        retry_after,
        calls: AtomicUsize::new(0),
    });
    let app = Router::new()
        .route("/albums/{id}", get(album))
        .route("/me/tracks", get(overstated_total))
        .with_state(mock.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), mock)
}

fn client(api_url: String, max_retries: u32) -> SpotifyClient {
    let settings = Settings {
        api_url,
        max_retries,
        ..Settings::default()
    };
    SpotifyClient::new(&settings, "test-token".to_string())
}

#[tokio::test]
async fn test_rate_limit_is_retried_after_delay() {
    let (base, mock) = start(2, "0").await;

    let album = client(base, 3).album("al1").await.unwrap();

    assert_eq!(album.id, "al1");
    assert_eq!(mock.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_stop_after_max_attempts() {
    let (base, mock) = start(usize::MAX, "0").await;

    let err = client(base, 2).album("al1").await.unwrap_err();

    assert!(matches!(err, ExportError::Network(_)), "{:?}", err);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_long_retry_after_gives_up() {
    let (base, mock) = start(usize::MAX, "500").await;

    let err = client(base, 3).album("al1").await.unwrap_err();

    assert!(matches!(err, ExportError::Network(_)), "{:?}", err);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_retries_configured() {
    let (base, mock) = start(1, "0").await;

    assert!(client(base, 0).album("al1").await.is_err());
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_drain_ignores_reported_total() {
    let (base, _) = start(0, "0").await;
    let client = client(base, 0);

    let first = client.saved_tracks().await.unwrap();
    assert_eq!(first.total, u32::MAX);

    let items = client.drain(first).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].track.is_none());
}
