//! Listening sessions against a mock content service and an on-disk state file

use earshot_catalog::{CatalogClient, CatalogConfig};
use earshot_cli::{listen, ListenOptions};
use earshot_core::{StorageAdapter, StorageScope};
use earshot_playback::{PlaybackConfig, PlayerStatus};
use earshot_storage::FileStorage;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tracks": [
                {"id": 1, "title": "Arrival", "slug": "arrival", "order": 1, "audioUrl": "/media/arrival.mp3"},
                {"id": 2, "title": "Body Scan", "slug": "body-scan", "order": 2, "audioUrl": "/media/body-scan.mp3"}
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn open_storage(dir: &TempDir) -> Arc<dyn StorageAdapter> {
    Arc::new(FileStorage::open(dir.path().join("state.json")).unwrap())
}

#[tokio::test]
async fn test_session_resumes_from_saved_progress() {
    let server = catalog_server().await;
    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = PlaybackConfig::default();

    let first = ListenOptions {
        seconds: 30.0,
        seek: Some(10.0),
        ..ListenOptions::default()
    };
    let summary = listen(open_storage(&dir), &client, &config, &first)
        .await
        .unwrap();
    assert_eq!(summary.track_key.as_deref(), Some("arrival"));
    assert!((summary.position - 40.0).abs() < 1e-6);
    assert_eq!(summary.status, PlayerStatus::Paused);

    // A fresh process reads the state file again
    let storage = open_storage(&dir);
    assert_eq!(
        storage
            .get(StorageScope::Durable, "progress:arrival")
            .unwrap()
            .as_deref(),
        Some("40.000")
    );

    let second = ListenOptions {
        seconds: 5.0,
        ..ListenOptions::default()
    };
    let summary = listen(storage, &client, &config, &second).await.unwrap();
    assert!((summary.position - 45.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_session_advances_and_bookmarks() {
    let server = catalog_server().await;
    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let options = ListenOptions {
        seconds: 30.0,
        track_length: 20.0,
        bookmark: Some(String::new()),
        ..ListenOptions::default()
    };
    let summary = listen(open_storage(&dir), &client, &PlaybackConfig::default(), &options)
        .await
        .unwrap();

    assert_eq!(summary.track_key.as_deref(), Some("body-scan"));
    assert_eq!(summary.tracks_started, 2);
    assert!((summary.position - 10.0).abs() < 1e-6);

    let bookmark = summary.bookmark.unwrap();
    assert_eq!(bookmark.label, "Body Scan @ 0:10");
    assert_eq!(bookmark.track_key, "body-scan");
}

#[tokio::test]
async fn test_single_track_session_at_double_speed() {
    let server = catalog_server().await;
    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let options = ListenOptions {
        track: Some("body-scan".into()),
        seconds: 10.0,
        speed: Some(earshot_playback::Speed::Double),
        ..ListenOptions::default()
    };
    let summary = listen(open_storage(&dir), &client, &PlaybackConfig::default(), &options)
        .await
        .unwrap();

    assert_eq!(summary.track_key.as_deref(), Some("body-scan"));
    assert!((summary.position - 20.0).abs() < 1e-6);
}
