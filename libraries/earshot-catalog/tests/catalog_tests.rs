//! Catalog client tests against a mock content service.

use earshot_catalog::{CatalogClient, CatalogConfig, CatalogError};
use earshot_core::{CatalogFilter, EarshotError, TrackCatalog};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn three_tracks() -> serde_json::Value {
    json!({
        "success": true,
        "tracks": [
            {"id": 3, "title": "Closing", "slug": "closing", "order": 2, "audioUrl": "/media/closing.mp3"},
            {"id": 1, "title": "Opening", "slug": "opening", "order": 0, "audioUrl": "https://cdn.example.com/opening.mp3"},
            {"id": 2, "title": "Middle", "slug": "middle", "order": 1, "audioUrl": null}
        ]
    })
}

async fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(CatalogConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn test_loads_and_orders_full_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tracks()))
        .mount(&server)
        .await;

    let tracks = client_for(&server).await.fetch(&CatalogFilter::All).await.unwrap();

    let keys: Vec<&str> = tracks.iter().map(|t| t.key()).collect();
    assert_eq!(keys, vec!["opening", "middle", "closing"]);
    assert!(tracks[0].is_playable());
    assert!(!tracks[1].is_playable(), "null URL keeps the track as unavailable");
    assert_eq!(
        tracks[2].audio_url.as_deref(),
        Some(format!("{}/media/closing.mp3", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_single_track_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .and(query_param("track", "middle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tracks()))
        .mount(&server)
        .await;

    let tracks = client_for(&server)
        .await
        .fetch(&CatalogFilter::Single("middle".into()))
        .await
        .unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Middle");
}

#[tokio::test]
async fn test_single_track_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tracks()))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .fetch(&CatalogFilter::Single("missing".into()))
        .await;

    match result {
        Err(CatalogError::TrackNotFound(key)) => assert_eq!(key, "missing"),
        other => panic!("Expected TrackNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_success_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "tracks": []})),
        )
        .mount(&server)
        .await;

    let tracks = client_for(&server).await.fetch(&CatalogFilter::All).await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn test_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "maintenance window"})),
        )
        .mount(&server)
        .await;

    match client_for(&server).await.fetch(&CatalogFilter::All).await {
        Err(CatalogError::Service(message)) => assert_eq!(message, "maintenance window"),
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    match client_for(&server).await.fetch(&CatalogFilter::All).await {
        Err(CatalogError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "unavailable");
        }
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client_for(&server).await.fetch(&CatalogFilter::All).await,
        Err(CatalogError::ParseError(_))
    ));
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tracks()))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        CatalogClient::new(CatalogConfig::new(server.uri()).with_access_token("secret-token"))
            .unwrap();
    assert_eq!(client.fetch(&CatalogFilter::All).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_trait_maps_errors_into_core() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_tracks()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let catalog: &dyn TrackCatalog = &client;

    let err = catalog
        .load(&CatalogFilter::Single("missing".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, EarshotError::NotFound { .. }));
}

#[tokio::test]
async fn test_unreachable_service() {
    let client = CatalogClient::new(CatalogConfig::new("http://127.0.0.1:1")).unwrap();

    match client.fetch(&CatalogFilter::All).await {
        Err(CatalogError::ServerUnreachable(_)) | Err(CatalogError::Request(_)) => {}
        other => panic!("Expected unreachable error, got {:?}", other),
    }
}
