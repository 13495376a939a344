use docquery::config::ApiConfig;
use docquery::events::{EventBus, LibraryEvent};
use docquery::workflows::manager::DocumentManager;
use docquery::workflows::selector::DocumentSelector;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn doc_json(id: i64, filename: &str) -> serde_json::Value {
    json!({
        "id": id,
        "filename": filename,
        "file_type": "txt",
        "upload_date": "2025-08-01T12:00:00",
        "chunks_count": 1
    })
}

#[tokio::test]
async fn delete_notifies_and_selector_prunes_stale_selection() {
    let server = MockServer::start().await;

    // First two listings (selector mount + manager load) see three documents.
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json(1, "a.txt"),
            doc_json(2, "b.txt"),
            doc_json(3, "c.txt"),
        ])))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    // After the delete, document 2 is gone.
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json(1, "a.txt"),
            doc_json(3, "c.txt"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "b.txt",
            "chunks_deleted": 1
        })))
        .mount(&server)
        .await;

    let config = ApiConfig::new(server.uri());
    let events = EventBus::new();
    let mut rx = events.subscribe();

    let mut selector = DocumentSelector::new(config.clone());
    selector.load().await.unwrap();
    assert_eq!(selector.selected(), &[1, 2, 3]);

    let mut manager = DocumentManager::new(config, events);
    manager.load().await.unwrap();
    let response = manager.delete(2).await.unwrap();
    assert_eq!(response.filename, "b.txt");
    assert_eq!(response.chunks_deleted, 1);
    assert!(manager.documents().iter().all(|d| d.id != 2));

    // The broadcast tells dependent views to refetch.
    assert_eq!(rx.recv().await.unwrap(), LibraryEvent::Changed);
    selector.refresh().await.unwrap();
    assert_eq!(selector.selected(), &[1, 3]);
}

#[tokio::test]
async fn failed_delete_keeps_listing_and_surfaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([doc_json(1, "a.txt")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let events = EventBus::new();
    let mut rx = events.subscribe();
    let mut manager = DocumentManager::new(ApiConfig::new(server.uri()), events);
    manager.load().await.unwrap();

    assert!(manager.delete(1).await.is_err());
    assert_eq!(manager.documents().len(), 1);
    assert!(manager.error().is_some());
    assert!(manager.deleting().is_none());
    // No library-changed event on failure.
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}
