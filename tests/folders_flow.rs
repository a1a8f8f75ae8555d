//! Integration tests for the folder endpoints using wiremock.
//!
//! - GET  /asset/v1/folder/{id}.json
//! - GET  /asset/v1/folder/byName.json
//! - GET  /asset/v1/folders.json
//! - POST /asset/v1/folders.json
//! - POST /asset/v1/folder/{id}.json
//! - POST /asset/v1/folder/{id}/delete.json

use std::time::{Duration, Instant};

use marketo_api::auth::TokenProvider;
use marketo_api::client::MarketoClient;
use marketo_api::config::ClientConfig;
use marketo_api::entity::FolderId;
use marketo_api::error::MarketoError;
use marketo_api::folders::*;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: a client with a live token pointed at the mock server.
fn mock_client(server: &MockServer) -> MarketoClient {
    let cfg = ClientConfig::new(
        &format!("{}/rest", server.uri()),
        &format!("{}/identity", server.uri()),
        "cid",
        "secret",
    );
    let tp = TokenProvider::with_token("mock-token", Instant::now() + Duration::from_secs(3600));
    MarketoClient::with_token_provider(cfg, tp).unwrap()
}

fn folder_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": "",
        "createdAt": "2016-09-09T22:00:49Z+0000",
        "updatedAt": "2016-09-09T22:00:49Z+0000",
        "url": format!("https://app-abm.marketo.com/#MF{id}A1"),
        "folderId": {"id": id, "type": "Folder"},
        "folderType": "Folder",
        "parent": {"id": 12, "type": "Folder"},
        "path": format!("/Marketing Activities/{name}"),
        "isArchive": false,
        "isSystem": false,
        "accessZoneId": 1,
        "workspace": "Default"
    })
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "errors": [],
        "warnings": [],
        "result": result
    }))
}

// ── Lookups ───────────────────────────────────────────────────────────

#[tokio::test]
async fn get_folder_by_id_returns_folder() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/folder/1001.json"))
        .respond_with(ok(serde_json::json!([folder_json(1001, "Assets")])))
        .mount(&server)
        .await;

    let folder = get_folder_by_id(&client, 1001).await.unwrap().unwrap();
    assert_eq!(folder.name, "Assets");
    assert_eq!(folder.parent, Some(FolderId::folder(12)));
    assert_eq!(folder.path.as_deref(), Some("/Marketing Activities/Assets"));
}

#[tokio::test]
async fn get_folder_by_id_with_no_result_is_none() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    // Marketo answers "not found" with success and no result, plus a warning.
    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/folder/5.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "errors": [],
            "warnings": ["No assets found for the given search criteria."]
        })))
        .mount(&server)
        .await;

    assert!(get_folder_by_id(&client, 5).await.unwrap().is_none());
}

#[tokio::test]
async fn get_folder_by_name_passes_name_and_root() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/folder/byName.json"))
        .and(query_param("name", "Assets"))
        .and(query_param("root", r#"{"id":1044,"type":"Program"}"#))
        .respond_with(ok(serde_json::json!([folder_json(1001, "Assets")])))
        .expect(1)
        .mount(&server)
        .await;

    let root = FolderId::program(1044);
    let folder = get_folder_by_name(&client, "Assets", Some(&root))
        .await
        .unwrap();
    assert_eq!(folder.unwrap().id, 1001);
}

#[tokio::test]
async fn browse_folders_sends_root_as_json() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/folders.json"))
        .and(query_param("root", r#"{"id":12,"type":"Folder"}"#))
        .respond_with(ok(serde_json::json!([
            folder_json(1001, "Assets"),
            folder_json(1002, "Archive")
        ])))
        .mount(&server)
        .await;

    let folders = browse_folders(&client, &FolderId::folder(12)).await.unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[1].name, "Archive");
}

#[tokio::test]
async fn browse_folders_empty_result_is_empty_vec() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/rest/asset/v1/folders.json"))
        .respond_with(ok(serde_json::json!([])))
        .mount(&server)
        .await;

    assert!(browse_folders(&client, &FolderId::folder(12)).await.unwrap().is_empty());
}

// ── Mutations ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_folder_posts_form_body() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/asset/v1/folders.json"))
        .and(body_string_contains("name=Q3+Assets"))
        .and(body_string_contains("parent=%7B%22id%22%3A12%2C%22type%22%3A%22Folder%22%7D"))
        .and(body_string_contains("description=Quarterly"))
        .respond_with(ok(serde_json::json!([folder_json(1003, "Q3 Assets")])))
        .expect(1)
        .mount(&server)
        .await;

    let folder = create_folder(&client, "Q3 Assets", &FolderId::folder(12), Some("Quarterly"))
        .await
        .unwrap();
    assert_eq!(folder.id, 1003);
}

#[tokio::test]
async fn create_folder_failure_surfaces_vendor_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/asset/v1/folders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "errors": [{"code": "709", "message": "Folder 'Q3 Assets' already exists"}]
        })))
        .mount(&server)
        .await;

    let err = create_folder(&client, "Q3 Assets", &FolderId::folder(12), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("709"));
}

#[tokio::test]
async fn create_folder_without_result_is_invalid_result() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/asset/v1/folders.json"))
        .respond_with(ok(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = create_folder(&client, "Q3 Assets", &FolderId::folder(12), None)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketoError::InvalidResult { .. }));
}

#[tokio::test]
async fn update_folder_sends_type_and_archive_flag() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/asset/v1/folder/1001.json"))
        .and(body_string_contains("type=Folder"))
        .and(body_string_contains("isArchive=true"))
        .respond_with(ok(serde_json::json!([folder_json(1001, "Assets")])))
        .expect(1)
        .mount(&server)
        .await;

    let update = FolderUpdate {
        is_archive: Some(true),
        ..FolderUpdate::default()
    };
    let folder = update_folder(&client, 1001, &update).await.unwrap();
    assert_eq!(folder.id, 1001);
}

#[tokio::test]
async fn delete_folder_returns_id() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("POST"))
        .and(path("/rest/asset/v1/folder/1001/delete.json"))
        .respond_with(ok(serde_json::json!([{"id": 1001}])))
        .mount(&server)
        .await;

    assert_eq!(delete_folder(&client, 1001).await.unwrap(), 1001);
}
