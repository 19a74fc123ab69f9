use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{create_mock_app, create_test_app, create_test_app_with_limit, files_under};
use crate::error::GENERIC_ERROR_MESSAGE;
use crate::handlers::event_handlers::EVENT_CREATED_MESSAGE;
use volunteer_network_shared::test_utils::http_test_utils::{
    create_multipart_request, create_test_request, response_to_json, TestFile,
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

fn image(filename: &str) -> TestFile<'_> {
    TestFile {
        field: "image",
        filename,
        content_type: "image/png",
        data: PNG_BYTES,
    }
}

async fn list_events(app: &axum::Router) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/events", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_to_json(response).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_create_event_with_image() {
    let test_app = create_test_app("test_create_event_with_image").await;
    let app = test_app.app.clone();

    let response = app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[
                ("event", "Beach cleanup"),
                ("date", "2024-05-01"),
                ("description", "Bring gloves"),
                ("organizer", "Ana"),
            ],
            &[image("beach.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp["message"], EVENT_CREATED_MESSAGE);
    assert_eq!(json_resp["result"]["acknowledged"], true);
    let id = json_resp["result"]["insertedId"].as_str().unwrap().to_string();

    // The file lives under the identity's directory with a generated name
    let files = files_under(test_app.uploads.path());
    assert_eq!(files.len(), 1);
    let stored = &files[0];
    assert_eq!(stored.parent().unwrap(), test_app.uploads.path().join("user-1"));
    assert_eq!(std::fs::read(stored).unwrap(), PNG_BYTES);
    let filename = stored.file_name().unwrap().to_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_ne!(filename, "beach.png");

    // Lookup is projected: no id, no extra fields
    let response = app
        .clone()
        .oneshot(create_test_request(
            "GET",
            &format!("/events/{}", id),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_to_json(response).await,
        json!({
            "event": "Beach cleanup",
            "date": "2024-05-01",
            "imageUrl": filename,
            "description": "Bring gloves"
        })
    );

    // Listing returns the whole document, extra fields included
    let events = list_events(&app).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["_id"], id);
    assert_eq!(events[0]["organizer"], "Ana");
    assert_eq!(events[0]["imageUrl"], filename);
}

#[tokio::test]
async fn test_create_event_without_image() {
    let test_app = create_test_app("test_create_event_without_image").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Food drive"), ("date", "2024-06-01")],
            &[],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(files_under(test_app.uploads.path()).is_empty());

    let events = list_events(&test_app.app).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "Food drive");
    assert!(events[0].get("imageUrl").is_none());
}

#[tokio::test]
async fn test_empty_file_input_is_skipped() {
    let test_app = create_test_app("test_empty_file_input").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Food drive")],
            &[TestFile {
                field: "image",
                filename: "",
                content_type: "application/octet-stream",
                data: b"",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(files_under(test_app.uploads.path()).is_empty());

    let events = list_events(&test_app.app).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "Food drive");
    assert!(events[0].get("imageUrl").is_none());
}

#[tokio::test]
async fn test_image_name_with_path_is_rejected() {
    let test_app = create_test_app("test_image_name_with_path").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup")],
            &[image("a.png/x")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json_resp = response_to_json(response).await;
    assert!(json_resp["message"].as_str().unwrap().contains("a.png/x"));
    assert!(files_under(test_app.uploads.path()).is_empty());
    assert!(list_events(&test_app.app).await.is_empty());
}

#[tokio::test]
async fn test_create_event_without_identity_is_rejected() {
    let test_app = create_test_app("test_create_event_without_identity").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            None,
            &[("event", "Beach cleanup")],
            &[image("beach.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json_resp = response_to_json(response).await;
    assert!(json_resp["message"].as_str().unwrap().contains("identity"));

    // Nothing written, nothing inserted
    assert!(std::fs::read_dir(test_app.uploads.path())
        .unwrap()
        .next()
        .is_none());
    assert!(list_events(&test_app.app).await.is_empty());
}

#[tokio::test]
async fn test_create_event_with_unsafe_identity_is_rejected() {
    let test_app = create_test_app("test_create_event_unsafe_identity").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some(".."),
            &[("event", "Beach cleanup")],
            &[image("beach.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(files_under(test_app.uploads.path()).is_empty());
    assert!(list_events(&test_app.app).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_uploads_with_same_name_do_not_collide() {
    let test_app = create_test_app("test_concurrent_uploads").await;

    let first = test_app.app.clone().oneshot(create_multipart_request(
        "/events",
        Some("user-1"),
        &[("event", "First")],
        &[image("same.png")],
    ));
    let second = test_app.app.clone().oneshot(create_multipart_request(
        "/events",
        Some("user-1"),
        &[("event", "Second")],
        &[image("same.png")],
    ));
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().status(), StatusCode::CREATED);
    assert_eq!(second.unwrap().status(), StatusCode::CREATED);

    let files = files_under(&test_app.uploads.path().join("user-1"));
    assert_eq!(files.len(), 2);
    assert_ne!(files[0], files[1]);

    let events = list_events(&test_app.app).await;
    assert_eq!(events.len(), 2);
    assert_ne!(events[0]["imageUrl"], events[1]["imageUrl"]);
}

#[tokio::test]
async fn test_unexpected_file_field_is_rejected() {
    let test_app = create_test_app("test_unexpected_file_field").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup")],
            &[TestFile {
                field: "attachment",
                filename: "notes.txt",
                content_type: "text/plain",
                data: b"notes",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(files_under(test_app.uploads.path()).is_empty());
    assert!(list_events(&test_app.app).await.is_empty());
}

#[tokio::test]
async fn test_second_image_is_rejected_and_first_removed() {
    let test_app = create_test_app("test_second_image").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup")],
            &[image("one.png"), image("two.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(files_under(test_app.uploads.path()).is_empty());
    assert!(list_events(&test_app.app).await.is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let test_app = create_test_app_with_limit("test_oversized_upload", 256).await;
    let big = vec![7u8; 4096];

    let response = test_app
        .app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup")],
            &[TestFile {
                field: "image",
                filename: "big.png",
                content_type: "image/png",
                data: &big,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(files_under(test_app.uploads.path()).is_empty());
}

#[tokio::test]
async fn test_failed_insert_removes_uploaded_image() {
    let (app, store, uploads) = create_mock_app();
    store.set_fail_writes(true);

    let response = app
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup")],
            &[image("beach.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json_resp = response_to_json(response).await;
    assert_eq!(json_resp, json!({ "message": GENERIC_ERROR_MESSAGE }));
    assert!(files_under(uploads.path()).is_empty());
    assert_eq!(store.event_count().await, 0);
}

#[tokio::test]
async fn test_get_event_missing_and_malformed() {
    let test_app = create_test_app("test_get_event_missing").await;

    let response = test_app
        .app
        .clone()
        .oneshot(create_test_request(
            "GET",
            &format!("/events/{}", ObjectId::new().to_hex()),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_to_json(response).await.is_null());

    let response = test_app
        .app
        .clone()
        .oneshot(create_test_request("GET", "/events/xyz", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let test_app = create_test_app("test_update_and_delete_event").await;
    let app = test_app.app.clone();

    let response = app
        .clone()
        .oneshot(create_multipart_request(
            "/events",
            Some("user-1"),
            &[("event", "Beach cleanup"), ("date", "2024-05-01")],
            &[],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json_resp = response_to_json(response).await;
    let path = format!(
        "/events/{}",
        json_resp["result"]["insertedId"].as_str().unwrap()
    );

    let response = app
        .clone()
        .oneshot(create_test_request(
            "PATCH",
            &path,
            None,
            Some(json!({ "event": "River cleanup", "organizer": "Ana" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_json(response).await["matchedCount"], 1);

    let response = app
        .clone()
        .oneshot(create_test_request("GET", &path, None, None))
        .await
        .unwrap();
    assert_eq!(
        response_to_json(response).await,
        json!({ "event": "River cleanup" })
    );

    let response = app
        .clone()
        .oneshot(create_test_request("DELETE", &path, None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_json(response).await["deletedCount"], 1);

    assert!(list_events(&app).await.is_empty());
}
