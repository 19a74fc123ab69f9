use axum::body::Body;
use axum::response::Response;
use http::{header, Request};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::identity::IDENTITY_HEADER;

pub const TEST_BOUNDARY: &str = "volunteer-network-test-boundary";

/// Builds a JSON request, optionally carrying an identity header
pub fn create_test_request(
    method: &str,
    uri: &str,
    identity: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(identity) = identity {
        builder = builder.header(IDENTITY_HEADER, identity);
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A file part for `create_multipart_request`
pub struct TestFile<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// Builds a `multipart/form-data` POST with text fields followed by file parts
pub fn create_multipart_request(
    uri: &str,
    identity: Option<&str>,
    fields: &[(&str, &str)],
    files: &[TestFile<'_>],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for file in files {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", TEST_BOUNDARY),
        );
    if let Some(identity) = identity {
        builder = builder.header(IDENTITY_HEADER, identity);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn response_to_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn response_to_json(response: Response) -> Value {
    let bytes = response_to_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn response_to_string(response: Response) -> String {
    String::from_utf8(response_to_bytes(response).await).unwrap()
}
