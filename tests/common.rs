//! Common test utilities for Ecoleta integration tests
//!
//! This file contains shared functions for all integration tests: building
//! a test application, encoding multipart registrations and sending requests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ecoleta::{
    create_app,
    db::{init_pool, DbPool},
    uploads::UploadStore,
    AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "ecoleta-integration-boundary";

/// Test application plus the temporary uploads directory backing it
pub struct TestApp {
    pub router: Router,
    pub pool: Arc<DbPool>,
    pub uploads: TempDir,
}

/// Creates a test application with an in-memory SQLite database
///
/// This helper function:
/// 1. Creates a shared-cache in-memory SQLite database unique to the test
/// 2. Runs migrations to set up the schema and seed the item catalog
/// 3. Creates an Axum application with the database and a temporary uploads directory
///
/// ### Returns
///
/// A `TestApp`; keep it alive for the duration of the test
pub fn create_test_app() -> TestApp {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());

    {
        let conn = &mut pool.get().unwrap();
        ecoleta::run_migrations(conn).unwrap();
    }

    let uploads = tempfile::tempdir().unwrap();
    let store = UploadStore::new(
        uploads.path().to_path_buf(),
        "http://localhost:3333".to_string(),
        5 * 1024 * 1024,
    );

    TestApp {
        router: create_app(AppState::new(pool.clone(), store)),
        pool,
        uploads,
    }
}

/// Encodes text fields and an optional image as multipart/form-data
pub fn multipart_body(
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A complete registration for a point in Porto Alegre
pub fn point_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Recicla Poa"),
        ("email", "contato@reciclapoa.org"),
        ("whatsapp", "51999990000"),
        ("latitude", "-30.0346"),
        ("longitude", "-51.2177"),
        ("city", "Porto Alegre"),
        ("uf", "RS"),
        ("items", "1,2"),
    ]
}

/// Replaces (or adds) one field of a registration
pub fn with_field(
    mut fields: Vec<(&'static str, &'static str)>,
    name: &'static str,
    value: &'static str,
) -> Vec<(&'static str, &'static str)> {
    fields.retain(|(n, _)| *n != name);
    fields.push((name, value));
    fields
}

/// Sends a request and returns the status and JSON body (Null when empty)
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Sends a GET request
pub async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Posts a multipart registration to /points
pub async fn post_point(
    app: &TestApp,
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(fields, image);
    let request = Request::builder()
        .uri("/points")
        .method("POST")
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}
