use crate::*;
use proptest::prelude::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use diesel::RunQueryDsl;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::uploads::UploadStore;

/// Boundary used by `multipart_body`
pub const TEST_BOUNDARY: &str = "ecoleta-test-boundary";

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates an in-memory SQLite database
/// 2. Runs all migrations to set up the schema and seed the item catalog
///
/// Foreign keys are switched on by the pool's connection customizer.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Use a unique shared in-memory database for each test.
    // Plain ":memory:" gives each connection its own separate database,
    // so migrations run on one connection wouldn't be visible on others.
    // By using a unique URI with cache=shared, all connections in this pool
    // share the same in-memory database while remaining isolated from other tests.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    Arc::new(pool)
}

/// Sets up a test database with the seeded item catalog removed
pub fn setup_empty_catalog_db() -> Arc<db::DbPool> {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();
    diesel::delete(crate::schema::items::table)
        .execute(&mut conn)
        .unwrap();
    drop(conn);
    pool
}

/// Builds application state backed by a fresh database and a temporary uploads directory
///
/// The returned `TempDir` must be kept alive for as long as the state is used.
pub fn setup_test_state() -> (AppState, TempDir) {
    let uploads_dir = tempfile::tempdir().unwrap();
    let uploads = UploadStore::new(
        uploads_dir.path().to_path_buf(),
        "http://localhost:3333".to_string(),
        5 * 1024 * 1024,
    );
    (AppState::new(setup_test_db(), uploads), uploads_dir)
}

/// Builds a multipart/form-data body from text fields and an optional file
///
/// ### Returns
///
/// The content type header value and the encoded body
pub fn multipart_body(
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                TEST_BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                TEST_BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", TEST_BOUNDARY), body)
}

/// The text fields of a complete, valid registration
pub fn valid_point_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Coleta Centro"),
        ("email", "centro@ecoleta.org"),
        ("whatsapp", "31988887777"),
        ("latitude", "-19.9167"),
        ("longitude", "-43.9345"),
        ("city", "Belo Horizonte"),
        ("uf", "MG"),
        ("items", "1,2"),
    ]
}

/// Builds a `POST /points` request from text fields and an optional file
pub fn create_point_request(
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let (content_type, body) = multipart_body(fields, image);
    Request::builder()
        .uri("/points")
        .method("POST")
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap()
}

/// Sends a request to a fresh router over the given state and returns status and JSON body
pub async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = create_app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Generates strings that mix control characters, unicode and ordinary text
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "\\PC*",
        ".*",
        "[0-9,\\- .eE+]*",
        "[\\x00-\\x1f]*",
    ]
}
