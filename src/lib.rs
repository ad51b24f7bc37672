/// Ecoleta: a registry of waste-collection points
///
/// This library provides the core functionality of the Ecoleta service:
/// the recyclable item catalog, the registration of collection points with
/// their accepted items and photo, and the web API that exposes both.
///
/// ### Modules
///
/// - `config`: Layered configuration (defaults, TOML file, CLI/env)
/// - `db`: Database connection management
/// - `dto`: Request and response shapes of the web API
/// - `errors`: API error type and its HTTP mapping
/// - `handlers`: Axum handlers for each endpoint
/// - `logging`: Tracing subscriber setup
/// - `models`: Data structures mapped to database tables
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `state`: Shared application state
/// - `uploads`: On-disk storage for uploaded point images
/// - `validation`: Field checks for point registration
///
/// ### Web API
///
/// - `GET /items`: List the recyclable item catalog
/// - `POST /points`: Register a collection point (multipart form)
/// - `GET /points`: List points, optionally filtered by city, uf and items
/// - `GET /points/{id}`: Get a point together with its items
/// - `GET /uploads/{file}`: Serve uploaded and catalog images

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects
pub mod dto;

/// Error types for the web API
pub mod errors;

/// Web API handlers
pub mod handlers;

/// Logging setup
pub mod logging;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Application state shared by all handlers
pub mod state;

/// Image upload storage
pub mod uploads;

/// Validation of point registration forms
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::get,
    Router,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::handlers::*;
pub use crate::state::AppState;

/// Embedded migrations, including the item catalog seed
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes
///
/// This function sets up the Axum router with all the API endpoints, the
/// static file service for `/uploads`, permissive CORS for the browser form
/// and request tracing.
///
/// ### Arguments
///
/// * `state` - The application state to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the state attached
pub fn create_app(state: AppState) -> Router {
    let uploads_dir = state.uploads.dir().to_path_buf();
    let body_limit = state.uploads.max_bytes();

    Router::new()
        // Route for listing the item catalog
        .route("/items", get(list_items_handler))
        // Route for registering and listing points
        .route("/points", get(list_points_handler).post(create_point_handler))
        // Route for getting a specific point by ID
        .route("/points/{id}", get(get_point_handler))
        // Uploaded point images and catalog icons
        .nest_service(
            "/uploads",
            ServeDir::new(uploads_dir).fallback(item_icon_handler.into_service()),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all pending database migrations, creating the
/// schema and seeding the item catalog on a fresh database.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Applied {} pending migrations", applied.len());
    Ok(())
}
