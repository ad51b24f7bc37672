use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{instrument, debug};

use crate::dto::ItemView;
use crate::errors::ApiError;
use crate::repo;
use crate::state::AppState;
use crate::uploads;

/// Handler for listing the item catalog
///
/// This function handles GET requests to `/items`.
///
/// ### Arguments
///
/// * `state` - The application state
///
/// ### Returns
///
/// Every item as JSON, each with a resolved `image_url`
#[instrument(skip(state))]
pub async fn list_items_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    debug!("Listing items");

    let items = repo::list_items(&state.pool)
        .map_err(ApiError::Database)?;

    let views = items
        .iter()
        .map(|item| ItemView::new(item, &state.uploads))
        .collect::<Vec<_>>();

    debug!("Returning {} items", views.len());
    Ok(Json(views))
}

/// Fallback for `/uploads` serving the built-in catalog icons
///
/// Reached only when the uploads directory has no file at the requested
/// path; the URI is relative to the `/uploads` prefix.
pub async fn item_icon_handler(uri: Uri) -> Response {
    let file_name = uri.path().trim_start_matches('/');

    match uploads::catalog_icon(file_name) {
        Some(bytes) => ([(header::CONTENT_TYPE, "image/svg+xml")], bytes).into_response(),
        None => {
            debug!("No upload or catalog icon named {}", file_name);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
