use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use axum_extra::extract::Query;
use tracing::{instrument, debug, info, warn};

use crate::dto::{ItemView, PointDetailView, PointFilterDto, PointView};
use crate::errors::ApiError;
use crate::repo;
use crate::state::AppState;
use crate::validation::{validate_point, PointForm, UploadedImage};

/// Collects the parts of a multipart registration into a `PointForm`
///
/// The `image` part is kept as a file; every other known part is read as
/// text. Unknown parts are skipped.
pub async fn read_point_form(mut multipart: Multipart) -> Result<PointForm, ApiError> {
    let mut form = PointForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            form.set_image(UploadedImage {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await?;
            if !form.set_text(&name, value) {
                debug!("Skipping unknown form field {}", name);
            }
        }
    }

    Ok(form)
}

/// Handler for registering a new collection point
///
/// This function handles multipart POST requests to `/points`.
///
/// All fields are validated before anything is written. The image, when
/// present, is stored first; if the database insert then fails the stored
/// file is removed again.
///
/// ### Arguments
///
/// * `state` - The application state
/// * `multipart` - The multipart request body
///
/// ### Returns
///
/// The created point as JSON, including the IDs of the accepted items
#[instrument(skip(state, multipart))]
pub async fn create_point_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PointView>, ApiError> {
    info!("Registering new point");

    let form = read_point_form(multipart).await?;
    let valid = validate_point(&form).map_err(|errors| {
        debug!("Rejected registration: {}", errors);
        ApiError::Validation(errors)
    })?;

    let stored_image = match &form.image {
        Some(image) => Some(
            state
                .uploads
                .store(&image.file_name, &image.bytes)
                .await
                .map_err(ApiError::Database)?,
        ),
        None => None,
    };

    let (new_point, item_ids) = valid.into_parts(stored_image.clone());

    let (point, accepted) = match repo::create_point(&state.pool, &new_point, &item_ids) {
        Ok(created) => created,
        Err(e) => {
            if let Some(file_name) = &stored_image {
                warn!("Registration failed, discarding upload {}", file_name);
                state.uploads.remove(file_name).await;
            }
            return Err(ApiError::from_repo(e));
        }
    };

    info!("Successfully registered point with id: {}", point.get_id());

    Ok(Json(PointView::new(&point, &state.uploads).with_items(&accepted)))
}

/// Handler for listing collection points
///
/// This function handles GET requests to `/points`, optionally filtered by
/// `city`, `uf` and `items`.
///
/// ### Arguments
///
/// * `state` - The application state
/// * `query` - The filter, parsed from the query string
///
/// ### Returns
///
/// The matching points as JSON
#[instrument(skip(state), fields(city = ?query.city, uf = ?query.uf))]
pub async fn list_points_handler(
    State(state): State<AppState>,
    Query(query): Query<PointFilterDto>,
) -> Result<Json<Vec<PointView>>, ApiError> {
    debug!("Listing points");

    let filter = query.parse().map_err(ApiError::Validation)?;

    let points = repo::list_points(&state.pool, &filter)
        .map_err(ApiError::Database)?;

    let views = points
        .iter()
        .map(|point| PointView::new(point, &state.uploads))
        .collect::<Vec<_>>();

    debug!("Returning {} points", views.len());
    Ok(Json(views))
}

/// Handler for retrieving a point with the items it accepts
///
/// This function handles GET requests to `/points/{id}`.
///
/// ### Returns
///
/// The point and its items as JSON, or 404 if no such point exists
#[instrument(skip(state), fields(point_id = %point_id))]
pub async fn get_point_handler(
    State(state): State<AppState>,
    Path(point_id): Path<i32>,
) -> Result<Json<PointDetailView>, ApiError> {
    debug!("Retrieving point");

    let (point, accepted) = repo::get_point_with_items(&state.pool, point_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(PointDetailView {
        point: PointView::new(&point, &state.uploads),
        items: accepted
            .iter()
            .map(|item| ItemView::new(item, &state.uploads))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::PointFilterDto;
    use crate::models::NewPoint;
    use crate::test_utils::{create_point_request, send, setup_test_state, valid_point_fields};
    use axum::http::StatusCode;

    fn insert_point(state: &AppState, city: &str, uf: &str, item_ids: &[i32]) -> i32 {
        let row = NewPoint {
            image: None,
            name: format!("Ponto {}", city),
            email: "ponto@ecoleta.org".to_string(),
            whatsapp: "11999998888".to_string(),
            latitude: -23.55,
            longitude: -46.63,
            city: city.to_string(),
            uf: uf.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        repo::create_point(&state.pool, &row, item_ids).unwrap().0.get_id()
    }

    #[tokio::test]
    async fn test_create_point_handler_returns_created_point() {
        let (state, _uploads) = setup_test_state();

        let (status, body) = send(&state, create_point_request(&valid_point_fields(), None)).await;

        assert_eq!(status, StatusCode::OK);
        let view: PointView = serde_json::from_value(body).unwrap();
        assert!(view.id > 0);
        assert_eq!(view.name, "Coleta Centro");
        assert_eq!(view.uf, "MG");
        assert_eq!(view.items, vec![1, 2]);
        assert!(view.image.is_none());
        assert!(view.image_url.is_none());
    }

    #[tokio::test]
    async fn test_create_point_handler_stores_image() {
        let (state, uploads) = setup_test_state();

        let image = ("fachada.png", "image/png", &b"\x89PNG fake"[..]);
        let (status, body) = send(&state, create_point_request(&valid_point_fields(), Some(image))).await;

        assert_eq!(status, StatusCode::OK);
        let view: PointView = serde_json::from_value(body).unwrap();
        let file_name = view.image.unwrap();
        assert!(file_name.ends_with("-fachada.png"));
        assert_eq!(
            view.image_url.as_deref(),
            Some(format!("http://localhost:3333/uploads/{}", file_name).as_str())
        );
        let stored = std::fs::read(uploads.path().join(&file_name)).unwrap();
        assert_eq!(stored, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_create_point_handler_unknown_item_leaves_no_upload() {
        let (state, uploads) = setup_test_state();
        let mut fields = valid_point_fields();
        fields.retain(|(name, _)| *name != "items");
        fields.push(("items", "1,77"));

        let image = ("fachada.png", "image/png", &b"png"[..]);
        let (status, body) = send(&state, create_point_request(&fields, Some(image))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["items"][0], "unknown item ids: 77");
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
        assert!(repo::list_points(&state.pool, &Default::default()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_point_handler_reports_every_invalid_field() {
        let (state, _uploads) = setup_test_state();
        let fields = [("name", "Ponto"), ("email", "not-an-email"), ("uf", "MGS")];

        let (status, body) = send(&state, create_point_request(&fields, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        let mut reported: Vec<&str> = body["fields"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        reported.sort_unstable();
        assert_eq!(
            reported,
            vec!["city", "email", "items", "latitude", "longitude", "uf", "whatsapp"]
        );
    }

    #[tokio::test]
    async fn test_list_points_handler_filters() {
        let (state, _uploads) = setup_test_state();
        let recife = insert_point(&state, "Recife", "PE", &[1, 2]);
        insert_point(&state, "Natal", "RN", &[2]);

        let query = PointFilterDto {
            uf: Some("PE".to_string()),
            ..Default::default()
        };
        let result = list_points_handler(State(state.clone()), Query(query)).await.unwrap();
        let ids: Vec<i32> = result.0.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![recife]);

        let everything = list_points_handler(State(state), Query(PointFilterDto::default()))
            .await
            .unwrap();
        assert_eq!(everything.0.len(), 2);
    }

    #[tokio::test]
    async fn test_list_points_handler_rejects_bad_item_filter() {
        let (state, _uploads) = setup_test_state();
        let query = PointFilterDto {
            items: vec!["paper".to_string()],
            ..Default::default()
        };

        let err = list_points_handler(State(state), Query(query)).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_point_handler() {
        let (state, _uploads) = setup_test_state();
        let id = insert_point(&state, "Natal", "RN", &[6, 4]);

        let result = get_point_handler(State(state), Path(id)).await.unwrap();

        let detail = result.0;
        assert_eq!(detail.point.id, id);
        assert_eq!(detail.point.city, "Natal");
        let titles: Vec<&str> = detail.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Resíduos Eletrônicos", "Óleo de Cozinha"]);
    }

    #[tokio::test]
    async fn test_get_point_handler_not_found() {
        let (state, _uploads) = setup_test_state();

        let err = get_point_handler(State(state), Path(404)).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound));
    }
}
