use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

use crate::repo::UnknownItemsError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Point not found")]
    NotFound,
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    /// Maps a repository error, turning unknown item references into a
    /// validation error on the `items` field
    pub fn from_repo(err: anyhow::Error) -> Self {
        match err.downcast_ref::<UnknownItemsError>() {
            Some(unknown) => {
                let mut errors = ValidationErrors::default();
                errors.add("items", unknown.to_string());
                ApiError::Validation(errors)
            }
            None => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Database(err) => {
                error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "Point not found" }),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "Validation failed",
                    "fields": errors,
                }),
            ),
            ApiError::Multipart(err) => (
                err.status(),
                serde_json::json!({ "error": err.body_text() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
