use std::path::Path;

use ecoleta::dto::{ItemView, PointDetailView, PointView};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::form::PointSubmission;

/// Error type for CLI client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", .status.as_u16())]
    Server { status: StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// A local file could not be read
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the message shown for a failed request from the server's error body
///
/// Field errors are appended as `field: message` pairs.
fn server_message(body: &serde_json::Value) -> String {
    let error = body
        .get("error")
        .and_then(|e| e.as_str())
        .unwrap_or("Unknown error")
        .to_string();

    let Some(fields) = body.get("fields").and_then(|f| f.as_object()) else {
        return error;
    };

    let details: Vec<String> = fields
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|m| m.as_str())
                .map(move |m| format!("{}: {}", field, m))
        })
        .collect();

    if details.is_empty() {
        error
    } else {
        format!("{} ({})", error, details.join("; "))
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => server_message(&body),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Query parameters for listing points
#[derive(Debug, Default, Clone)]
pub struct PointQuery {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Vec<i32>,
}

impl PointQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(city) = &self.city {
            params.push(("city", city.clone()));
        }
        if let Some(uf) = &self.uf {
            params.push(("uf", uf.clone()));
        }
        for item in &self.items {
            params.push(("items", item.to_string()));
        }
        params
    }
}

/// Guesses an image content type from a file extension
fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// HTTP client wrapper for communicating with the Ecoleta server
pub struct EcoletaClient {
    /// The base URL of the server (e.g. "http://localhost:3333")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
}

impl EcoletaClient {
    /// Creates a new EcoletaClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the Ecoleta server
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Lists the item catalog
    pub async fn list_items(&self) -> Result<Vec<ItemView>, ClientError> {
        let url = format!("{}/items", self.base_url);
        let response = self.client.get(&url).send().await?.check().await?;
        Ok(response.json().await?)
    }

    /// Lists points matching the query
    pub async fn list_points(&self, query: &PointQuery) -> Result<Vec<PointView>, ClientError> {
        let url = format!("{}/points", self.base_url);
        let response = self.client.get(&url).query(&query.params())
            .send().await?
            .check().await?;
        Ok(response.json().await?)
    }

    /// Gets a point with its items, or None if the server does not know it
    pub async fn get_point(&self, id: i32) -> Result<Option<PointDetailView>, ClientError> {
        let url = format!("{}/points/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.check().await?;
        Ok(Some(response.json().await?))
    }

    /// Registers a point, uploading the image file when one is attached
    pub async fn create_point(&self, submission: &PointSubmission) -> Result<PointView, ClientError> {
        let url = format!("{}/points", self.base_url);

        let mut form = Form::new();
        for (name, value) in submission.fields() {
            form = form.text(name, value);
        }

        if let Some(path) = &submission.image {
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "image".to_string());

            let mut part = Part::bytes(bytes).file_name(file_name);
            if let Some(mime) = image_mime(path) {
                part = part.mime_str(mime)?;
            }
            form = form.part("image", part);
        }

        let response = self.client.post(&url).multipart(form).send().await?.check().await?;
        Ok(response.json().await?)
    }
}
