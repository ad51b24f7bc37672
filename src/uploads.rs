use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 64;

/// On-disk storage for uploaded point images
///
/// Files are written under generated unique names and served back from
/// `{public_url}/uploads/{file_name}`. Catalog item icons share that URL
/// space but are built into the binary (see `CATALOG_ICONS`).
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_url: String,
    max_bytes: usize,
}

impl UploadStore {
    /// Creates a store rooted at `dir`
    ///
    /// ### Arguments
    ///
    /// * `dir` - Directory where files are written and served from
    /// * `public_url` - Externally visible base URL of the server
    /// * `max_bytes` - Largest accepted request body, in bytes
    pub fn new(dir: PathBuf, public_url: String, max_bytes: usize) -> Self {
        Self {
            dir,
            public_url: public_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Creates the uploads directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create uploads directory {:?}", self.dir))
    }

    /// Writes an uploaded file under a freshly generated name
    ///
    /// ### Returns
    ///
    /// The generated file name, relative to the uploads directory
    #[instrument(skip(self, bytes), fields(original_name = %original_name, size = bytes.len()))]
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let file_name = generate_file_name(original_name);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload {:?}", path))?;

        debug!("Stored upload as {}", file_name);
        Ok(file_name)
    }

    /// Removes a stored file, logging instead of failing when it cannot be removed
    pub async fn remove(&self, file_name: &str) {
        let path = self.dir.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove upload {:?}: {}", path, e);
        }
    }

    /// Resolves a stored file name to its public URL
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/uploads/{}", self.public_url, file_name)
    }
}

/// Icons of the seeded item catalog, served under `/uploads` when no
/// uploaded file of the same name exists
pub const CATALOG_ICONS: &[(&str, &[u8])] = &[
    ("lampadas.svg", include_bytes!("../assets/items/lampadas.svg")),
    ("baterias.svg", include_bytes!("../assets/items/baterias.svg")),
    ("papeis-papelao.svg", include_bytes!("../assets/items/papeis-papelao.svg")),
    ("eletronicos.svg", include_bytes!("../assets/items/eletronicos.svg")),
    ("organicos.svg", include_bytes!("../assets/items/organicos.svg")),
    ("oleo.svg", include_bytes!("../assets/items/oleo.svg")),
];

/// Looks up a catalog icon by file name
pub fn catalog_icon(file_name: &str) -> Option<&'static [u8]> {
    CATALOG_ICONS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, bytes)| *bytes)
}

/// Generates a unique file name that keeps a readable trace of the original
pub fn generate_file_name(original_name: &str) -> String {
    format!("{}-{}", Uuid::new_v4().simple(), sanitize_file_name(original_name))
}

/// Reduces a client-supplied file name to a safe single path component
///
/// Directory parts are dropped, anything outside `[A-Za-z0-9._-]` becomes
/// `-`, leading dots are stripped and the result is capped in length.
pub fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    // keep the extension when truncating
    let cleaned = if cleaned.len() > MAX_NAME_LEN {
        match cleaned.rfind('.') {
            Some(dot) if cleaned.len() - dot <= 10 => {
                let ext = &cleaned[dot..];
                format!("{}{}", &cleaned[..MAX_NAME_LEN - ext.len()], ext)
            }
            _ => cleaned[..MAX_NAME_LEN].to_string(),
        }
    } else {
        cleaned.to_string()
    };

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
