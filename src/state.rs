use std::sync::Arc;

use crate::db::DbPool;
use crate::uploads::UploadStore;

/// State shared by every handler
///
/// Holds the database pool opened at startup and the upload store. Both are
/// reference counted, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool
    pub pool: Arc<DbPool>,
    /// Where uploaded images live and how their URLs are built
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(pool: Arc<DbPool>, uploads: UploadStore) -> Self {
        Self {
            pool,
            uploads: Arc::new(uploads),
        }
    }
}
