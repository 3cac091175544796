//! API handlers for the gallery.

pub mod photo;

pub use photo::*;

use std::sync::Arc;

use crate::file::UploadStorage;
use crate::Database;

/// Database shared between handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
pub struct AppState {
    /// Database connection pool.
    pub db: SharedDatabase,
    /// Upload directory.
    pub storage: UploadStorage,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, storage: UploadStorage, max_upload_size: u64) -> Self {
        Self {
            db,
            storage,
            max_upload_size,
        }
    }
}
