//! Test helpers for the photo API tests.
//!
//! Provides a router-backed TestServer with an in-memory database and a
//! temporary upload directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use gallery::photo::{NewPhoto, Photo, PhotoRepository};
use gallery::web::handlers::AppState;
use gallery::web::{create_health_router, create_router, create_swagger_router};
use gallery::{Database, UploadStorage};
use tempfile::TempDir;

/// Default upload limit for tests (1 MiB).
pub const TEST_MAX_UPLOAD: u64 = 1024 * 1024;

/// A running test server plus the state behind it.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub storage: UploadStorage,
    /// Kept alive for the duration of the test.
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Create a test app with the default upload limit.
    pub async fn new() -> Self {
        Self::with_max_upload(TEST_MAX_UPLOAD).await
    }

    /// Create a test app with a custom upload limit in bytes.
    pub async fn with_max_upload(max_upload_size: u64) -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let db = Arc::new(db);

        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let storage = UploadStorage::new(upload_dir.path(), ["jpg", "jpeg", "png", "gif"])
            .expect("Failed to create upload storage");

        let app_state = Arc::new(AppState::new(
            db.clone(),
            storage.clone(),
            max_upload_size,
        ));
        let router = create_router(app_state, &[])
            .merge(create_health_router())
            .merge(create_swagger_router());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            storage,
            upload_dir,
        }
    }

    /// Insert a photo record directly.
    pub async fn seed_photo(&self, title: &str, upload_date: i64, filename: &str) -> Photo {
        PhotoRepository::new(self.db.pool())
            .create(&NewPhoto::new(title, upload_date, filename))
            .await
            .expect("Failed to seed photo")
    }

    /// Number of files in the upload directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .count()
    }
}

/// Build an upload form with a title and a file part.
pub fn upload_form(title: &str, filename: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_part("file", file_part(filename, content))
}

/// Build a file part.
pub fn file_part(filename: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec())
        .file_name(filename.to_string())
        .mime_type("application/octet-stream")
}
