//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::photo::Photo;

/// Base path of the photo resource.
pub const PHOTOS_PATH: &str = "/api/v1.0/photos";

/// Photo resource representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PhotoResponse {
    /// Photo ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Upload time in epoch seconds.
    pub upload_date: i64,
    /// Visibility flag.
    pub public: bool,
    /// Resource URI of this photo.
    #[schema(example = "/api/v1.0/photos/1")]
    pub uri: String,
    /// Stored filename, served under `/static/uploads/`.
    pub filename: String,
}

impl From<&Photo> for PhotoResponse {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title.clone(),
            upload_date: photo.upload_date,
            public: photo.public,
            uri: format!("{}/{}", PHOTOS_PATH, photo.id),
            filename: photo.filename.clone(),
        }
    }
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            uri: format!("{}/{}", PHOTOS_PATH, photo.id),
            id: photo.id,
            title: photo.title,
            upload_date: photo.upload_date,
            public: photo.public,
            filename: photo.filename,
        }
    }
}

/// Plain acknowledgement message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message text.
    #[schema(example = "Successfully deleted")]
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
