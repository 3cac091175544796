//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::photo::PhotoUpdate;

/// Photo update request. Absent or null fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePhotoRequest {
    /// New title.
    #[serde(default)]
    #[validate(length(max = 128, message = "Title must be at most 128 characters"))]
    #[schema(example = "This is an update", max_length = 128)]
    pub title: Option<String>,
    /// New visibility flag.
    #[serde(default)]
    pub public: Option<bool>,
}

impl From<UpdatePhotoRequest> for PhotoUpdate {
    fn from(req: UpdatePhotoRequest) -> Self {
        PhotoUpdate {
            title: req.title,
            public: req.public,
        }
    }
}

/// Multipart upload form, for the API document only.
///
/// The handler reads the parts itself; see `create_photo`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoForm {
    /// Title, at most 128 characters.
    #[schema(example = "New file")]
    title: String,
    /// Epoch seconds; a float is truncated. Defaults to now.
    #[schema(example = 1718000000)]
    upload_date: Option<f64>,
    /// `true/false/1/0/yes/no/on/off`. Defaults to false.
    #[schema(example = "false")]
    public: Option<String>,
    /// Image file.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Text fields of a photo upload, checked once the multipart body is read.
#[derive(Debug, Validate)]
pub struct CreatePhotoForm {
    /// Title.
    #[validate(length(max = 128, message = "Title must be at most 128 characters"))]
    pub title: String,
}
