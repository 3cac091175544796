//! Photo resource handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::photo::{NewPhoto, PhotoRepository, PhotoUpdate};
use crate::web::dto::validation::{parse_epoch_seconds, parse_flag};
use crate::web::dto::{
    ApiPath, CreatePhotoForm, MessageResponse, PhotoResponse, UpdatePhotoRequest, UploadPhotoForm,
    ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};

use super::AppState;

/// Raw fields collected from an upload form.
#[derive(Default)]
struct UploadForm {
    title: Option<String>,
    upload_date: Option<String>,
    public: Option<String>,
    filename: Option<String>,
    content: Option<Vec<u8>>,
}

impl UploadForm {
    /// Drain a multipart body.
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Failed to read multipart field: {}", e);
            ApiError::bad_request("Invalid multipart data")
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    form.filename = Some(field.file_name().unwrap_or("").to_string());
                    form.content = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| {
                                tracing::warn!("Failed to read file content: {}", e);
                                ApiError::bad_request("Failed to read file")
                            })?
                            .to_vec(),
                    );
                }
                "title" | "upload_date" | "public" => {
                    let value = field.text().await.map_err(|e| {
                        tracing::warn!("Failed to read form field {}: {}", name, e);
                        ApiError::bad_request(format!("Invalid {} field", name))
                    })?;
                    match name.as_str() {
                        "title" => form.title = Some(value),
                        "upload_date" => form.upload_date = Some(value),
                        _ => form.public = Some(value),
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// GET /api/v1.0/photos - List all photos.
#[utoipa::path(
    get,
    path = "/api/v1.0/photos",
    tag = "photos",
    responses(
        (status = 200, description = "All photos, public or not", body = Vec<PhotoResponse>)
    )
)]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PhotoResponse>>, ApiError> {
    let repo = PhotoRepository::new(state.db.pool());
    let photos = repo.list().await?;

    Ok(Json(photos.iter().map(PhotoResponse::from).collect()))
}

/// GET /api/v1.0/photos/:id - Get a single photo.
#[utoipa::path(
    get,
    path = "/api/v1.0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo", body = PhotoResponse),
        (status = 400, description = "Non-numeric ID", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let repo = PhotoRepository::new(state.db.pool());
    let photo = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    Ok(Json(PhotoResponse::from(photo)))
}

/// POST /api/v1.0/photos - Upload a photo.
///
/// Request body: multipart/form-data with "title", "file" and optional
/// "upload_date" and "public" fields.
#[utoipa::path(
    post,
    path = "/api/v1.0/photos",
    tag = "photos",
    request_body(content = UploadPhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo uploaded", body = PhotoResponse),
        (status = 400, description = "Missing field, bad file type, invalid value or file too large", body = ErrorBody)
    )
)]
pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoResponse>), ApiError> {
    let form = UploadForm::read(&mut multipart).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No title provided"))?;

    let content = form
        .content
        .ok_or_else(|| ApiError::bad_request("No file part"))?;

    let filename = form.filename.unwrap_or_default();
    if filename.trim().is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }

    if !state.storage.is_allowed(&filename) {
        return Err(ApiError::bad_request(format!(
            "File type not allowed (allowed: {})",
            state.storage.allowed_extensions().join(", ")
        )));
    }

    let form_fields = CreatePhotoForm { title };
    form_fields.validate()?;

    let upload_date = match form.upload_date.as_deref() {
        Some(raw) => parse_epoch_seconds(raw)
            .ok_or_else(|| ApiError::bad_request("Invalid upload_date"))?,
        None => chrono::Utc::now().timestamp(),
    };

    let public = match form.public.as_deref() {
        Some(raw) => parse_flag(raw).ok_or_else(|| ApiError::bad_request("Invalid public flag"))?,
        None => false,
    };

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    let stored_name = state.storage.save(&content, &filename)?;

    let repo = PhotoRepository::new(state.db.pool());
    let new_photo =
        NewPhoto::new(form_fields.title, upload_date, &stored_name).with_public(public);

    let photo = match repo.create(&new_photo).await {
        Ok(photo) => photo,
        Err(e) => {
            if let Err(cleanup) = state.storage.remove(&stored_name) {
                tracing::warn!(
                    stored_name = %stored_name,
                    "Failed to clean up upload: {}",
                    cleanup
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        photo_id = photo.id,
        filename = %photo.filename,
        bytes = content.len(),
        "Photo uploaded"
    );

    Ok((StatusCode::CREATED, Json(PhotoResponse::from(photo))))
}

/// PUT /api/v1.0/photos/:id - Update title and/or visibility.
#[utoipa::path(
    put,
    path = "/api/v1.0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated photo", body = PhotoResponse),
        (status = 400, description = "Missing body, nothing to update or invalid field", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePhotoRequest>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let update = PhotoUpdate::from(req);
    if update.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let repo = PhotoRepository::new(state.db.pool());
    let photo = repo
        .apply(id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    tracing::info!(photo_id = photo.id, "Photo updated");

    Ok(Json(PhotoResponse::from(photo)))
}

/// DELETE /api/v1.0/photos/:id - Delete a photo and its file.
#[utoipa::path(
    delete,
    path = "/api/v1.0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = PhotoRepository::new(state.db.pool());
    let photo = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    match state.storage.remove(&photo.filename) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(
                photo_id = id,
                filename = %photo.filename,
                "Photo file already missing"
            );
        }
        Err(e) => {
            tracing::warn!(
                photo_id = id,
                filename = %photo.filename,
                "Failed to remove photo file: {}",
                e
            );
        }
    }

    if !repo.delete(id).await? {
        return Err(ApiError::not_found("Photo not found"));
    }

    tracing::info!(photo_id = id, "Photo deleted");

    Ok(Json(MessageResponse::new("Successfully deleted")))
}
