//! OpenAPI document and Swagger UI.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{MessageResponse, PhotoResponse, UpdatePhotoRequest, UploadPhotoForm};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};
use super::handlers::photo;

/// Path of the generated OpenAPI JSON.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Path of the Swagger UI.
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

#[derive(OpenApi)]
#[openapi(
    info(title = "Gallery API", description = "Photo gallery REST API"),
    paths(
        photo::list_photos,
        photo::get_photo,
        photo::create_photo,
        photo::update_photo,
        photo::delete_photo,
    ),
    components(schemas(
        PhotoResponse,
        MessageResponse,
        UpdatePhotoRequest,
        UploadPhotoForm,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    tags((name = "photos", description = "Photo records and uploads"))
)]
pub struct ApiDoc;

/// Create the router serving the Swagger UI and the OpenAPI JSON.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}
