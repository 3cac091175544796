//! Extractors and parsers that turn bad input into `ApiError`s.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Missing or undecodable bodies and failed validation are all rejected
/// with 400; validation failures carry field-level details.
///
/// # Example
///
/// ```ignore
/// use gallery::web::dto::ValidatedJson;
///
/// async fn update_photo(
///     ValidatedJson(payload): ValidatedJson<UpdatePhotoRequest>,
/// ) -> Result<Json<PhotoResponse>, ApiError> {
///     // payload is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters whose parse failures answer with the JSON error body.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Parse a form value as epoch seconds.
///
/// Accepts an integer, or a float which is truncated toward zero.
pub fn parse_epoch_seconds(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return Some(secs);
    }
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs.abs() < i64::MAX as f64 => Some(secs.trunc() as i64),
        _ => None,
    }
}

/// Parse a form value as a boolean flag.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
