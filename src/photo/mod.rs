//! Photo records.
//!
//! Photos carry metadata only; the image bytes live in the upload directory
//! (see [`crate::file::UploadStorage`]) under `Photo::filename`.

mod model;
mod repository;

pub use model::{validate_title, NewPhoto, Photo, PhotoField, PhotoUpdate};
pub use repository::PhotoRepository;

/// Maximum title length (in characters).
pub const MAX_TITLE_LENGTH: usize = 128;
