//! Gallery - a minimal photo gallery backend.
//!
//! Photo records live in SQLite, uploaded image files live in a flat upload
//! directory, and both are exposed through a small REST API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod photo;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{GalleryError, Result};
pub use file::UploadStorage;
pub use photo::{NewPhoto, Photo, PhotoField, PhotoRepository, PhotoUpdate};
pub use web::WebServer;
