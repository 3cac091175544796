//! Web API module for the gallery.
//!
//! This module provides the REST API for photo records and serves the
//! uploaded image files.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use openapi::{create_swagger_router, ApiDoc};
pub use router::{create_health_router, create_router};
pub use server::WebServer;
