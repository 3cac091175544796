//! Authentication helpers.
//!
//! Only password hashing and verification live here; sessions and tokens are
//! not part of the gallery.

mod password;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
