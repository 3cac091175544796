//! User model for the gallery.

use crate::auth::{hash_password, verify_password, PasswordError};
use crate::GalleryError;

/// Maximum username length (in characters).
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum email length (in characters).
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Maximum display name length (in characters).
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

/// A registered user who may own photos.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique).
    pub username: String,
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Salted password hash (Argon2 PHC string).
    pub pass_hash: String,
}

impl User {
    /// Check a plaintext password against the stored hash.
    pub fn check_password(&self, password: &str) -> bool {
        verify_password(password, &self.pass_hash).is_ok()
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Password hash (pre-hashed with Argon2).
    pub pass_hash: String,
}

impl NewUser {
    /// Create a new user from an already hashed password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        pass_hash: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            display_name: username.clone(),
            username,
            email: email.into(),
            pass_hash: pass_hash.into(),
        }
    }

    /// Create a new user, hashing the plaintext password.
    pub fn with_password(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, PasswordError> {
        let hash = hash_password(password)?;
        Ok(Self::new(username, email, hash))
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Check the column limits before insert.
    pub fn validate(&self) -> crate::Result<()> {
        if self.username.trim().is_empty() {
            return Err(GalleryError::Validation(
                "username must not be empty".to_string(),
            ));
        }
        if self.email.trim().is_empty() {
            return Err(GalleryError::Validation("email must not be empty".to_string()));
        }
        check_length("username", &self.username, MAX_USERNAME_LENGTH)?;
        check_length("email", &self.email, MAX_EMAIL_LENGTH)?;
        check_length("display_name", &self.display_name, MAX_DISPLAY_NAME_LENGTH)
    }
}

/// Data for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub display_name: Option<String>,
    /// New password hash.
    pub pass_hash: Option<String>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Replace the password, hashing the plaintext value.
    pub fn password(mut self, password: &str) -> Result<Self, PasswordError> {
        self.pass_hash = Some(hash_password(password)?);
        Ok(self)
    }

    /// Check if the update has no changes.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.pass_hash.is_none()
    }

    /// Check the column limits of the fields being set.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(ref email) = self.email {
            if email.trim().is_empty() {
                return Err(GalleryError::Validation("email must not be empty".to_string()));
            }
            check_length("email", email, MAX_EMAIL_LENGTH)?;
        }
        if let Some(ref display_name) = self.display_name {
            check_length("display_name", display_name, MAX_DISPLAY_NAME_LENGTH)?;
        }
        Ok(())
    }
}

fn check_length(field: &str, value: &str, max: usize) -> crate::Result<()> {
    if value.chars().count() > max {
        return Err(GalleryError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
