//! Photo types.

use super::MAX_TITLE_LENGTH;
use crate::{GalleryError, Result};

/// A photo record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Photo {
    /// Unique photo ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Upload time in epoch seconds.
    pub upload_date: i64,
    /// Whether the photo is visible to everyone.
    pub public: bool,
    /// Stored filename under the upload directory.
    pub filename: String,
    /// Owning user, if any.
    pub user_id: Option<i64>,
}

/// Data for creating a new photo.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    /// Title.
    pub title: String,
    /// Upload time in epoch seconds.
    pub upload_date: i64,
    /// Visibility flag.
    pub public: bool,
    /// Stored filename.
    pub filename: String,
    /// Owning user.
    pub user_id: Option<i64>,
}

impl NewPhoto {
    /// Create a private, unowned photo.
    pub fn new(title: impl Into<String>, upload_date: i64, filename: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            upload_date,
            public: false,
            filename: filename.into(),
            user_id: None,
        }
    }

    /// Set the visibility flag.
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Set the owning user.
    pub fn with_owner(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// A single mutable photo field with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoField {
    /// New title.
    Title(String),
    /// New visibility flag.
    Public(bool),
}

impl PhotoField {
    /// Column name for this field.
    pub fn column(&self) -> &'static str {
        match self {
            PhotoField::Title(_) => "title",
            PhotoField::Public(_) => "public",
        }
    }

    /// Check the value before it is written.
    pub fn validate(&self) -> Result<()> {
        match self {
            PhotoField::Title(title) => validate_title(title),
            PhotoField::Public(_) => Ok(()),
        }
    }
}

/// Partial update of a photo. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PhotoUpdate {
    /// New title.
    pub title: Option<String>,
    /// New visibility flag.
    pub public: Option<bool>,
}

impl PhotoUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the visibility flag.
    pub fn public(mut self, public: bool) -> Self {
        self.public = Some(public);
        self
    }

    /// Check if the update has no changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.public.is_none()
    }

    /// Split into individual field updates, title first.
    pub fn into_fields(self) -> Vec<PhotoField> {
        let mut fields = Vec::with_capacity(2);
        if let Some(title) = self.title {
            fields.push(PhotoField::Title(title));
        }
        if let Some(public) = self.public {
            fields.push(PhotoField::Public(public));
        }
        fields
    }
}

/// Check that a title is not blank and fits the column.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(GalleryError::Validation(
            "title must not be blank".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(GalleryError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}
