//! Photo repository.
//!
//! Every write commits on its own; multi-field updates are not atomic.

use super::model::{validate_title, NewPhoto, Photo, PhotoField, PhotoUpdate};
use crate::db::DbPool;
use crate::{GalleryError, Result};

const SELECT_PHOTO: &str = "SELECT id, title, upload_date, public, filename, user_id FROM photos";

/// Repository for photo CRUD operations.
pub struct PhotoRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PhotoRepository<'a> {
    /// Create a new PhotoRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List all photos ordered by ID.
    pub async fn list(&self) -> Result<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>(&format!("{SELECT_PHOTO} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        Ok(photos)
    }

    /// Get a photo by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>(&format!("{SELECT_PHOTO} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(photo)
    }

    /// Insert a new photo and return it with its assigned ID.
    pub async fn create(&self, new_photo: &NewPhoto) -> Result<Photo> {
        validate_title(&new_photo.title)?;

        let result = sqlx::query(
            "INSERT INTO photos (title, upload_date, public, filename, user_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_photo.title)
        .bind(new_photo.upload_date)
        .bind(new_photo.public)
        .bind(&new_photo.filename)
        .bind(new_photo.user_id)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(photo_id = id, filename = %new_photo.filename, "Photo created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GalleryError::NotFound("photo".to_string()))
    }

    /// Set a single field and persist it.
    ///
    /// Returns the updated photo, or None if not found.
    pub async fn update(&self, id: i64, field: &PhotoField) -> Result<Option<Photo>> {
        field.validate()?;

        let result = match field {
            PhotoField::Title(title) => {
                sqlx::query("UPDATE photos SET title = ? WHERE id = ?")
                    .bind(title)
                    .bind(id)
                    .execute(self.pool)
                    .await?
            }
            PhotoField::Public(public) => {
                sqlx::query("UPDATE photos SET public = ? WHERE id = ?")
                    .bind(*public)
                    .bind(id)
                    .execute(self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::debug!(photo_id = id, field = field.column(), "Photo field updated");
        self.get_by_id(id).await
    }

    /// Apply each present field of a partial update in turn.
    ///
    /// An empty update returns the photo unchanged.
    pub async fn apply(&self, id: i64, update: &PhotoUpdate) -> Result<Option<Photo>> {
        let mut photo = self.get_by_id(id).await?;
        if photo.is_none() {
            return Ok(None);
        }

        for field in update.clone().into_fields() {
            photo = self.update(id, &field).await?;
            if photo.is_none() {
                return Ok(None);
            }
        }

        Ok(photo)
    }

    /// Set the title.
    pub async fn set_title(&self, id: i64, title: impl Into<String>) -> Result<Option<Photo>> {
        self.update(id, &PhotoField::Title(title.into())).await
    }

    /// Flip the visibility flag.
    pub async fn toggle_public(&self, id: i64) -> Result<Option<Photo>> {
        let result = sqlx::query("UPDATE photos SET public = NOT public WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Assign or clear the owning user.
    pub async fn set_owner(&self, id: i64, user_id: Option<i64>) -> Result<Option<Photo>> {
        let result = sqlx::query("UPDATE photos SET user_id = ? WHERE id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// List photos owned by a user.
    pub async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Photo>> {
        let photos =
            sqlx::query_as::<_, Photo>(&format!("{SELECT_PHOTO} WHERE user_id = ? ORDER BY id"))
                .bind(user_id)
                .fetch_all(self.pool)
                .await?;
        Ok(photos)
    }

    /// Delete a photo record.
    ///
    /// The backing file is not touched. Returns true if a record was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all photos.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn seed(db: &Database) -> Photo {
        PhotoRepository::new(db.pool())
            .create(&NewPhoto::new("Photo1", 123456, "photo1.jpg"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_photo() {
        let db = setup_db().await;
        let photo = seed(&db).await;

        assert_eq!(photo.id, 1);
        assert_eq!(photo.title, "Photo1");
        assert_eq!(photo.upload_date, 123456);
        assert!(!photo.public);
        assert_eq!(photo.filename, "photo1.jpg");
        assert_eq!(photo.user_id, None);
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let db = setup_db().await;
        let repo = PhotoRepository::new(db.pool());

        repo.create(&NewPhoto::new("Test1", 123456, "test1.jpg"))
            .await
            .unwrap();
        repo.create(&NewPhoto::new("Test2", 999123, "test2.jpg").with_public(true))
            .await
            .unwrap();

        let photos = repo.list().await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].title, "Test1");
        assert!(photos[1].public);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = setup_db().await;
        seed(&db).await;

        let repo = PhotoRepository::new(db.pool());
        assert!(repo.get_by_id(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_title_keeps_public() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let updated = repo
            .update(photo.id, &PhotoField::Title("Photo1A".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Photo1A");
        assert!(!updated.public);
    }

    #[tokio::test]
    async fn test_update_public() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let updated = repo
            .update(photo.id, &PhotoField::Public(!photo.public))
            .await
            .unwrap()
            .unwrap();

        assert!(updated.public);
        assert_eq!(updated.title, "Photo1");
    }

    #[tokio::test]
    async fn test_update_missing_photo() {
        let db = setup_db().await;
        let repo = PhotoRepository::new(db.pool());

        let result = repo.update(9, &PhotoField::Public(true)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_long_title() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let result = repo
            .update(photo.id, &PhotoField::Title("x".repeat(129)))
            .await;
        assert!(matches!(result, Err(GalleryError::Validation(_))));

        let unchanged = repo.get_by_id(photo.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Photo1");
    }

    #[tokio::test]
    async fn test_apply_partial_update() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let update = PhotoUpdate::new().title("Update existing").public(true);
        let updated = repo.apply(photo.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.title, "Update existing");
        assert!(updated.public);
        assert_eq!(updated.filename, photo.filename);
        assert_eq!(updated.upload_date, photo.upload_date);
    }

    #[tokio::test]
    async fn test_apply_empty_update() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let unchanged = repo.apply(photo.id, &PhotoUpdate::new()).await.unwrap();
        assert_eq!(unchanged, Some(photo));

        assert!(repo.apply(99, &PhotoUpdate::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_apply_stops_on_invalid_field() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        // Title is applied first, so public is never reached.
        let update = PhotoUpdate::new().title("y".repeat(129)).public(true);
        assert!(repo.apply(photo.id, &update).await.is_err());

        let after = repo.get_by_id(photo.id).await.unwrap().unwrap();
        assert!(!after.public);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let result = repo.set_title(photo.id, "   ").await;
        assert!(matches!(result, Err(GalleryError::Validation(_))));

        let result = repo.create(&NewPhoto::new("", 1, "blank.jpg")).await;
        assert!(matches!(result, Err(GalleryError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_title() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let updated = repo
            .set_title(photo.id, "Photo1 new title")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Photo1 new title");
    }

    #[tokio::test]
    async fn test_toggle_public() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        let toggled = repo.toggle_public(photo.id).await.unwrap().unwrap();
        assert!(toggled.public);

        let toggled = repo.toggle_public(photo.id).await.unwrap().unwrap();
        assert!(!toggled.public);

        assert!(repo.toggle_public(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_owner_relationship() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let users = UserRepository::new(db.pool());
        let repo = PhotoRepository::new(db.pool());

        let owner = users
            .create(&NewUser::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();

        let owned = repo
            .create(&NewPhoto::new("Mine", 1, "mine.jpg").with_owner(owner.id))
            .await
            .unwrap();
        assert_eq!(owned.user_id, Some(owner.id));

        repo.set_owner(photo.id, Some(owner.id)).await.unwrap();
        let photos = repo.list_by_owner(owner.id).await.unwrap();
        assert_eq!(photos.len(), 2);

        // Deleting the owner keeps the photos and clears the reference.
        users.delete(owner.id).await.unwrap();
        assert!(repo.list_by_owner(owner.id).await.unwrap().is_empty());
        let orphan = repo.get_by_id(owned.id).await.unwrap().unwrap();
        assert_eq!(orphan.user_id, None);
    }

    #[tokio::test]
    async fn test_create_with_unknown_owner_fails() {
        let db = setup_db().await;
        let repo = PhotoRepository::new(db.pool());

        let result = repo
            .create(&NewPhoto::new("Ghost", 1, "ghost.jpg").with_owner(77))
            .await;
        assert!(matches!(result, Err(GalleryError::Database(_))));
    }

    #[tokio::test]
    async fn test_delete_photo() {
        let db = setup_db().await;
        let photo = seed(&db).await;
        let repo = PhotoRepository::new(db.pool());

        assert!(repo.delete(photo.id).await.unwrap());
        assert!(repo.get_by_id(photo.id).await.unwrap().is_none());
        assert!(!repo.delete(photo.id).await.unwrap());
    }
}
