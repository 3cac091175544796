//! User repository for the gallery.
//!
//! This module provides CRUD operations for users in the database.

use sqlx::QueryBuilder;

use super::user::{NewUser, User, UserUpdate};
use super::DbPool;
use crate::{GalleryError, Result};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        new_user.validate()?;

        let result = sqlx::query(
            "INSERT INTO users (username, email, display_name, pass_hash) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.display_name)
        .bind(&new_user.pass_hash)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| GalleryError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, display_name, pass_hash FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, display_name, pass_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, display_name, pass_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Update a user by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }
        update.validate()?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref display_name) = update.display_name {
            separated.push("display_name = ");
            separated.push_bind_unseparated(display_name);
        }
        if let Some(ref pass_hash) = update.pass_hash {
            separated.push("pass_hash = ");
            separated.push_bind_unseparated(pass_hash);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a user by ID.
    ///
    /// Photos owned by the user are kept with their owner cleared.
    /// Returns true if a user was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users ordered by username.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, display_name, pass_hash FROM users ORDER BY username",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Check if a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Look up a user by username and verify the password.
    ///
    /// Returns `GalleryError::Auth` for an unknown user or a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .get_by_username(username)
            .await?
            .ok_or_else(|| GalleryError::Auth("invalid username or password".to_string()))?;

        if !user.check_password(password) {
            tracing::info!(username, "Password verification failed");
            return Err(GalleryError::Auth("invalid username or password".to_string()));
        }

        Ok(user)
    }
}
