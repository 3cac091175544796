//! Database schema and migrations for the gallery.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users table
    r#"
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    display_name  TEXT NOT NULL,
    pass_hash     TEXT NOT NULL          -- Argon2 hash
);

CREATE INDEX idx_users_username ON users(username);
CREATE INDEX idx_users_email ON users(email);
"#,
    // v2: photos table
    r#"
CREATE TABLE photos (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    upload_date  INTEGER NOT NULL,        -- epoch seconds
    public       INTEGER NOT NULL DEFAULT 0,
    filename     TEXT NOT NULL,           -- stored name under the upload directory
    user_id      INTEGER REFERENCES users(id) ON DELETE SET NULL
);

CREATE INDEX idx_photos_title ON photos(title);
CREATE INDEX idx_photos_user_id ON photos(user_id);
"#,
];
