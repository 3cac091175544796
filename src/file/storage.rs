//! Upload storage for photo files.
//!
//! Files live flat under the upload directory, keyed by their sanitized
//! filename:
//! ```text
//! {upload_dir}/
//! ├── hello.jpg
//! ├── hello-1.jpg
//! └── sunset.png
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::MAX_FILENAME_LENGTH;
use crate::{GalleryError, Result};

/// How many numbered variants to try before giving up on a name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Storage for uploaded photo files.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Directory holding the uploaded files.
    base_path: PathBuf,
    /// Allowed extensions, lowercase without the leading dot.
    allowed_extensions: Vec<String>,
}

impl UploadStorage {
    /// Create a new UploadStorage.
    ///
    /// The upload directory will be created if it doesn't exist.
    pub fn new<I, S>(base_path: impl Into<PathBuf>, allowed_extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        Ok(Self {
            base_path,
            allowed_extensions,
        })
    }

    /// Get the upload directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the allowed extensions.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Check that a filename has an extension from the allow-list.
    ///
    /// The comparison is case-insensitive.
    pub fn is_allowed(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            _ => false,
        }
    }

    /// Reduce a client-supplied filename to a safe basename.
    ///
    /// Directory components are dropped, whitespace becomes `_`, and only
    /// ASCII alphanumerics, `.`, `-` and `_` are kept. Returns `None` when
    /// nothing usable remains.
    pub fn sanitize_filename(filename: &str) -> Option<String> {
        let basename = filename
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or("")
            .trim();

        let cleaned: String = basename
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();

        let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');
        if cleaned.is_empty() {
            return None;
        }

        Some(Self::truncate_name(cleaned))
    }

    /// Save content under the sanitized filename.
    ///
    /// If the name is already taken, a numeric suffix is added before the
    /// extension (`hello.jpg` becomes `hello-1.jpg`). Returns the stored name.
    pub fn save(&self, content: &[u8], filename: &str) -> Result<String> {
        let sanitized = Self::sanitize_filename(filename)
            .ok_or_else(|| GalleryError::Storage(format!("invalid filename: {filename:?}")))?;

        if !self.is_allowed(&sanitized) {
            return Err(GalleryError::Storage(format!(
                "file type not allowed: {sanitized}"
            )));
        }

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                sanitized.clone()
            } else {
                Self::numbered_name(&sanitized, attempt)
            };
            let path = self.base_path.join(&candidate);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = file.write_all(content) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(e.into());
            }

            tracing::debug!(stored_name = %candidate, bytes = content.len(), "Saved upload");
            return Ok(candidate);
        }

        Err(GalleryError::Storage(format!(
            "no free filename for {sanitized}"
        )))
    }

    /// Load a stored file.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(stored_name)?;

        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(GalleryError::NotFound(format!("File: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub fn remove(&self, stored_name: &str) -> Result<bool> {
        let path = self.path_for(stored_name)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a stored file exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.path_for(stored_name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Get the full path for a stored name.
    ///
    /// Names that could escape the upload directory are rejected.
    pub fn path_for(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name == "."
            || stored_name == ".."
            || stored_name.contains(['/', '\\'])
        {
            return Err(GalleryError::Storage(format!(
                "invalid stored name: {stored_name:?}"
            )));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Build `stem-n.ext` from `stem.ext`.
    fn numbered_name(name: &str, n: u32) -> String {
        match name.rsplit_once('.') {
            Some((stem, ext)) => {
                let suffix = format!("-{n}.{ext}");
                let keep = MAX_FILENAME_LENGTH
                    .saturating_sub(suffix.len())
                    .min(stem.len());
                format!("{}{}", &stem[..keep], suffix)
            }
            None => format!("{name}-{n}"),
        }
    }

    /// Shorten the stem so the whole name fits the column, keeping the extension.
    fn truncate_name(name: &str) -> String {
        if name.len() <= MAX_FILENAME_LENGTH {
            return name.to_string();
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if ext.len() + 1 < MAX_FILENAME_LENGTH => {
                let keep = MAX_FILENAME_LENGTH - ext.len() - 1;
                format!("{}.{}", &stem[..keep.min(stem.len())], ext)
            }
            _ => name[..MAX_FILENAME_LENGTH].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, UploadStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), ["jpg", "jpeg", "png", "gif"]).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let upload_dir = temp_dir.path().join("static").join("uploads");

        assert!(!upload_dir.exists());

        let storage = UploadStorage::new(&upload_dir, ["jpg"]).unwrap();

        assert!(upload_dir.is_dir());
        assert_eq!(storage.base_path(), upload_dir);
    }

    #[test]
    fn test_new_normalizes_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), [".JPG", "Png", ""]).unwrap();
        assert_eq!(storage.allowed_extensions(), &["jpg", "png"]);
    }

    #[test]
    fn test_is_allowed() {
        let (_temp_dir, storage) = setup_storage();

        assert!(storage.is_allowed("hello.jpg"));
        assert!(storage.is_allowed("HELLO.JPG"));
        assert!(storage.is_allowed("archive.tar.png"));
        assert!(!storage.is_allowed("hello.txt"));
        assert!(!storage.is_allowed("hello"));
        assert!(!storage.is_allowed("hello."));
        assert!(!storage.is_allowed(""));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            UploadStorage::sanitize_filename("hello.jpg").as_deref(),
            Some("hello.jpg")
        );
        assert_eq!(
            UploadStorage::sanitize_filename("../../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            UploadStorage::sanitize_filename("C:\\Users\\me\\photo.png").as_deref(),
            Some("photo.png")
        );
        assert_eq!(
            UploadStorage::sanitize_filename("my summer photo.JPG").as_deref(),
            Some("my_summer_photo.JPG")
        );
        assert_eq!(
            UploadStorage::sanitize_filename("test<script>.png").as_deref(),
            Some("testscript.png")
        );
        assert_eq!(
            UploadStorage::sanitize_filename(".hidden.gif").as_deref(),
            Some("hidden.gif")
        );
    }

    #[test]
    fn test_sanitize_filename_nothing_left() {
        assert_eq!(UploadStorage::sanitize_filename(""), None);
        assert_eq!(UploadStorage::sanitize_filename(".."), None);
        assert_eq!(UploadStorage::sanitize_filename("dir/"), None);
        assert_eq!(UploadStorage::sanitize_filename("日本語"), None);
    }

    #[test]
    fn test_sanitize_truncates_long_names() {
        let long = format!("{}.jpeg", "a".repeat(300));
        let sanitized = UploadStorage::sanitize_filename(&long).unwrap();

        assert_eq!(sanitized.len(), MAX_FILENAME_LENGTH);
        assert!(sanitized.ends_with(".jpeg"));
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"Hello there", "hello.jpg").unwrap();

        assert_eq!(stored_name, "hello.jpg");
        assert_eq!(storage.load(&stored_name).unwrap(), b"Hello there");
        assert!(storage.base_path().join("hello.jpg").is_file());
    }

    #[test]
    fn test_save_sanitizes_name() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"data", "../outside/evil name.png").unwrap();

        assert_eq!(stored_name, "evil_name.png");
        assert!(storage.exists("evil_name.png"));
    }

    #[test]
    fn test_save_avoids_collisions() {
        let (_temp_dir, storage) = setup_storage();

        let first = storage.save(b"one", "hello.jpg").unwrap();
        let second = storage.save(b"two", "hello.jpg").unwrap();
        let third = storage.save(b"three", "hello.jpg").unwrap();

        assert_eq!(first, "hello.jpg");
        assert_eq!(second, "hello-1.jpg");
        assert_eq!(third, "hello-2.jpg");
        assert_eq!(storage.load(&first).unwrap(), b"one");
        assert_eq!(storage.load(&second).unwrap(), b"two");
    }

    #[test]
    fn test_save_rejects_disallowed_extension() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.save(b"data", "notes.txt");

        assert!(matches!(result, Err(GalleryError::Storage(_))));
        assert!(!storage.exists("notes.txt"));
    }

    #[test]
    fn test_save_rejects_unusable_name() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.save(b"data", "写真.jpg");
        assert!(matches!(result, Err(GalleryError::Storage(_))));
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"to delete", "delete.png").unwrap();
        assert!(storage.exists(&stored_name));

        assert!(storage.remove(&stored_name).unwrap());
        assert!(!storage.exists(&stored_name));
        assert!(!storage.remove(&stored_name).unwrap());
    }

    #[test]
    fn test_load_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.load("missing.jpg");
        assert!(matches!(result, Err(GalleryError::NotFound(_))));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let (_temp_dir, storage) = setup_storage();

        assert!(storage.path_for("../secret.jpg").is_err());
        assert!(storage.path_for("..").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.remove("a/b.jpg").is_err());
        assert!(!storage.exists("../secret.jpg"));
        assert_eq!(
            storage.path_for("ok.jpg").unwrap(),
            storage.base_path().join("ok.jpg")
        );
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(UploadStorage::numbered_name("hello.jpg", 3), "hello-3.jpg");
        assert_eq!(UploadStorage::numbered_name("a.b.png", 1), "a.b-1.png");
        assert_eq!(UploadStorage::numbered_name("noext", 2), "noext-2");

        let long = format!("{}.jpg", "a".repeat(124));
        let numbered = UploadStorage::numbered_name(&long, 7);
        assert_eq!(numbered.len(), MAX_FILENAME_LENGTH);
        assert!(numbered.ends_with("-7.jpg"));
    }

    #[test]
    fn test_binary_content() {
        let (_temp_dir, storage) = setup_storage();
        let content: Vec<u8> = (0..=255).collect();

        let stored_name = storage.save(&content, "binary.gif").unwrap();
        assert_eq!(storage.load(&stored_name).unwrap(), content);
    }
}
