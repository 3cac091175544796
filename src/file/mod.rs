//! Upload file handling for the gallery.

mod storage;

pub use storage::UploadStorage;

/// Maximum length for a stored filename (in bytes, matching the column width).
pub const MAX_FILENAME_LENGTH: usize = 128;
