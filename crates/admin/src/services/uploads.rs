//! Saree image uploads.
//!
//! Images are written to the shared upload directory that both binaries
//! serve under `/uploads`. Stored names are prefixed with a UTC timestamp
//! so repeated uploads of the same file never collide.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image extensions (lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Errors that can occur when storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing usable was left of the client file name.
    #[error("invalid file name")]
    InvalidFilename,

    /// The extension is not an accepted image type.
    #[error("unsupported image type: {0}")]
    UnsupportedExtension(String),

    /// The file was empty.
    #[error("uploaded file is empty")]
    Empty,

    /// The file exceeds [`MAX_UPLOAD_BYTES`].
    #[error("uploaded file is larger than {MAX_UPLOAD_BYTES} bytes")]
    TooLarge,

    /// Writing the file failed.
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduce a client-supplied file name to a safe ASCII name.
///
/// Non-ASCII characters are dropped, path separators and whitespace become
/// `_`, anything outside `[A-Za-z0-9_.-]` is removed, and leading or
/// trailing dots and underscores are stripped. Returns `None` when nothing
/// is left.
#[must_use]
pub fn secure_filename(name: &str) -> Option<String> {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Sanitized name plus a checked extension, ready to store.
fn checked_filename(name: &str) -> Result<String, UploadError> {
    let filename = secure_filename(name).ok_or(UploadError::InvalidFilename)?;

    let extension = Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension(extension));
    }

    Ok(filename)
}

/// Writes and removes files in the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and write an uploaded image, returning the stored file name.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] if the name, type or size is rejected, or
    /// if the file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let filename = checked_filename(original_name)?;
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }

        let stored = format!("{}_{filename}", Utc::now().format("%Y%m%d%H%M%S%6f"));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored), bytes).await?;

        tracing::info!(file = %stored, size = bytes.len(), "Stored upload");
        Ok(stored)
    }

    /// Remove a stored file. Failures are logged and otherwise ignored.
    pub async fn remove(&self, stored_name: &str) {
        // Never follow names that could leave the upload directory.
        if secure_filename(stored_name).as_deref() != Some(stored_name) {
            tracing::warn!(file = %stored_name, "Refusing to remove unexpected upload name");
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.dir.join(stored_name)).await {
            tracing::warn!(file = %stored_name, error = %e, "Failed to remove upload");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My Saree.JPG").as_deref(), Some("My_Saree.JPG"));
        assert_eq!(
            secure_filename("../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(
            secure_filename("C:\\photos\\silk red.png").as_deref(),
            Some("C_photos_silk_red.png")
        );
        assert_eq!(secure_filename(".hidden.webp").as_deref(), Some("hidden.webp"));
        assert_eq!(secure_filename("café (1).gif").as_deref(), Some("caf_1.gif"));
        assert_eq!(secure_filename("..."), None);
        assert_eq!(secure_filename("साड़ी"), None);
    }

    #[test]
    fn test_checked_filename_extensions() {
        assert_eq!(checked_filename("maroon.JPEG").unwrap(), "maroon.JPEG");
        assert!(checked_filename("emerald.webp").is_ok());
        assert!(matches!(
            checked_filename("script.svg"),
            Err(UploadError::UnsupportedExtension(ext)) if ext == "svg"
        ));
        assert!(matches!(
            checked_filename("noextension"),
            Err(UploadError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            checked_filename("///"),
            Err(UploadError::InvalidFilename)
        ));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = std::env::temp_dir().join(format!("saree-uploads-{}", uuid::Uuid::new_v4()));
        let store = UploadStore::new(&dir);

        let stored = store.save("red silk.png", b"\x89PNG").await.unwrap();
        assert!(stored.ends_with("_red_silk.png"));
        // %Y%m%d%H%M%S%6f is 20 digits
        assert_eq!(stored.find('_'), Some(20));
        assert!(dir.join(&stored).exists());

        store.remove(&stored).await;
        assert!(!dir.join(&stored).exists());

        assert!(matches!(
            store.save("empty.png", b"").await,
            Err(UploadError::Empty)
        ));
        let big = vec![0_u8; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(
            store.save("big.png", &big).await,
            Err(UploadError::TooLarge)
        ));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
