//! Profile picture storage
//!
//! Pictures live in a single directory, one file per profile, named after the
//! profile id with a fixed extension. Uploads are written to a temporary sibling
//! and renamed into place once flushed.

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct PictureStore {
    dir: PathBuf,
    extension: String,
    max_size: u64,
}

impl PictureStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, max_size: u64) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            max_size,
        }
    }

    /// Create the picture directory if it is missing
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await?;
        info!("Profile picture directory: {}", self.dir.display());
        Ok(())
    }

    /// Maximum accepted picture size in bytes
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Deterministic path for a profile's picture
    pub fn path_for(&self, profile_id: &str) -> Result<PathBuf, StorageError> {
        if profile_id.is_empty()
            || profile_id.contains(['/', '\\', '\0'])
            || profile_id.contains("..")
        {
            return Err(StorageError::InvalidPath(profile_id.to_string()));
        }
        Ok(self.dir.join(format!("{profile_id}.{}", self.extension)))
    }

    /// Store picture bytes for a profile and return the locator.
    pub async fn save(&self, profile_id: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let size = bytes.len() as u64;
        if size > self.max_size {
            return Err(StorageError::FileTooLarge {
                size,
                limit: self.max_size,
            });
        }

        let final_path = self.path_for(profile_id)?;
        let temp_path = final_path.with_extension(format!("{}.tmp", self.extension));

        if let Err(e) = write_file(&temp_path, bytes).await {
            error!("Failed to write picture {}: {e}", temp_path.display());
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            error!(
                "Failed to rename {} to {}: {e}",
                temp_path.display(),
                final_path.display()
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        info!("Stored profile picture {} ({size} bytes)", final_path.display());
        Ok(final_path.to_string_lossy().to_string())
    }

    /// Remove a stored picture. Failures are logged, not returned.
    pub async fn remove(&self, locator: &str) {
        if let Err(e) = fs::remove_file(locator).await {
            warn!("Failed to remove picture {locator}: {e}");
        }
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_picture_under_profile_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = PictureStore::new(dir.path(), "jpg", 1024);

        let locator = store.save("abc-123", b"0123456789").await.unwrap();

        assert_eq!(PathBuf::from(&locator), dir.path().join("abc-123.jpg"));
        assert_eq!(std::fs::read(&locator).unwrap(), b"0123456789");
        assert!(!dir.path().join("abc-123.jpg.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_oversized_picture() {
        let dir = tempfile::tempdir().unwrap();
        let store = PictureStore::new(dir.path(), "jpg", 4);

        let result = store.save("abc", b"too large").await;

        assert!(matches!(
            result,
            Err(StorageError::FileTooLarge { size: 9, limit: 4 })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejects_traversal_in_profile_id() {
        let store = PictureStore::new("pictures", "jpg", 1024);
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("a/b").is_err());
        assert!(store.path_for("").is_err());
    }

    #[tokio::test]
    async fn missing_directory_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PictureStore::new(dir.path().join("missing"), "jpg", 1024);

        let result = store.save("abc", b"data").await;

        assert!(matches!(result, Err(StorageError::IoError(_))));
    }

    #[tokio::test]
    async fn remove_deletes_stored_picture() {
        let dir = tempfile::tempdir().unwrap();
        let store = PictureStore::new(dir.path(), "png", 1024);
        store.ensure_dir().await.unwrap();

        let locator = store.save("xyz", b"data").await.unwrap();
        store.remove(&locator).await;

        assert!(!Path::new(&locator).exists());
    }
}
