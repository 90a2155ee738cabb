use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Image extensions accepted for profile photos
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Upload a valid image. Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores photo blobs on the local filesystem and hands back their URLs
///
/// Files land under `<root>/profile_photos/<profile_id>/` and are served
/// from `<base_url>/profile_photos/<profile_id>/`.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lower-cased extension of `file_name` if it is an accepted image type
    pub fn image_extension(file_name: Option<&str>) -> Result<String, MediaError> {
        let name = file_name.unwrap_or_default();
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(MediaError::UnsupportedType(name.to_string()))
        }
    }

    /// Write one image and return its URL
    pub async fn store(&self, profile_id: i64, extension: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let relative = format!("profile_photos/{}/{}.{}", profile_id, Uuid::new_v4(), extension);
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored {} bytes at {}", bytes.len(), path.display());

        Ok(format!("{}/{}", self.base_url, relative))
    }

    /// Best-effort removal of a previously stored image
    pub async fn remove(&self, url: &str) {
        let relative = match url.strip_prefix(&self.base_url) {
            Some(rest) => rest.trim_start_matches('/'),
            None => return,
        };
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::warn!("Failed to remove stored image {}: {}", url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(LocalMediaStorage::image_extension(Some("me.JPG")).unwrap(), "jpg");
        assert_eq!(LocalMediaStorage::image_extension(Some("a.b.png")).unwrap(), "png");
        assert!(LocalMediaStorage::image_extension(Some("notes.txt")).is_err());
        assert!(LocalMediaStorage::image_extension(None).is_err());
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let root = std::env::temp_dir().join(format!("mangalya-media-{}", Uuid::new_v4()));
        let storage = LocalMediaStorage::new(&root, "/media/");

        let url = storage.store(42, "png", b"not really a png").await.unwrap();
        assert!(url.starts_with("/media/profile_photos/42/"));
        assert!(url.ends_with(".png"));

        let relative = url.trim_start_matches("/media/");
        assert!(root.join(relative).exists());

        storage.remove(&url).await;
        assert!(!root.join(relative).exists());

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
