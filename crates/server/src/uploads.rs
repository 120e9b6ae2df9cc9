//! Local storage for uploaded token images
//!
//! Files are named `<unix-millis><ext>`. Nothing is ever cleaned up, and two
//! uploads in the same millisecond with the same extension overwrite each other.

use coinforge_core::{ImageUpload, LaunchResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mount point of the upload directory on the HTTP server
pub const UPLOADS_PREFIX: &str = "/uploads";

/// A saved upload and the URLs it is reachable under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
    /// Path relative to the server root, e.g. `/uploads/1700000000000.png`
    pub relative_url: String,
    /// Absolute URL built from the configured public base
    pub public_url: String,
}

pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the image to disk under a timestamp-derived name
    pub async fn save(&self, image: &ImageUpload) -> LaunchResult<StoredUpload> {
        let file_name = format!("{}{}", chrono::Utc::now().timestamp_millis(), image.extension());
        let path = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &image.bytes).await?;
        debug!("Stored upload {} ({} bytes)", path.display(), image.len());

        let relative_url = format!("{}/{}", UPLOADS_PREFIX, file_name);
        Ok(StoredUpload {
            public_url: format!("{}{}", self.public_base_url, relative_url),
            relative_url,
            file_name,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_uses_timestamp_and_extension() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path(), "http://localhost:3001/");

        let stored = store
            .save(&ImageUpload::new("logo.PNG", vec![1, 2, 3]))
            .await
            .unwrap();

        assert!(stored.file_name.ends_with(".PNG"));
        let stem = stored.file_name.trim_end_matches(".PNG");
        assert!(stem.parse::<i64>().is_ok());
        assert_eq!(stored.relative_url, format!("/uploads/{}", stored.file_name));
        assert_eq!(
            stored.public_url,
            format!("http://localhost:3001/uploads/{}", stored.file_name)
        );
        assert_eq!(std::fs::read(&stored.path).unwrap(), vec![1, 2, 3]);
    }
}
