//! Blob storage for listing images.
//!
//! Uploads land under a path namespaced by owner and property id, and are
//! resolved to publicly fetchable URLs at read time. The backend trait
//! abstracts over filesystem, S3, or other providers; the filesystem backend
//! writes atomically (temp file + rename).

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use hearth_core::{Error, ImageRepository, Result};

/// Storage backend trait for different storage implementations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to the specified path.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Check if data exists at the specified path.
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Filesystem storage backend rooted at a base directory.
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// Validate that the storage backend can write, read, and delete files.
    ///
    /// Performs a full round-trip test at startup to catch filesystem issues
    /// (permission errors, missing directories) early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join(".health-check");
        let test_file = test_dir.join("test.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await; // Best-effort cleanup

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        debug!(
            subsystem = "storage",
            component = "blobs",
            op = "write",
            storage_path = %path,
            upload_bytes = data.len(),
            "Writing blob"
        );

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "blobs: create_dir_all failed");
                e
            })?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "blobs: rename failed");
            e
        })?;

        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        Ok(fs::read(full_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path);
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.full_path(path);
        Ok(fs::try_exists(full_path).await?)
    }
}

/// Strip a client-supplied filename down to a safe path segment.
///
/// Keeps alphanumerics, dots, hyphens, and underscores; everything else
/// becomes an underscore. Leading dots are dropped so a name can never
/// traverse upward or hide the file.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.').to_string();
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed
    }
}

/// Generate the storage path for an uploaded listing image.
///
/// Format: `{owner_id}/{property_id}/{image_id}-{sanitized_filename}`.
pub fn image_storage_path(owner_id: Uuid, property_id: Uuid, filename: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        owner_id,
        property_id,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

/// Persist an uploaded photo: blob first, then its reference row.
///
/// If recording the row fails, the just-written blob is removed so the store
/// does not accumulate files no image row points at.
pub async fn store_listing_image(
    storage: &dyn StorageBackend,
    images: &dyn ImageRepository,
    property_id: Uuid,
    storage_path: &str,
    data: &[u8],
    is_primary: bool,
) -> Result<()> {
    storage.write(storage_path, data).await?;

    if let Err(e) = images.add(property_id, storage_path, is_primary).await {
        if let Err(cleanup) = storage.delete(storage_path).await {
            warn!(
                storage_path = %storage_path,
                error = %cleanup,
                "Failed to remove blob after image row insert failed"
            );
        }
        return Err(e);
    }
    Ok(())
}

/// Resolves storage paths to publicly fetchable URLs.
#[derive(Debug, Clone)]
pub struct PublicUrlResolver {
    base_url: String,
}

impl PublicUrlResolver {
    /// Create a resolver serving blobs under `base_url` (trailing slash optional).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// The public URL for a stored path.
    pub fn resolve(&self, storage_path: &str) -> String {
        format!("{}/{}", self.base_url, storage_path.trim_start_matches('/'))
    }
}
