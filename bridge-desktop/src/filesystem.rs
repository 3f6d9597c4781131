//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileMetadata, FileSystemAccess},
};
use bytes::Bytes;
use core_async::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Tokio-based file system implementation
///
/// All paths are taken as given; the cache directory returned by
/// [`get_cache_directory`](FileSystemAccess::get_cache_directory) is created
/// on first use.
pub struct TokioFileSystem {
    cache_dir: PathBuf,
}

impl TokioFileSystem {
    /// Create a new file system accessor rooted at the platform cache directory
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("mpc-media-cache");

        Self { cache_dir }
    }

    /// Create a new file system accessor with a custom cache directory
    pub fn with_cache_directory(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

impl Default for TokioFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn get_cache_directory(&self) -> Result<PathBuf> {
        if !fs::try_exists(&self.cache_dir)
            .await
            .map_err(Self::map_io_error)?
        {
            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(Self::map_io_error)?;
            debug!(path = ?self.cache_dir, "Created cache directory");
        }
        Ok(self.cache_dir.clone())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(Self::map_io_error)
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path).await.map_err(Self::map_io_error)?;

        Ok(FileMetadata {
            size: metadata.len(),
            modified_at: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            is_directory: metadata.is_dir(),
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(Self::map_io_error)?;
        trace!(path = ?path, "Created directory");
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(Self::map_io_error)?;
        trace!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).await?;
        }

        fs::write(path, data.as_ref())
            .await
            .map_err(Self::map_io_error)?;
        trace!(path = ?path, size = data.len(), "Wrote file");
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await.map_err(Self::map_io_error)?;
        trace!(from = ?from, to = ?to, "Renamed file");
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await.map_err(Self::map_io_error)?;
        trace!(path = ?path, "Deleted file");
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path).await.map_err(Self::map_io_error)?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(Self::map_io_error)?
        {
            entries.push(entry.path());
        }

        trace!(path = ?path, count = entries.len(), "Listed directory");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir() -> PathBuf {
        env::temp_dir().join(format!("bridge-desktop-test-{}", uuid::Uuid::new_v4()))
    }

    #[core_async::test]
    async fn test_custom_cache_directory_is_created() {
        let dir = scratch_dir();
        let fs = TokioFileSystem::with_cache_directory(dir.clone());

        let cache_dir = fs.get_cache_directory().await.unwrap();
        assert_eq!(cache_dir, dir);
        assert!(fs.exists(&dir).await.unwrap());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[core_async::test]
    async fn test_write_rename_read_delete() {
        let dir = scratch_dir();
        let fs = TokioFileSystem::with_cache_directory(dir.clone());
        let tmp = dir.join("nested").join("payload.tmp");
        let target = dir.join("nested").join("payload.blob");

        let data = Bytes::from("Hello, World!");
        fs.write_file(&tmp, data.clone()).await.unwrap();
        fs.rename(&tmp, &target).await.unwrap();

        assert!(!fs.exists(&tmp).await.unwrap());
        assert_eq!(fs.read_file(&target).await.unwrap(), data);
        assert_eq!(fs.metadata(&target).await.unwrap().size, 13);

        fs.delete_file(&target).await.unwrap();
        let err = fs.read_file(&target).await.unwrap_err();
        assert!(err.is_not_found());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[core_async::test]
    async fn test_directory_listing() {
        let dir = scratch_dir();
        let fs = TokioFileSystem::with_cache_directory(dir.clone());

        fs.write_file(&dir.join("a.blob"), Bytes::from(vec![0u8; 100]))
            .await
            .unwrap();
        fs.write_file(&dir.join("sub").join("b.blob"), Bytes::from(vec![0u8; 28]))
            .await
            .unwrap();

        let mut listed = fs.list_directory(&dir).await.unwrap();
        listed.sort();
        assert_eq!(listed, vec![dir.join("a.blob"), dir.join("sub")]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
