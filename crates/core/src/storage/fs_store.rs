//! File system image store.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, info, warn};

use super::config::StorageConfig;
use super::error::StorageError;
use super::types::{ImageMetadata, StoredImage};
use crate::catalog::ResolvedArtwork;

/// File name of the current image.
pub const CURRENT_IMAGE_FILE: &str = "current-wallpaper.jpg";

/// File name of the current image's metadata record.
pub const METADATA_FILE: &str = "metadata.json";

const ARCHIVE_PREFIX: &str = "wallpaper-";
const ARCHIVE_SUFFIX: &str = ".jpg";

/// Write `bytes` to a uuid-named temp file next to `path`, then rename it over
/// `path`. On failure the temp file is removed and `path` is untouched.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let temp = write_temp(path, bytes).await?;
    promote(&temp, path).await
}

fn temp_path_for(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()))
}

/// Write `bytes` to a fresh temp file next to `path`.
async fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf, StorageError> {
    let temp = temp_path_for(path);
    if let Err(e) = fs::write(&temp, bytes).await {
        discard_temp(&temp).await;
        return Err(StorageError::write_failed(temp, e));
    }
    Ok(temp)
}

/// Rename `temp` over `path`, removing `temp` if the rename fails.
async fn promote(temp: &Path, path: &Path) -> Result<(), StorageError> {
    if let Err(e) = fs::rename(temp, path).await {
        discard_temp(temp).await;
        return Err(StorageError::move_failed(temp.to_path_buf(), path.to_path_buf(), e));
    }
    Ok(())
}

async fn discard_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove temp file {}: {}", temp.display(), e);
        }
    }
}

/// Ensure `dir` exists.
pub(crate) async fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        })
}

/// Stores the current image, its metadata, and archival copies in one
/// directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_IMAGE_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Persist `bytes` as the current image along with its metadata.
    ///
    /// Both records are staged as temp files before either is promoted. If the
    /// metadata cannot be promoted after the image was, the previous image is
    /// put back, so the stored pair is either entirely old or entirely new.
    pub async fn save_current(
        &self,
        bytes: &[u8],
        artwork: &ResolvedArtwork,
        source_id: &str,
    ) -> Result<StoredImage, StorageError> {
        ensure_dir(&self.dir).await?;

        let metadata = ImageMetadata {
            title: artwork.title.clone(),
            author: artwork.author.clone(),
            source_id: Some(source_id.to_string()),
            image_url: Some(artwork.image_url.clone()),
            fetched_at: Some(Utc::now()),
            sha256: Some(format!("{:x}", Sha256::digest(bytes))),
        };
        let encoded = serde_json::to_vec_pretty(&metadata)?;

        let current = self.current_path();
        let metadata_path = self.metadata_path();

        let image_temp = write_temp(&current, bytes).await?;
        let metadata_temp = match write_temp(&metadata_path, &encoded).await {
            Ok(temp) => temp,
            Err(e) => {
                discard_temp(&image_temp).await;
                return Err(e);
            }
        };

        let backup = match self.backup_current(&current).await {
            Ok(backup) => backup,
            Err(e) => {
                discard_temp(&image_temp).await;
                discard_temp(&metadata_temp).await;
                return Err(e);
            }
        };

        if let Err(e) = promote(&image_temp, &current).await {
            discard_temp(&metadata_temp).await;
            if let Some(backup) = &backup {
                discard_temp(backup).await;
            }
            return Err(e);
        }

        if let Err(e) = promote(&metadata_temp, &metadata_path).await {
            self.restore_current(&current, backup.as_deref()).await;
            return Err(e);
        }

        if let Some(backup) = &backup {
            discard_temp(backup).await;
        }

        info!(
            "Stored \"{}\" by {} ({} bytes) at {}",
            metadata.title,
            metadata.author,
            bytes.len(),
            current.display()
        );

        Ok(StoredImage {
            file_path: current,
            title: metadata.title,
            author: metadata.author,
        })
    }

    /// Keep a second link to the current image file, if there is one.
    async fn backup_current(&self, current: &Path) -> Result<Option<PathBuf>, StorageError> {
        match fs::metadata(current).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Ok(None),
        }

        let backup = temp_path_for(current);
        if let Err(e) = fs::hard_link(current, &backup).await {
            debug!("Hard link failed ({}), copying {} instead", e, current.display());
            if let Err(e) = fs::copy(current, &backup).await {
                discard_temp(&backup).await;
                return Err(StorageError::write_failed(backup, e));
            }
        }
        Ok(Some(backup))
    }

    /// Put the previous image back after a half-finished save. Without a
    /// previous image the new one is removed.
    async fn restore_current(&self, current: &Path, backup: Option<&Path>) {
        let restored = match backup {
            Some(backup) => fs::rename(backup, current).await,
            None => fs::remove_file(current).await,
        };
        if let Err(e) = restored {
            warn!(
                "Failed to restore previous image at {}: {}",
                current.display(),
                e
            );
            if let Some(backup) = backup {
                discard_temp(backup).await;
            }
        }
    }

    /// Read the metadata record, falling back to placeholder values when it is
    /// missing or unreadable.
    pub async fn read_metadata(&self) -> ImageMetadata {
        let path = self.metadata_path();
        match fs::read(&path).await {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable metadata {}: {}", path.display(), e);
                ImageMetadata::fallback()
            }),
            Err(_) => ImageMetadata::fallback(),
        }
    }

    /// The current image record, if a current image exists.
    pub async fn current(&self) -> Option<StoredImage> {
        let path = self.current_path();
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }

        let metadata = self.read_metadata().await;
        Some(StoredImage {
            file_path: path,
            title: metadata.title,
            author: metadata.author,
        })
    }

    /// The current image record and its bytes, if a current image exists.
    pub async fn load_current(&self) -> Result<Option<(StoredImage, Vec<u8>)>, StorageError> {
        let path = self.current_path();
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let metadata = self.read_metadata().await;
        Ok(Some((
            StoredImage {
                file_path: path,
                title: metadata.title,
                author: metadata.author,
            },
            bytes,
        )))
    }

    /// Copy the current image to a fresh timestamped archive name.
    pub async fn archive_current(&self) -> Result<PathBuf, StorageError> {
        let current = self.current_path();
        if !fs::try_exists(&current).await.unwrap_or(false) {
            return Err(StorageError::NoCurrentImage { path: current });
        }

        let mut millis = Utc::now().timestamp_millis();
        let mut archive = self.archive_path(millis);
        while fs::try_exists(&archive).await.unwrap_or(false) {
            millis += 1;
            archive = self.archive_path(millis);
        }

        fs::copy(&current, &archive)
            .await
            .map_err(|e| StorageError::ArchiveFailed {
                path: archive.clone(),
                source: e,
            })?;

        debug!("Archived current image to {}", archive.display());
        Ok(archive)
    }

    fn archive_path(&self, millis: i64) -> PathBuf {
        self.dir
            .join(format!("{}{:013}{}", ARCHIVE_PREFIX, millis, ARCHIVE_SUFFIX))
    }

    /// Archival copies, newest first.
    ///
    /// Ordered by modification time; equal times fall back to the file name,
    /// which embeds the creation timestamp.
    pub async fn list_archives(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut archives: Vec<(SystemTime, PathBuf)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_SUFFIX)) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    debug!("Skipping archive {}: {}", name, e);
                    continue;
                }
            };
            archives.push((modified, entry.path()));
        }

        archives.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        Ok(archives.into_iter().map(|(_, path)| path).collect())
    }

    /// Delete all but the `keep` newest archives. Returns how many were
    /// deleted. Individual deletion failures are logged and skipped.
    pub async fn prune_archives(&self, keep: usize) -> Result<usize, StorageError> {
        let archives = self.list_archives().await?;
        let mut removed = 0;

        for stale in archives.iter().skip(keep) {
            match fs::remove_file(stale).await {
                Ok(()) => {
                    debug!("Removed old archive {}", stale.display());
                    removed += 1;
                }
                Err(e) => warn!("Failed to remove old archive {}: {}", stale.display(), e),
            }
        }

        if removed > 0 {
            info!("Pruned {} old archives, keeping {}", removed, keep);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artwork(title: &str) -> ResolvedArtwork {
        ResolvedArtwork::new("https://images.test/1.jpg", Some(title), Some("Claude Monet"))
    }

    async fn temp_files(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".tmp") {
                names.push(name);
            }
        }
        names
    }

    #[tokio::test]
    async fn test_save_and_load_current() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path().join("store"));

        let stored = store
            .save_current(b"first-image", &artwork("Water Lilies"), "met")
            .await
            .unwrap();
        assert_eq!(stored.file_path, store.current_path());
        assert_eq!(stored.title, "Water Lilies");

        let (loaded, bytes) = store.load_current().await.unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(bytes, b"first-image");

        let metadata = store.read_metadata().await;
        assert_eq!(metadata.source_id.as_deref(), Some("met"));
        assert_eq!(
            metadata.sha256.as_deref(),
            Some(format!("{:x}", Sha256::digest(b"first-image")).as_str())
        );
        assert!(temp_files(store.dir()).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_current() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());

        store.save_current(b"one", &artwork("One"), "met").await.unwrap();
        store.save_current(b"two", &artwork("Two"), "artic").await.unwrap();

        let (loaded, bytes) = store.load_current().await.unwrap().unwrap();
        assert_eq!(loaded.title, "Two");
        assert_eq!(bytes, b"two");
    }

    #[tokio::test]
    async fn test_load_without_current_image() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path().join("missing"));

        assert!(store.load_current().await.unwrap().is_none());
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_metadata_falls_back() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        fs::write(store.current_path(), b"bytes").await.unwrap();
        fs::write(store.metadata_path(), b"{not json").await.unwrap();

        let (loaded, _) = store.load_current().await.unwrap().unwrap();
        assert_eq!(loaded.title, "Saved Image");
        assert_eq!(loaded.author, "Unknown");
    }

    #[tokio::test]
    async fn test_failed_replace_keeps_previous_and_cleans_temp() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        fs::write(store.metadata_path(), br#"{"title":"Old","author":"Someone"}"#)
            .await
            .unwrap();

        // A directory in place of the image file makes the rename fail.
        fs::create_dir(store.current_path()).await.unwrap();

        let result = store.save_current(b"new", &artwork("New"), "met").await;
        assert!(matches!(result, Err(StorageError::MoveFailed { .. })));

        assert_eq!(store.read_metadata().await.title, "Old");
        assert!(temp_files(store.dir()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_metadata_replace_restores_previous_image() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        store
            .save_current(b"old-image", &artwork("Old"), "met")
            .await
            .unwrap();

        // A directory in place of the metadata record fails its rename after
        // the image has already been promoted.
        fs::remove_file(store.metadata_path()).await.unwrap();
        fs::create_dir(store.metadata_path()).await.unwrap();

        let result = store.save_current(b"new-image", &artwork("New"), "met").await;
        assert!(matches!(result, Err(StorageError::MoveFailed { .. })));

        let bytes = fs::read(store.current_path()).await.unwrap();
        assert_eq!(bytes, b"old-image");
        assert!(temp_files(store.dir()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_first_save_leaves_no_image() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        fs::create_dir(store.metadata_path()).await.unwrap();

        let result = store.save_current(b"image", &artwork("New"), "met").await;
        assert!(result.is_err());

        assert!(!fs::try_exists(store.current_path()).await.unwrap());
        assert!(temp_files(store.dir()).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("record.json");

        write_atomic(&path, b"old").await.unwrap();
        write_atomic(&path, b"new").await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"new");
        assert!(temp_files(temp.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_archive_requires_current_image() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());

        let err = store.archive_current().await.unwrap_err();
        assert!(matches!(err, StorageError::NoCurrentImage { .. }));
    }

    #[tokio::test]
    async fn test_archive_names_are_unique() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        store.save_current(b"img", &artwork("A"), "met").await.unwrap();

        let first = store.archive_current().await.unwrap();
        let second = store.archive_current().await.unwrap();
        assert_ne!(first, second);

        let name = first.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("wallpaper-"));
        assert_eq!(name.len(), "wallpaper-".len() + 13 + ".jpg".len());
        assert_eq!(fs::read(&second).await.unwrap(), b"img");
    }

    #[tokio::test]
    async fn test_seven_promotions_keep_five_newest() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());

        let mut created = Vec::new();
        for i in 0..7 {
            store
                .save_current(format!("image-{}", i).as_bytes(), &artwork("A"), "met")
                .await
                .unwrap();
            created.push(store.archive_current().await.unwrap());
            store.prune_archives(5).await.unwrap();
        }

        let remaining = store.list_archives().await.unwrap();
        assert_eq!(remaining.len(), 5);

        let mut expected: Vec<_> = created[2..].to_vec();
        expected.reverse();
        assert_eq!(remaining, expected);
        assert!(fs::try_exists(store.current_path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_prune_ignores_other_files() {
        let temp = TempDir::new().unwrap();
        let store = FsImageStore::new(temp.path());
        store.save_current(b"img", &artwork("A"), "met").await.unwrap();
        fs::write(temp.path().join("settings.json"), b"{}").await.unwrap();

        for _ in 0..3 {
            store.archive_current().await.unwrap();
        }

        assert_eq!(store.prune_archives(1).await.unwrap(), 2);
        assert_eq!(store.list_archives().await.unwrap().len(), 1);
        assert!(fs::try_exists(temp.path().join("settings.json")).await.unwrap());
        assert!(fs::try_exists(store.metadata_path()).await.unwrap());
    }
}
