//! Local filesystem store for uploaded audio.
//!
//! Paths handed out by [`MediaStore`] are relative to its root and are what
//! gets persisted on the track row.

use std::io;
use std::path::{Path, PathBuf};

use musicrev_core::media::{ContentDigest, TRACKS_DIR};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored relative path against the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Create the tracks directory if it is missing.
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(TRACKS_DIR)).await
    }

    /// True when the tracks directory exists and is a directory.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::metadata(self.root.join(TRACKS_DIR))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Store `data` under its content digest.
    ///
    /// An existing file is reused only when its bytes match. New content is
    /// written to a temporary sibling and renamed into place, so a reader
    /// never sees a partial file at the digest path.
    pub async fn store_audio(&self, ext: &str, data: &[u8]) -> io::Result<StoredAudio> {
        let relative = ContentDigest::of(data).track_path(ext);
        let target = self.resolve(&relative);

        match tokio::fs::read(&target).await {
            Ok(existing) if existing == data => {
                tracing::debug!(path = %relative, "Audio already on disk");
                return Ok(StoredAudio { path: relative, created: false });
            }
            Ok(_) => tracing::warn!(path = %relative, "Replacing damaged audio file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        self.prepare().await?;
        let staging = target.with_extension(format!("{ext}.{}.part", Uuid::new_v4().simple()));
        if let Err(e) = write_then_rename(&staging, &target, data).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }

        tracing::info!(path = %relative, bytes = data.len(), "Stored audio file");
        Ok(StoredAudio { path: relative, created: true })
    }

    /// Remove a file written by [`store_audio`](Self::store_audio) whose
    /// track row was never created. Failures are logged, not returned.
    pub async fn discard(&self, relative: &str) {
        if let Err(e) = tokio::fs::remove_file(self.resolve(relative)).await {
            tracing::warn!(path = %relative, error = %e, "Failed to remove orphaned audio file");
        }
    }
}

/// Result of [`MediaStore::store_audio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    /// Path relative to the media root.
    pub path: String,
    /// False when identical content was already on disk.
    pub created: bool,
}

async fn write_then_rename(staging: &Path, target: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(staging).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(staging, target).await
}
