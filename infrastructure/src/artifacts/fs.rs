//! Filesystem artifact store.

use async_trait::async_trait;
use nl2plan_application::ports::artifact_store::{ArtifactError, ArtifactStore};
use std::path::Path;
use tracing::debug;

/// Writes artifacts as UTF-8 files, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactStore;

impl FsArtifactStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn write(&self, path: &Path, contents: &str) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ArtifactError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| ArtifactError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
