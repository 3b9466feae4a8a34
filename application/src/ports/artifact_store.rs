//! Artifact store port
//!
//! Rendered files, plans, raw responses and batch summaries are persisted
//! through this port.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes UTF-8 text artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `contents` to `path`, creating parent directories as needed
    async fn write(&self, path: &Path, contents: &str) -> Result<(), ArtifactError>;

    /// Whether `path` already exists
    async fn exists(&self, path: &Path) -> bool;
}
