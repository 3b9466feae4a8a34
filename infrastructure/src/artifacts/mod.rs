//! Artifact store adapters.

pub mod fs;

pub use fs::FsArtifactStore;
