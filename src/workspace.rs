//! Job-scoped scratch directories
//!
//! Multi-page pipelines (PDF -> slides) need one intermediate file per page.
//! A [`TempWorkspace`] is a uniquely named directory under the system temp
//! root, owned by the operation that created it and deleted best-effort when
//! that operation finishes, success or failure. Deletion failure is never
//! surfaced to the caller.

use crate::error::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A uniquely named scratch directory, removed on drop.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
}

impl TempWorkspace {
    /// Create a fresh workspace under `<tmp>/pdf-convert/<prefix>-<uuid>`.
    pub fn new(prefix: &str) -> Result<Self> {
        let path = std::env::temp_dir()
            .join("pdf-convert")
            .join(format!("{}-{}", prefix, Uuid::new_v4().simple()));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "failed to remove temp workspace");
        }
    }
}
