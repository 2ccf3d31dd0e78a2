//! Timestamped JSON writer for received payloads.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name layout, one file per second.
pub const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Error type for persistence failures.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes trace payloads into a single directory.
#[derive(Debug, Clone)]
pub struct TraceStore {
    dir: PathBuf,
}

impl TraceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a payload received at `at` is written to.
    pub fn path_for(&self, at: DateTime<Local>) -> PathBuf {
        self.dir.join(format!("{}.json", at.format(FILE_NAME_FORMAT)))
    }

    /// Create the directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Write `payload` under the current local timestamp.
    pub async fn persist(&self, payload: &Value) -> Result<PathBuf, PersistError> {
        self.persist_at(payload, Local::now()).await
    }

    /// Write `payload` as if received at `at`, replacing any file already
    /// present for that second.
    pub async fn persist_at(
        &self,
        payload: &Value,
        at: DateTime<Local>,
    ) -> Result<PathBuf, PersistError> {
        self.ensure_dir().await?;

        let path = self.path_for(at);
        let bytes = serde_json::to_vec_pretty(payload)?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved trace data");
        Ok(path)
    }
}
