//! Answer persistence: one JSON file per valid submission.
//!
//! Records are named after the local wall-clock second
//! (`YYYY-MM-DDTHH:MM:SS.json`). Files are created with create-new semantics;
//! when a name is taken, numeric suffixes (`-1`, `-2`, ...) are tried so that
//! submissions within the same second never overwrite each other.

use crate::form::CleanedData;
use chrono::{Local, NaiveDateTime};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Upper bound on suffixed names tried for a single second.
const MAX_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize answers: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free record name for {stem} after {attempts} attempts")]
    Exhausted { stem: String, attempts: u32 },
}

/// Where a record was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation(PathBuf);

impl RecordLocation {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }
}

#[derive(Debug, Clone)]
pub struct AnswerStore {
    directory: PathBuf,
}

impl AnswerStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the answers directory if it does not exist yet.
    pub async fn ensure_directory(&self) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| PersistError::Io {
                path: self.directory.clone(),
                source,
            })
    }

    /// Write `data` under a name derived from the current local time.
    pub async fn persist(&self, data: &CleanedData) -> Result<RecordLocation, PersistError> {
        self.persist_at(data, Local::now().naive_local()).await
    }

    /// Write `data` under a name derived from `at`.
    pub async fn persist_at(
        &self,
        data: &CleanedData,
        at: NaiveDateTime,
    ) -> Result<RecordLocation, PersistError> {
        let json = serde_json::to_vec(data)?;
        let stem = record_stem(at);

        for attempt in 0..MAX_ATTEMPTS {
            let path = self.directory.join(record_file_name(&stem, attempt));
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(PersistError::Io { path, source }),
            };

            if let Err(source) = write_all(&mut file, &json).await {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove partial record {}: {}", path.display(), e);
                }
                return Err(PersistError::Io { path, source });
            }

            info!("✓ Stored answers in {}", path.display());
            return Ok(RecordLocation(path));
        }

        Err(PersistError::Exhausted {
            stem,
            attempts: MAX_ATTEMPTS,
        })
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

fn record_stem(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn record_file_name(stem: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.json", stem)
    } else {
        format!("{}-{}.json", stem, attempt)
    }
}
