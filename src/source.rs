//! JSON file sources with an invalidatable parse cache.
//!
//! Every `load` reads the file; the cached parse is reused only when the
//! bytes are identical to the ones it was parsed from.

use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

struct Cached<T> {
    bytes: Vec<u8>,
    value: Arc<T>,
}

/// One JSON file deserialized into `T`.
pub struct JsonSource<T> {
    path: PathBuf,
    caching: bool,
    cached: RwLock<Option<Cached<T>>>,
}

impl<T: DeserializeOwned> JsonSource<T> {
    pub fn new(path: impl Into<PathBuf>, caching: bool) -> Self {
        Self {
            path: path.into(),
            caching,
            cached: RwLock::new(None),
        }
    }

    /// Load the source, reusing the cached parse when the content is unchanged.
    pub async fn load(&self) -> Result<Arc<T>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;

        if self.caching {
            if let Some(value) = self.cached_if_same(&bytes) {
                return Ok(value);
            }
        }

        let value: Arc<T> = Arc::new(serde_json::from_slice(&bytes).map_err(|source| {
            SourceError::Parse {
                path: self.path.clone(),
                source,
            }
        })?);
        debug!("Loaded {}", self.path.display());

        if self.caching {
            let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
            *cached = Some(Cached {
                bytes,
                value: Arc::clone(&value),
            });
        }

        Ok(value)
    }

    /// Drop the cached parse so the next `load` parses the file again.
    pub fn invalidate(&self) {
        let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
        *cached = None;
    }

    fn cached_if_same(&self, bytes: &[u8]) -> Option<Arc<T>> {
        let cached = self.cached.read().unwrap_or_else(|e| e.into_inner());
        cached
            .as_ref()
            .filter(|entry| entry.bytes == bytes)
            .map(|entry| Arc::clone(&entry.value))
    }
}
