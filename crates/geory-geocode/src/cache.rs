//! Persistent cache of reverse-geocoding responses.
//!
//! Keyed by [`cache_key`]. The cache is write-through: every insert rewrites
//! the backing file, so an interrupted run keeps every lookup it already paid
//! for. Entries are never evicted.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::GeocodeError;
use crate::types::GeocodeResult;

/// Builds the cache key for a coordinate pair, e.g. `"51.5222357:-0.792038"`.
///
/// Each coordinate is written the way a JavaScript number converts to a
/// string, so cache files shared with the earlier importer keep matching.
#[must_use]
pub fn cache_key(lat: f64, lng: f64) -> String {
    format!("{}:{}", js_number(lat), js_number(lng))
}

/// Shortest round-trip digits, switching to exponent form below 1e-6 and
/// from 1e21 upwards (`1e-7`, `1.5e+21`). Negative zero prints as `0`.
#[allow(clippy::float_cmp)]
pub(crate) fn js_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let magnitude = value.abs();
    if magnitude < 1e-6 {
        format!("{value:e}")
    } else if magnitude >= 1e21 {
        format!("{value:e}").replacen('e', "e+", 1)
    } else {
        value.to_string()
    }
}

/// Mapping of [`cache_key`] to the response the service returned for it.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, GeocodeResult>,
}

impl GeocodeCache {
    /// Loads the cache stored at `path`.
    ///
    /// A missing file yields an empty cache that will be created on the first
    /// insert.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::CacheIo`] if the file exists but cannot be read.
    /// - [`GeocodeError::CacheFormat`] if the file is not a JSON object of
    ///   geocoding responses.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, GeocodeError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| GeocodeError::CacheFormat {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(GeocodeError::CacheIo {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "loaded places cache"
        );

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// A cache with no backing file. Inserts are kept for the lifetime of the
    /// value only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GeocodeResult> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `result` under `key` and immediately persists the whole cache.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::CacheIo`] if the backing file cannot be written.
    /// The entry stays in memory either way.
    pub fn insert(&mut self, key: String, result: GeocodeResult) -> Result<(), GeocodeError> {
        self.entries.insert(key, result);
        self.persist()
    }

    /// Writes the cache to its backing file, creating parent directories as
    /// needed. A no-op for in-memory caches.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::CacheIo`] if the file cannot be written.
    pub fn persist(&self) -> Result<(), GeocodeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source: io::Error| GeocodeError::CacheIo {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let serialized = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            GeocodeError::CacheFormat {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(path, serialized).map_err(io_err)?;
        Ok(())
    }
}
