//! Readers for the two Takeout inputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::TakeoutError;
use crate::types::{RecordsFile, SemanticFile};

/// `Records.json`, relative to the Takeout root.
pub const RECORDS_PATH: &str = "Location History (Timeline)/Records.json";
/// Directory of monthly semantic history files, relative to the Takeout root.
pub const SEMANTIC_HISTORY_PATH: &str = "Location History (Timeline)/Semantic Location History";

fn read_file(path: &Path) -> Result<String, TakeoutError> {
    fs::read_to_string(path).map_err(|source| TakeoutError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Reads the raw `locations` array of a `Records.json` file.
///
/// # Errors
///
/// - [`TakeoutError::Io`] if the file cannot be read.
/// - [`TakeoutError::Parse`] if it is not a records file.
pub fn read_location_records(path: &Path) -> Result<Vec<Value>, TakeoutError> {
    tracing::info!(path = %path.display(), "processing file");
    let contents = read_file(path)?;
    let file: RecordsFile =
        serde_json::from_str(&contents).map_err(|source| TakeoutError::Parse {
            context: path.display().to_string(),
            source,
        })?;
    Ok(file.locations)
}

/// Timeline objects carrying a `placeVisit`, read lazily file by file.
///
/// Files are every `*.json` below the root, visited depth-first with each
/// directory's entries sorted by file name. Only one file is held in memory
/// at a time.
#[derive(Debug)]
pub struct VisitSource {
    files: std::vec::IntoIter<PathBuf>,
    pending: std::vec::IntoIter<Value>,
}

impl VisitSource {
    /// Lists the semantic history files below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TakeoutError::Walk`] if `root` or a directory below it cannot
    /// be read.
    pub fn open(root: &Path) -> Result<Self, TakeoutError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| TakeoutError::Walk {
                root: root.display().to_string(),
                source,
            })?;
            if entry.file_type().is_file() && is_json_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        tracing::debug!(root = %root.display(), files = files.len(), "semantic history listed");

        Ok(Self {
            files: files.into_iter(),
            pending: Vec::new().into_iter(),
        })
    }

    fn load(path: &Path) -> Result<Vec<Value>, TakeoutError> {
        tracing::info!(path = %path.display(), "processing file");
        let contents = read_file(path)?;
        let file: SemanticFile =
            serde_json::from_str(&contents).map_err(|source| TakeoutError::Parse {
                context: path.display().to_string(),
                source,
            })?;
        Ok(file
            .timeline_objects
            .into_iter()
            .filter(|object| object.get("placeVisit").is_some())
            .collect())
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

impl Iterator for VisitSource {
    type Item = Result<Value, TakeoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(object) = self.pending.next() {
                return Some(Ok(object));
            }
            let path = self.files.next()?;
            match Self::load(&path) {
                Ok(objects) => self.pending = objects.into_iter(),
                Err(e) => {
                    // Stop after the first failure.
                    self.files = Vec::new().into_iter();
                    return Some(Err(e));
                }
            }
        }
    }
}
