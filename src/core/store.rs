//! Flat, name-keyed blob storage for personas and conversations.
//!
//! Each blob is a single file inside one directory. Names are single path
//! components; anything that could escape the directory is rejected.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::config::data::path_display;

#[derive(Debug)]
pub enum StoreError {
    /// The name is empty or not a single path component.
    InvalidName { kind: &'static str, name: String },
    NotFound { kind: &'static str, name: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidName { kind, name } => {
                write!(f, "invalid {kind} name '{name}'")
            }
            StoreError::NotFound { kind, name } => write!(f, "{kind} '{name}' not found"),
            StoreError::Io { path, source } => write!(f, "{}: {}", path_display(path), source),
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub struct BlobStore {
    kind: &'static str,
    dir: PathBuf,
}

impl BlobStore {
    /// `kind` names the blobs in error messages, e.g. "persona".
    pub fn new(kind: &'static str, dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of all stored blobs, sorted. A missing directory is empty.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(&self.dir, source)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.io_error(&self.dir, source))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            // in-flight temp files from `write`
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    pub fn read(&self, name: &str) -> Result<String, StoreError> {
        let path = self.path_for(name)?;
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    kind: self.kind,
                    name: name.to_string(),
                }
            } else {
                self.io_error(&path, source)
            }
        })
    }

    /// Replace the blob atomically; readers never see a partial write.
    pub fn write(&self, name: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).map_err(|source| self.io_error(&self.dir, source))?;

        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|source| self.io_error(&self.dir, source))?;
        temp_file
            .write_all(contents.as_bytes())
            .and_then(|_| temp_file.as_file().sync_all())
            .map_err(|source| self.io_error(&path, source))?;
        temp_file
            .persist(&path)
            .map_err(|err| self.io_error(&path, err.error))?;

        debug!(kind = self.kind, name, bytes = contents.len(), "stored blob");
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.starts_with('.')
            && !name.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StoreError::InvalidName {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(name))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
