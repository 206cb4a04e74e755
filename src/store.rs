use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable home for the serialized ledger snapshot.
pub trait SnapshotStore {
    /// load returns the stored snapshot, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, snapshot: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Keeps the snapshot in a single JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> FileStore {
        FileStore { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }
    fn save(&self, snapshot: &str) -> Result<(), StoreError> {
        // write beside the target then rename so a crash never leaves half a snapshot
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, snapshot).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }
}

pub struct MemoryStore {
    data: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            data: RefCell::new(None),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data.borrow().clone())
    }
    fn save(&self, snapshot: &str) -> Result<(), StoreError> {
        *self.data.borrow_mut() = Some(snapshot.to_string());
        Ok(())
    }
    fn clear(&self) -> Result<(), StoreError> {
        *self.data.borrow_mut() = None;
        Ok(())
    }
}
