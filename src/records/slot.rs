//! Durable slots holding the serialized record collection.

use crate::error::{Result, RosterError};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default slot name for the user collection.
pub const DEFAULT_SLOT: &str = "users";

/// A single named byte slot.
///
/// Every write is a full overwrite; readers see either the previous or the
/// new contents, never a mix.
pub trait Slot {
    /// Read the slot. `None` when nothing has been written yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the slot contents.
    fn write(&self, bytes: &[u8]) -> Result<()>;
}

/// A slot backed by a JSON file inside a roster directory.
///
/// Holds an exclusive lock on the directory for its whole lifetime.
pub struct FileSlot {
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,
}

impl FileSlot {
    /// Open the slot `name` under `dir`, taking the directory lock.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let lock_file = Self::acquire_lock(dir)?;

        Ok(Self {
            path: dir.join(format!("{}.json", name)),
            _lock_file: lock_file,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(dir: &Path) -> Result<File> {
        let lock_file = File::create(dir.join("roster.lock"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| RosterError::Locked)?;

        Ok(lock_file)
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let temp = self.temp_path();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;

        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// An in-process slot. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemorySlot {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Current contents, for inspection.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().clone()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents.lock().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.contents.lock() = Some(bytes.to_vec());
        Ok(())
    }
}
