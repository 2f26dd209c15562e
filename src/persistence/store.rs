//! Key-value backends for save slots.

use super::SaveError;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Byte storage addressed by slot key.
pub trait SaveStore {
    /// `Ok(None)` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;

    fn contains(&self, key: &str) -> Result<bool, SaveError> {
        Ok(self.read(key)?.is_some())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Store under the platform data directory.
    pub fn default_location() -> Result<Self, SaveError> {
        let project_dirs = ProjectDirs::from("", "", "arena-core")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory"))?;
        Self::new(project_dirs.data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.sav"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file then renames, so a crash never leaves half a slot.
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("sav.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}
