use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Fs42Error, Result};

/// Destination for the files reconstructed by the splitter.
pub trait StorageProvider {
    /// Stores `content` at `path`, replacing whatever was there.
    fn store_file(&mut self, path: &Path, content: &str) -> Result<()>;
}

/// Writes reconstructed files to disk, creating parent directories as needed.
pub struct DiskStorage;

impl DiskStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiskStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageProvider for DiskStorage {
    fn store_file(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Fs42Error::write(parent, e))?;
        }
        fs::write(path, content).map_err(|e| Fs42Error::write(path, e))
    }
}

/// Keeps reconstructed files in memory. Backs `split --dry-run`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl StorageProvider for MemoryStorage {
    fn store_file(&mut self, path: &Path, content: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
