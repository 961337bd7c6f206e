use crate::domain::KeyValueStore;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps each key in its own `<key>.json` file under one directory.
#[derive(Clone)]
pub struct FileSystemStore {
    state_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn get_path_for_key(&self, key: &str) -> PathBuf {
        let filename = key.replace(['/', '\\'], "_");
        self.state_dir.join(format!("{}.json", filename))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileSystemStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.get_path_for_key(key);
        if path.exists() {
            debug!("Reading {:?}", path);
            Ok(Some(fs::read(path)?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_dir(&self.state_dir)?;
        let path = self.get_path_for_key(key);
        debug!("Writing {} bytes to {:?}", value.len(), path);
        fs::write(path, value)?;
        Ok(())
    }
}
