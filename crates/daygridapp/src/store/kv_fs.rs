use super::kv::KeyValueArea;
use crate::error::{JournalError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Key/value area persisted as one JSON object in a file of the app data dir.
///
/// Every call reads the whole file; writes go through a temp file and a
/// rename so a crash never leaves a truncated area.
#[derive(Debug, Clone)]
pub struct FsKvArea {
    path: PathBuf,
}

impl FsKvArea {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(JournalError::Io)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let map = serde_json::from_str(&content).map_err(JournalError::Serialization)?;
        Ok(map)
    }

    fn store(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| JournalError::Store(format!("No parent for {}", self.path.display())))?;
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(JournalError::Io)?;
        }

        let content = serde_json::to_string_pretty(map).map_err(JournalError::Serialization)?;
        let tmp = parent.join(format!(".kv-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(JournalError::Io)?;
        fs::rename(&tmp, &self.path).map_err(JournalError::Io)?;
        Ok(())
    }
}

impl KeyValueArea for FsKvArea {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.store(&map)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.store(&map)?;
        }
        Ok(())
    }
}
