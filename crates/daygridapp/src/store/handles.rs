use super::directory::DirectoryHandle;
use super::kv::KeyValueArea;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Id of the one record the capability store holds.
pub const DIRECTORY_HANDLE_ID: &str = "directory";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleRecord {
    pub id: String,
    pub handle: DirectoryHandle,
}

/// Persists the granted directory handle across sessions.
///
/// Kept in its own key/value area, separate from the journal document.
pub struct HandleStore<K: KeyValueArea> {
    area: K,
}

impl<K: KeyValueArea> HandleStore<K> {
    pub fn new(area: K) -> Self {
        Self { area }
    }

    pub fn load(&self) -> Result<Option<DirectoryHandle>> {
        match self.area.get_item(DIRECTORY_HANDLE_ID)? {
            Some(raw) => {
                let record: HandleRecord = serde_json::from_str(&raw)?;
                Ok(Some(record.handle))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self, handle: &DirectoryHandle) -> Result<()> {
        let record = HandleRecord {
            id: DIRECTORY_HANDLE_ID.to_string(),
            handle: handle.clone(),
        };
        let raw = serde_json::to_string(&record)?;
        self.area.set_item(DIRECTORY_HANDLE_ID, &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.area.remove_item(DIRECTORY_HANDLE_ID)
    }
}
