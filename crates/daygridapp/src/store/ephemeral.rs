use super::kv::KeyValueArea;
use crate::error::Result;
use crate::model::{DayKey, EntryMap, EntryRecord, JournalData};

/// Key under which the journal document lives in the key/value area.
pub const DEFAULT_ENTRIES_KEY: &str = "journal-entries";

/// Journal kept in the app-private key/value area.
///
/// Always available and needs no consent. The whole document is rewritten on
/// every change. Failures never surface to the caller: reads degrade to an
/// empty journal and a failed write is logged and leaves the stored document
/// as it was.
pub struct EphemeralStore<K: KeyValueArea> {
    area: K,
    key: String,
}

impl<K: KeyValueArea> EphemeralStore<K> {
    pub fn new(area: K) -> Self {
        Self::with_key(area, DEFAULT_ENTRIES_KEY)
    }

    pub fn with_key(area: K, key: &str) -> Self {
        Self {
            area,
            key: key.to_string(),
        }
    }

    pub fn area(&self) -> &K {
        &self.area
    }

    pub fn is_supported(&self) -> bool {
        self.area.is_available()
    }

    fn read_document(&self) -> JournalData {
        match self.area.get_item(&self.key) {
            Ok(Some(raw)) => JournalData::parse_lenient(&raw),
            Ok(None) => JournalData::default(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read local journal");
                JournalData::default()
            }
        }
    }

    fn store_document(&self, data: &JournalData) -> Result<()> {
        self.area.set_item(&self.key, &data.to_json()?)
    }

    fn write_document(&self, data: &JournalData) {
        if let Err(e) = self.store_document(data) {
            tracing::error!(error = %e, "failed to write local journal");
        }
    }

    fn put(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        let mut data = self.read_document();
        data.insert(key, record.clone())?;
        self.store_document(&data)
    }

    pub fn save_entry(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        if let Err(e) = self.put(key, record) {
            tracing::error!(key = %key, error = %e, "failed to save local entry");
        }
        Ok(())
    }

    /// Write used while migrating into this store: a failed write is
    /// returned so the source is not cleared.
    pub fn save_entry_for_migration(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        self.put(key, record)
    }

    pub fn get_entry(&self, key: &DayKey) -> Result<Option<EntryRecord>> {
        Ok(self.read_document().get(key))
    }

    pub fn get_all_entries(&self) -> Result<EntryMap> {
        Ok(self.read_document().entry_map())
    }

    pub fn delete_entry(&self, key: &DayKey) -> Result<()> {
        let mut data = self.read_document();
        if data.remove(key) {
            self.write_document(&data);
        }
        Ok(())
    }

    pub fn has_entries(&self) -> bool {
        !self.read_document().entries.is_empty()
    }

    /// Strict read used before a migration clears this store: a document that
    /// cannot be read or parsed is an error instead of an empty journal.
    pub fn get_all_entries_for_migration(&self) -> Result<EntryMap> {
        match self.area.get_item(&self.key)? {
            Some(raw) => JournalData::parse(&raw)?.strict_entry_map(),
            None => Ok(EntryMap::new()),
        }
    }

    pub fn clear_all(&self) -> Result<()> {
        if let Err(e) = self.area.remove_item(&self.key) {
            tracing::error!(error = %e, "failed to clear local journal");
        }
        Ok(())
    }
}
