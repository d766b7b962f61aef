use super::access::{classify, AccessFailure, AccessProbe};
use super::directory::{DirectoryFs, DirectoryHandle, DirectoryPicker, DirectoryRequest};
use super::handles::HandleStore;
use super::kv::KeyValueArea;
use crate::error::{JournalError, Result};
use crate::model::{DayKey, EntryMap, EntryRecord, JournalData};
use std::cell::RefCell;
use std::io;

/// File holding the whole journal inside the chosen directory.
pub const DEFAULT_JOURNAL_FILE: &str = "journal.json";

/// Marker in the local key/value area telling the next session that a
/// directory was granted.
pub const DIRECTORY_MARKER_KEY: &str = "fs-directory-handle";

/// What `get_directory_path` reports when no directory is held.
pub const NO_DIRECTORY_SELECTED: &str = "No directory selected";

/// Outcome of folding legacy per-day files into the journal file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub unreadable: usize,
    pub unremoved: usize,
}

/// Journal kept as `journal.json` in a directory the user picked.
///
/// Holds the single directory handle. Access loss (directory deleted or
/// permission revoked) drops the in-memory handle and surfaces as
/// [`JournalError::AccessLost`].
pub struct DurableStore<K: KeyValueArea, F: DirectoryFs> {
    fs: F,
    local: K,
    handles: HandleStore<K>,
    handle: RefCell<Option<DirectoryHandle>>,
    journal_file: String,
}

impl<K: KeyValueArea, F: DirectoryFs> DurableStore<K, F> {
    /// `local` receives the directory marker, `capabilities` the handle record.
    pub fn new(fs: F, local: K, capabilities: K) -> Self {
        Self {
            fs,
            local,
            handles: HandleStore::new(capabilities),
            handle: RefCell::new(None),
            journal_file: DEFAULT_JOURNAL_FILE.to_string(),
        }
    }

    pub fn with_journal_file(mut self, name: &str) -> Self {
        self.journal_file = name.to_string();
        self
    }

    pub fn journal_file(&self) -> &str {
        &self.journal_file
    }

    pub fn is_supported(&self) -> bool {
        self.fs.is_supported()
    }

    pub fn handle(&self) -> Option<DirectoryHandle> {
        self.handle.borrow().clone()
    }

    pub fn has_directory(&self) -> bool {
        self.handle.borrow().is_some()
    }

    pub fn get_directory_path(&self) -> String {
        match &*self.handle.borrow() {
            Some(handle) => handle.name().to_string(),
            None => NO_DIRECTORY_SELECTED.to_string(),
        }
    }

    // --- Directory lifecycle ---

    pub fn request_directory(&self, picker: &dyn DirectoryPicker) -> DirectoryRequest {
        if !self.is_supported() {
            tracing::debug!("directory storage is not supported here");
            return DirectoryRequest::Failed;
        }

        let path = match picker.pick_directory() {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::debug!("directory selection cancelled");
                return DirectoryRequest::Cancelled;
            }
            Err(e) => {
                tracing::error!(error = %e, "directory picker failed");
                return DirectoryRequest::Failed;
            }
        };

        let handle = match self.fs.open(&path) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "cannot use selected directory");
                return DirectoryRequest::Failed;
            }
        };

        if let Err(e) = self.persist_handle(&handle) {
            tracing::error!(error = %e, "failed to remember directory; it must be selected again next session");
        }
        tracing::info!(directory = handle.name(), "journal directory selected");
        *self.handle.borrow_mut() = Some(handle);
        DirectoryRequest::Granted
    }

    fn persist_handle(&self, handle: &DirectoryHandle) -> Result<()> {
        self.handles.save(handle)?;
        self.local.set_item(DIRECTORY_MARKER_KEY, "true")
    }

    /// Loads the handle granted in an earlier session. `false` when none was
    /// granted or it cannot be read back.
    pub fn restore_directory(&self) -> bool {
        match self.local.get_item(DIRECTORY_MARKER_KEY) {
            Ok(Some(_)) => {}
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(error = %e, "failed to read directory marker");
                return false;
            }
        }

        match self.handles.load() {
            Ok(Some(handle)) => {
                tracing::debug!(directory = handle.name(), "restored journal directory");
                *self.handle.borrow_mut() = Some(handle);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!(error = %e, "failed to load directory handle");
                false
            }
        }
    }

    pub fn probe_access(&self) -> AccessProbe {
        let Some(handle) = self.handle() else {
            return AccessProbe::NotConfigured;
        };
        match self.fs.probe(&handle) {
            Ok(()) => AccessProbe::Accessible,
            Err(e) => match classify(&e) {
                AccessFailure::Lost => {
                    tracing::warn!(directory = handle.name(), error = %e, "journal directory is gone");
                    self.forget_directory();
                    AccessProbe::Lost
                }
                AccessFailure::Transient => {
                    tracing::warn!(directory = handle.name(), error = %e, "journal directory is unavailable");
                    AccessProbe::Unavailable
                }
            },
        }
    }

    pub fn check_directory_access(&self) -> bool {
        self.probe_access() == AccessProbe::Accessible
    }

    /// Makes `handle` current again after another directory was abandoned.
    pub fn reinstate_directory(&self, handle: DirectoryHandle) {
        if let Err(e) = self.persist_handle(&handle) {
            tracing::error!(error = %e, "failed to remember directory; it must be selected again next session");
        }
        tracing::info!(directory = handle.name(), "journal directory reinstated");
        *self.handle.borrow_mut() = Some(handle);
    }

    /// Drops the handle everywhere it is kept. Files are left alone.
    pub fn forget_directory(&self) {
        self.handle.borrow_mut().take();
        if let Err(e) = self.handles.clear() {
            tracing::error!(error = %e, "failed to clear directory handle");
        }
        if let Err(e) = self.local.remove_item(DIRECTORY_MARKER_KEY) {
            tracing::error!(error = %e, "failed to clear directory marker");
        }
    }

    // --- Document I/O ---

    fn current_handle(&self) -> Result<DirectoryHandle> {
        self.handle().ok_or(JournalError::NoDirectory)
    }

    fn lose_access(&self, handle: &DirectoryHandle, err: &io::Error) -> JournalError {
        tracing::warn!(directory = handle.name(), error = %err, "lost access to journal directory");
        self.handle.borrow_mut().take();
        JournalError::AccessLost {
            directory: handle.name().to_string(),
        }
    }

    fn io_failure(&self, handle: &DirectoryHandle, err: io::Error) -> JournalError {
        match classify(&err) {
            AccessFailure::Lost => self.lose_access(handle, &err),
            AccessFailure::Transient => JournalError::Io(err),
        }
    }

    fn read_raw(&self, handle: &DirectoryHandle) -> Result<Option<String>> {
        self.fs
            .read_file(handle, &self.journal_file)
            .map_err(|e| self.io_failure(handle, e))
    }

    fn read_document(&self, handle: &DirectoryHandle) -> Result<JournalData> {
        Ok(match self.read_raw(handle)? {
            Some(raw) => JournalData::parse_lenient(&raw),
            None => JournalData::default(),
        })
    }

    fn write_document(&self, handle: &DirectoryHandle, data: &JournalData) -> Result<()> {
        let json = data.to_json_pretty()?;
        self.fs
            .write_file(handle, &self.journal_file, &json)
            .map_err(|e| self.io_failure(handle, e))
    }

    /// Access loss and a missing directory are the caller's business; other
    /// read failures are logged and replaced by `fallback`.
    fn soft<T>(&self, result: Result<T>, fallback: T, what: &str) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e @ (JournalError::AccessLost { .. } | JournalError::NoDirectory)) => Err(e),
            Err(e) => {
                tracing::error!(error = %e, "failed to {}", what);
                Ok(fallback)
            }
        }
    }

    // --- Entries ---

    pub fn save_entry(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        let handle = self.current_handle()?;
        let mut data = self.read_document(&handle)?;
        data.insert(key, record.clone())?;
        self.write_document(&handle, &data)
    }

    pub fn get_entry(&self, key: &DayKey) -> Result<Option<EntryRecord>> {
        let handle = self.current_handle()?;
        let entry = self
            .read_document(&handle)
            .map(|data| data.get(key));
        self.soft(entry, None, "read journal entry")
    }

    pub fn get_all_entries(&self) -> Result<EntryMap> {
        let handle = self.current_handle()?;
        let entries = self.read_document(&handle).map(|data| data.entry_map());
        self.soft(entries, EntryMap::new(), "read journal")
    }

    pub fn delete_entry(&self, key: &DayKey) -> Result<()> {
        let handle = self.current_handle()?;
        let deleted = self.read_document(&handle).and_then(|mut data| {
            if data.remove(key) {
                self.write_document(&handle, &data)?;
            }
            Ok(())
        });
        self.soft(deleted, (), "delete journal entry")
    }

    /// Strict read used before a migration: a corrupt document is an error.
    pub fn get_all_entries_for_migration(&self) -> Result<EntryMap> {
        let handle = self.current_handle()?;
        match self.read_raw(&handle)? {
            Some(raw) => JournalData::parse(&raw)?.strict_entry_map(),
            None => Ok(EntryMap::new()),
        }
    }

    /// Forgets the directory. The journal file stays where it is.
    pub fn clear_all(&self) -> Result<()> {
        self.forget_directory();
        Ok(())
    }

    // --- Legacy layout ---

    /// Folds the old one-file-per-day layout (`2024-5.json`, ...) into the
    /// journal file, then removes the merged files.
    ///
    /// Skipped when the journal file already exists. Problems with single
    /// files are counted, never fatal; only access loss is returned as an
    /// error.
    pub fn migrate_from_individual_files(&self) -> Result<MigrationReport> {
        let handle = self.current_handle()?;

        match self.fs.file_exists(&handle, &self.journal_file) {
            Ok(true) => return Ok(MigrationReport::default()),
            Ok(false) => {}
            Err(e) => return self.abandon_migration(&handle, e),
        }

        let names = match self.fs.list_files(&handle) {
            Ok(names) => names,
            Err(e) => return self.abandon_migration(&handle, e),
        };

        let mut report = MigrationReport::default();
        let mut data = JournalData::default();
        let mut merged = Vec::new();

        for name in names {
            let Some(key) = self.legacy_key(&name) else {
                continue;
            };
            match self.read_legacy_file(&handle, &name) {
                Ok(record) => {
                    data.insert(&key, record)?;
                    merged.push(name);
                }
                Err(e) if e.is_access_lost() => return Err(e),
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "skipping unreadable legacy entry");
                    report.unreadable += 1;
                }
            }
        }

        if merged.is_empty() {
            return Ok(report);
        }

        match self.write_document(&handle, &data) {
            Ok(()) => {}
            Err(e) if e.is_access_lost() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "failed to write migrated journal; legacy files kept");
                return Ok(report);
            }
        }

        for name in &merged {
            if let Err(e) = self.fs.remove_file(&handle, name) {
                tracing::warn!(file = %name, error = %e, "failed to remove migrated legacy file");
                report.unremoved += 1;
            }
        }

        report.migrated = merged.len();
        tracing::info!(
            count = report.migrated,
            file = %self.journal_file,
            "migrated legacy entries"
        );
        Ok(report)
    }

    fn legacy_key(&self, name: &str) -> Option<DayKey> {
        if name == self.journal_file {
            return None;
        }
        name.strip_suffix(".json")?.parse().ok()
    }

    fn read_legacy_file(&self, handle: &DirectoryHandle, name: &str) -> Result<EntryRecord> {
        let raw = self
            .fs
            .read_file(handle, name)
            .map_err(|e| self.io_failure(handle, e))?
            .ok_or_else(|| JournalError::Store(format!("{} vanished during migration", name)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn abandon_migration(
        &self,
        handle: &DirectoryHandle,
        err: io::Error,
    ) -> Result<MigrationReport> {
        match classify(&err) {
            AccessFailure::Lost => Err(self.lose_access(handle, &err)),
            AccessFailure::Transient => {
                tracing::warn!(error = %err, "legacy migration abandoned");
                Ok(MigrationReport::default())
            }
        }
    }
}
