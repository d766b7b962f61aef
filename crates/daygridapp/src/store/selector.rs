use super::access::{detect, AccessStatus};
use super::directory::{DirectoryFs, DirectoryHandle, DirectoryPicker, DirectoryRequest};
use super::durable::{DurableStore, MigrationReport};
use super::ephemeral::EphemeralStore;
use super::kv::KeyValueArea;
use crate::error::{JournalError, Result};
use crate::model::{DayKey, EntryMap, EntryRecord, StorageMode};

/// The single recognizer for "the journal directory is gone".
pub fn is_directory_deleted_error(err: &JournalError) -> bool {
    err.is_access_lost()
}

/// Borrowed view of whichever store is active.
///
/// Obtained from [`StorageSelector::active`] (or [`StorageSelector::adapter`]);
/// the borrow ends before any mode switch, so a stale adapter cannot be used.
pub enum StorageAdapter<'a, K: KeyValueArea, F: DirectoryFs> {
    Ephemeral(&'a EphemeralStore<K>),
    Durable(&'a DurableStore<K, F>),
}

impl<K: KeyValueArea, F: DirectoryFs> StorageAdapter<'_, K, F> {
    pub fn mode(&self) -> StorageMode {
        match self {
            StorageAdapter::Ephemeral(_) => StorageMode::Ephemeral,
            StorageAdapter::Durable(_) => StorageMode::Durable,
        }
    }

    pub fn is_supported(&self) -> bool {
        match self {
            StorageAdapter::Ephemeral(store) => store.is_supported(),
            StorageAdapter::Durable(store) => store.is_supported(),
        }
    }

    pub fn save_entry(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        match self {
            StorageAdapter::Ephemeral(store) => store.save_entry(key, record),
            StorageAdapter::Durable(store) => store.save_entry(key, record),
        }
    }

    /// Save that reports every failure, for use while migrating.
    pub fn save_entry_for_migration(&self, key: &DayKey, record: &EntryRecord) -> Result<()> {
        match self {
            StorageAdapter::Ephemeral(store) => store.save_entry_for_migration(key, record),
            StorageAdapter::Durable(store) => store.save_entry(key, record),
        }
    }

    pub fn get_entry(&self, key: &DayKey) -> Result<Option<EntryRecord>> {
        match self {
            StorageAdapter::Ephemeral(store) => store.get_entry(key),
            StorageAdapter::Durable(store) => store.get_entry(key),
        }
    }

    pub fn get_all_entries(&self) -> Result<EntryMap> {
        match self {
            StorageAdapter::Ephemeral(store) => store.get_all_entries(),
            StorageAdapter::Durable(store) => store.get_all_entries(),
        }
    }

    pub fn delete_entry(&self, key: &DayKey) -> Result<()> {
        match self {
            StorageAdapter::Ephemeral(store) => store.delete_entry(key),
            StorageAdapter::Durable(store) => store.delete_entry(key),
        }
    }

    pub fn get_all_entries_for_migration(&self) -> Result<EntryMap> {
        match self {
            StorageAdapter::Ephemeral(store) => store.get_all_entries_for_migration(),
            StorageAdapter::Durable(store) => store.get_all_entries_for_migration(),
        }
    }

    pub fn clear_all(&self) -> Result<()> {
        match self {
            StorageAdapter::Ephemeral(store) => store.clear_all(),
            StorageAdapter::Durable(store) => store.clear_all(),
        }
    }
}

/// Result of [`StorageSelector::initialize_storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInit {
    pub mode: StorageMode,
    /// A directory was configured but could not be used.
    pub directory_deleted: bool,
    pub access: AccessStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub key: DayKey,
    pub record: EntryRecord,
    /// Store that ended up holding the record.
    pub mode: StorageMode,
    /// The directory was lost during the save and the record went to local
    /// storage instead.
    pub access_lost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStatus {
    pub mode: StorageMode,
    pub directory: Option<String>,
    pub directory_deleted: bool,
    pub supported: bool,
    pub access: AccessStatus,
    pub entry_count: usize,
}

/// Owns both stores and decides which one is authoritative.
///
/// A selector only exists after [`StorageSelector::initialize`], so it always
/// has exactly one active mode.
pub struct StorageSelector<K: KeyValueArea, F: DirectoryFs> {
    ephemeral: EphemeralStore<K>,
    durable: DurableStore<K, F>,
    mode: StorageMode,
    directory_deleted: bool,
    access: AccessStatus,
}

impl<K: KeyValueArea, F: DirectoryFs> StorageSelector<K, F> {
    pub fn initialize(ephemeral: EphemeralStore<K>, durable: DurableStore<K, F>) -> Self {
        let mut selector = Self {
            ephemeral,
            durable,
            mode: StorageMode::Ephemeral,
            directory_deleted: false,
            access: AccessStatus::NotConfigured,
        };
        selector.initialize_storage();
        selector
    }

    /// Restores and probes the durable store, then picks the mode.
    pub fn initialize_storage(&mut self) -> StorageInit {
        self.access = detect(&self.durable);
        match self.access {
            AccessStatus::Accessible => match self.durable.migrate_from_individual_files() {
                Ok(report) => {
                    if report.migrated > 0 {
                        tracing::info!(count = report.migrated, "folded legacy files into journal");
                    }
                    self.mode = StorageMode::Durable;
                    self.directory_deleted = false;
                }
                Err(e) => {
                    // Only access loss gets here
                    tracing::warn!(error = %e, "journal directory lost during startup");
                    self.access = AccessStatus::Lost;
                    self.mode = StorageMode::Ephemeral;
                    self.directory_deleted = true;
                }
            },
            AccessStatus::Lost | AccessStatus::Unavailable => {
                tracing::warn!(access = ?self.access, "journal directory unusable, using local storage");
                self.mode = StorageMode::Ephemeral;
                self.directory_deleted = true;
            }
            AccessStatus::Unsupported | AccessStatus::NotConfigured => {
                tracing::debug!(access = ?self.access, "using local storage");
                self.mode = StorageMode::Ephemeral;
                self.directory_deleted = false;
            }
        }
        self.init_state()
    }

    fn init_state(&self) -> StorageInit {
        StorageInit {
            mode: self.mode,
            directory_deleted: self.directory_deleted,
            access: self.access,
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn directory_deleted(&self) -> bool {
        self.directory_deleted
    }

    pub fn access(&self) -> AccessStatus {
        self.access
    }

    /// Dismisses the recovery prompt without changing stores.
    pub fn acknowledge_directory_deleted(&mut self) {
        self.directory_deleted = false;
    }

    pub fn ephemeral(&self) -> &EphemeralStore<K> {
        &self.ephemeral
    }

    pub fn durable(&self) -> &DurableStore<K, F> {
        &self.durable
    }

    pub fn active(&self) -> StorageAdapter<'_, K, F> {
        self.adapter(self.mode)
    }

    pub fn adapter(&self, mode: StorageMode) -> StorageAdapter<'_, K, F> {
        match mode {
            StorageMode::Ephemeral => StorageAdapter::Ephemeral(&self.ephemeral),
            StorageMode::Durable => StorageAdapter::Durable(&self.durable),
        }
    }

    fn fall_back_to_ephemeral(&mut self, err: &JournalError) {
        tracing::warn!(error = %err, "falling back to local storage");
        self.mode = StorageMode::Ephemeral;
        self.directory_deleted = true;
        self.access = AccessStatus::Lost;
    }

    /// Runs `op` on the active adapter. Access loss switches to local storage
    /// and runs `op` again there.
    fn route<T>(
        &mut self,
        op: impl Fn(StorageAdapter<'_, K, F>) -> Result<T>,
    ) -> Result<(T, bool)> {
        match op(self.active()) {
            Err(e) if is_directory_deleted_error(&e) => {
                self.fall_back_to_ephemeral(&e);
                Ok((op(self.active())?, true))
            }
            other => other.map(|value| (value, false)),
        }
    }

    // --- Entries ---

    /// Saves `text` (trimmed, stamped now) for `key`.
    pub fn save_entry(&mut self, key: DayKey, text: &str) -> Result<SaveOutcome> {
        self.put_record(key, EntryRecord::new(text))
    }

    /// Saves a ready-made record, keeping its timestamp.
    pub fn put_record(&mut self, key: DayKey, record: EntryRecord) -> Result<SaveOutcome> {
        let ((), access_lost) = self.route(|store| store.save_entry(&key, &record))?;
        Ok(SaveOutcome {
            key,
            record,
            mode: self.mode,
            access_lost,
        })
    }

    pub fn get_entry(&mut self, key: &DayKey) -> Result<Option<EntryRecord>> {
        Ok(self.route(|store| store.get_entry(key))?.0)
    }

    pub fn get_all_entries(&mut self) -> Result<EntryMap> {
        Ok(self.route(|store| store.get_all_entries())?.0)
    }

    pub fn delete_entry(&mut self, key: &DayKey) -> Result<()> {
        Ok(self.route(|store| store.delete_entry(key))?.0)
    }

    // --- Migration and mode changes ---

    /// Copies every entry from one store to the other, clears the source and
    /// makes the target active.
    ///
    /// The source is cleared only when every write succeeded. Otherwise both
    /// stores may hold copies, the source stays the copy of record and the
    /// mode does not change.
    pub fn migrate_entries(&mut self, from: StorageMode, to: StorageMode) -> Result<usize> {
        if from == to {
            return Err(JournalError::Store(format!(
                "cannot migrate {} storage into itself",
                from
            )));
        }
        if to == StorageMode::Durable && !self.durable.has_directory() {
            return Err(JournalError::NoDirectory);
        }

        let migrated = self.copy_entries(from, to)?;
        match to {
            StorageMode::Durable => self.enter_durable(),
            StorageMode::Ephemeral => {
                self.mode = StorageMode::Ephemeral;
                self.directory_deleted = false;
                self.access = AccessStatus::NotConfigured;
            }
        }
        tracing::info!(count = migrated, %from, %to, "migrated entries");
        Ok(migrated)
    }

    fn copy_entries(&self, from: StorageMode, to: StorageMode) -> Result<usize> {
        let source = self.adapter(from);
        let target = self.adapter(to);

        let entries = source.get_all_entries_for_migration()?;
        let mut migrated = 0;
        let mut failed = 0;
        for (key, record) in &entries {
            match target.save_entry_for_migration(key, record) {
                Ok(()) => migrated += 1,
                Err(e) if is_directory_deleted_error(&e) => return Err(e),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "failed to migrate entry");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(JournalError::MigrationIncomplete { migrated, failed });
        }
        source.clear_all()?;
        Ok(migrated)
    }

    /// Asks for a directory and moves the journal into it.
    ///
    /// Legacy per-day files already in the directory are folded in first;
    /// entries from local storage are written over them. If anything fails
    /// the new directory is forgotten and local storage stays authoritative.
    pub fn migrate_to_file_system(
        &mut self,
        picker: &dyn DirectoryPicker,
    ) -> Result<DirectoryRequest> {
        let previous = self.durable.handle();
        let request = self.durable.request_directory(picker);
        if !request.is_success() {
            return Ok(request);
        }

        if let Err(e) = self.durable.migrate_from_individual_files() {
            self.abandon_directory(previous, &e);
            return Err(e);
        }

        if self.mode == StorageMode::Ephemeral {
            if let Err(e) = self.migrate_entries(StorageMode::Ephemeral, StorageMode::Durable) {
                tracing::warn!(error = %e, "migration failed, keeping local storage");
                self.abandon_directory(previous, &e);
                return Err(e);
            }
        }

        self.enter_durable();
        Ok(request)
    }

    /// Switches to a different directory. Entries in the old directory stay
    /// there.
    pub fn change_directory(&mut self, picker: &dyn DirectoryPicker) -> Result<DirectoryRequest> {
        let previous = self.durable.handle();
        let request = self.durable.request_directory(picker);
        if !request.is_success() {
            return Ok(request);
        }
        if let Err(e) = self.durable.migrate_from_individual_files() {
            self.abandon_directory(previous, &e);
            return Err(e);
        }
        self.enter_durable();
        Ok(request)
    }

    /// Folds legacy per-day files in the current directory into the journal
    /// file.
    pub fn migrate_legacy_files(&mut self) -> Result<MigrationReport> {
        match self.durable.migrate_from_individual_files() {
            Err(e) if is_directory_deleted_error(&e) => {
                self.fall_back_to_ephemeral(&e);
                Err(e)
            }
            other => other,
        }
    }

    /// Drops a directory that was just granted but could not be set up and
    /// goes back to what was in use before.
    fn abandon_directory(&mut self, previous: Option<DirectoryHandle>, err: &JournalError) {
        self.durable.forget_directory();
        if self.mode != StorageMode::Durable {
            return;
        }
        match previous {
            Some(handle) => self.durable.reinstate_directory(handle),
            None => self.fall_back_to_ephemeral(err),
        }
    }

    fn enter_durable(&mut self) {
        self.mode = StorageMode::Durable;
        self.directory_deleted = false;
        self.access = AccessStatus::Accessible;
    }

    /// Stops using the directory and keeps the journal in local storage.
    pub fn use_local_storage(&mut self) -> Result<()> {
        self.durable.clear_all()?;
        self.mode = StorageMode::Ephemeral;
        self.directory_deleted = false;
        self.access = if self.durable.is_supported() {
            AccessStatus::NotConfigured
        } else {
            AccessStatus::Unsupported
        };
        Ok(())
    }

    pub fn status(&mut self) -> Result<StorageStatus> {
        let entry_count = self.get_all_entries()?.len();
        Ok(StorageStatus {
            mode: self.mode,
            directory: self.durable.handle().map(|h| h.name().to_string()),
            directory_deleted: self.directory_deleted,
            supported: self.durable.is_supported(),
            access: self.access,
            entry_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::dir_mem::MemDirectory;
    use crate::store::directory::FixedPicker;
    use crate::store::kv_mem::MemKvArea;
    use std::path::PathBuf;

    type Selector = StorageSelector<MemKvArea, MemDirectory>;

    /// Shared backing state; every `session()` is a fresh process start.
    struct World {
        fs: MemDirectory,
        local: MemKvArea,
        caps: MemKvArea,
        dir: PathBuf,
    }

    impl World {
        fn new() -> Self {
            let fs = MemDirectory::new();
            let dir = fs.add_dir("/home/me/Journal");
            Self {
                fs,
                local: MemKvArea::new(),
                caps: MemKvArea::new(),
                dir,
            }
        }

        fn session(&self) -> Selector {
            StorageSelector::initialize(
                EphemeralStore::new(self.local.clone()),
                DurableStore::new(self.fs.clone(), self.local.clone(), self.caps.clone()),
            )
        }

        fn picker(&self) -> FixedPicker {
            FixedPicker::path(&self.dir)
        }

        fn durable_session(&self) -> Selector {
            let mut selector = self.session();
            selector.migrate_to_file_system(&self.picker()).unwrap();
            selector
        }
    }

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_start_is_ephemeral() {
        let world = World::new();
        let selector = world.session();
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(!selector.directory_deleted());
        assert_eq!(selector.access(), AccessStatus::NotConfigured);
        assert_eq!(selector.active().mode(), StorageMode::Ephemeral);
    }

    #[test]
    fn test_unsupported_platform_is_ephemeral_without_flag() {
        let world = World::new();
        world.fs.set_supported(false);
        let mut selector = world.session();
        assert_eq!(selector.access(), AccessStatus::Unsupported);
        assert!(!selector.directory_deleted());

        let request = selector.migrate_to_file_system(&world.picker()).unwrap();
        assert_eq!(request, DirectoryRequest::Failed);
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
    }

    #[test]
    fn test_save_scenario_round_trip() {
        let world = World::new();
        let mut selector = world.session();

        let outcome = selector.save_entry(key("2024-0"), "  Hello world  ").unwrap();
        assert_eq!(outcome.record.memory, "Hello world");
        assert!(!outcome.access_lost);

        let all = selector.get_all_entries().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&key("2024-0")].memory, "Hello world");
    }

    #[test]
    fn test_damaged_record_survives_save_in_directory() {
        let world = World::new();
        world.fs.put_file(
            &world.dir,
            "journal.json",
            r#"{"entries":{
                "2024-0":{"date":"2024-01-01T10:00:00.000Z","memory":"kept"},
                "2024-1":{"date":"2024-01-02T10:00:00.000Z","memory":"also kept"},
                "2024-2":{"memory":42}
            }}"#,
        );
        let mut selector = world.durable_session();

        selector.save_entry(key("2024-3"), "new").unwrap();

        let entries = selector.get_all_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[&key("2024-0")].memory, "kept");
        assert_eq!(entries[&key("2024-1")].memory, "also kept");
        let raw = world.fs.file(&world.dir, "journal.json").unwrap();
        assert!(raw.contains("\"memory\": 42"));
    }

    #[test]
    fn test_blank_save_overwrites_in_durable_mode() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.save_entry(key("2024-9"), "words").unwrap();
        selector.save_entry(key("2024-9"), "").unwrap();
        assert_eq!(
            selector.get_entry(&key("2024-9")).unwrap().map(|r| r.memory),
            Some(String::new())
        );
    }

    #[test]
    fn test_migrate_to_file_system_moves_entries() {
        let world = World::new();
        let mut selector = world.session();
        for (k, text) in [("2024-0", "a"), ("2024-1", "b"), ("2024-2", "c")] {
            selector.save_entry(key(k), text).unwrap();
        }

        let request = selector.migrate_to_file_system(&world.picker()).unwrap();
        assert_eq!(request, DirectoryRequest::Granted);
        assert_eq!(selector.mode(), StorageMode::Durable);
        assert_eq!(selector.get_all_entries().unwrap().len(), 3);
        assert!(!selector.ephemeral().has_entries());
        assert!(world.fs.file(&world.dir, "journal.json").is_some());

        // Next start picks the directory up again
        let next = world.session();
        assert_eq!(next.mode(), StorageMode::Durable);
        assert!(!next.directory_deleted());
    }

    #[test]
    fn test_cancelled_picker_changes_nothing() {
        let world = World::new();
        let mut selector = world.session();
        selector.save_entry(key("2024-0"), "stay").unwrap();

        let request = selector
            .migrate_to_file_system(&FixedPicker::cancelled())
            .unwrap();
        assert!(request.is_cancelled());
        assert!(!request.is_success());
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(selector.ephemeral().has_entries());
    }

    #[test]
    fn test_failed_migration_keeps_source() {
        let world = World::new();
        let mut selector = world.session();
        for (k, text) in [("2024-0", "a"), ("2024-1", "b"), ("2024-2", "c")] {
            selector.save_entry(key(k), text).unwrap();
        }
        world.fs.set_simulate_write_error(true);

        let err = selector
            .migrate_to_file_system(&world.picker())
            .unwrap_err();
        assert!(matches!(
            err,
            JournalError::MigrationIncomplete {
                migrated: 0,
                failed: 3
            }
        ));
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert_eq!(selector.get_all_entries().unwrap().len(), 3);
        assert!(!selector.durable().has_directory());

        world.fs.set_simulate_write_error(false);
        assert_eq!(world.session().mode(), StorageMode::Ephemeral);
    }

    #[test]
    fn test_migrate_entries_into_itself_is_rejected() {
        let world = World::new();
        let mut selector = world.session();
        assert!(selector
            .migrate_entries(StorageMode::Ephemeral, StorageMode::Ephemeral)
            .is_err());
        assert!(matches!(
            selector.migrate_entries(StorageMode::Ephemeral, StorageMode::Durable),
            Err(JournalError::NoDirectory)
        ));
    }

    #[test]
    fn test_migrate_entries_back_to_local() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.save_entry(key("2024-3"), "moving home").unwrap();

        let count = selector
            .migrate_entries(StorageMode::Durable, StorageMode::Ephemeral)
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        // Durable clear forgets the directory but leaves the file
        assert!(!selector.durable().has_directory());
        assert!(world.fs.file(&world.dir, "journal.json").is_some());
        assert_eq!(
            selector.ephemeral().get_entry(&key("2024-3")).unwrap().unwrap().memory,
            "moving home"
        );
    }

    #[test]
    fn test_failed_migration_back_to_local_keeps_directory() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.save_entry(key("2024-0"), "first").unwrap();
        selector.save_entry(key("2024-1"), "second").unwrap();
        world.local.set_simulate_write_error(true);

        let err = selector
            .migrate_entries(StorageMode::Durable, StorageMode::Ephemeral)
            .unwrap_err();
        assert!(matches!(
            err,
            JournalError::MigrationIncomplete {
                migrated: 0,
                failed: 2
            }
        ));
        assert_eq!(selector.mode(), StorageMode::Durable);
        assert!(selector.durable().has_directory());
        world.local.set_simulate_write_error(false);

        assert_eq!(selector.get_all_entries().unwrap().len(), 2);
        assert_eq!(world.session().mode(), StorageMode::Durable);
    }

    #[test]
    fn test_deleted_directory_on_next_start() {
        let world = World::new();
        world.durable_session();
        world.fs.remove_dir(&world.dir);

        let selector = world.session();
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(selector.directory_deleted());
        assert_eq!(selector.access(), AccessStatus::Lost);
    }

    #[test]
    fn test_unavailable_directory_on_next_start_keeps_handle() {
        let world = World::new();
        world.durable_session();
        world.fs.set_simulate_io_error(true);

        let selector = world.session();
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(selector.directory_deleted());
        assert_eq!(selector.access(), AccessStatus::Unavailable);

        world.fs.set_simulate_io_error(false);
        assert_eq!(world.session().mode(), StorageMode::Durable);
    }

    #[test]
    fn test_access_lost_mid_session_falls_back() {
        let world = World::new();
        let mut selector = world.durable_session();
        world.fs.revoke(&world.dir);

        let outcome = selector.save_entry(key("2024-7"), "rescued").unwrap();
        assert!(outcome.access_lost);
        assert_eq!(outcome.mode, StorageMode::Ephemeral);
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(selector.directory_deleted());
        assert_eq!(
            selector.ephemeral().get_entry(&key("2024-7")).unwrap().unwrap().memory,
            "rescued"
        );
    }

    #[test]
    fn test_access_lost_on_read_falls_back() {
        let world = World::new();
        let mut selector = world.durable_session();
        world.fs.remove_dir(&world.dir);

        assert!(selector.get_all_entries().unwrap().is_empty());
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(selector.directory_deleted());

        let restarted = world.session();
        assert_eq!(restarted.mode(), StorageMode::Ephemeral);
        assert!(restarted.directory_deleted());
    }

    #[test]
    fn test_use_local_storage_resets_flag() {
        let world = World::new();
        world.durable_session();
        world.fs.remove_dir(&world.dir);

        let mut selector = world.session();
        assert!(selector.directory_deleted());
        selector.use_local_storage().unwrap();
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(!selector.directory_deleted());

        let next = world.session();
        assert!(!next.directory_deleted());
    }

    #[test]
    fn test_use_local_storage_from_durable() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.use_local_storage().unwrap();
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert_eq!(world.session().mode(), StorageMode::Ephemeral);
    }

    #[test]
    fn test_change_directory_runs_legacy_migration() {
        let world = World::new();
        let mut selector = world.durable_session();
        let other = world.fs.add_dir("/mnt/usb/Journal");
        world.fs.put_file(
            &other,
            "2023-4.json",
            r#"{"date":"2023-01-05T09:00:00Z","memory":"old layout"}"#,
        );

        let request = selector.change_directory(&FixedPicker::path(&other)).unwrap();
        assert!(request.is_success());
        assert_eq!(selector.mode(), StorageMode::Durable);
        assert_eq!(
            selector.get_entry(&key("2023-4")).unwrap().unwrap().memory,
            "old layout"
        );
        assert_eq!(world.fs.file_names(&other), vec!["journal.json"]);
    }

    #[test]
    fn test_change_to_unreadable_directory_keeps_current_one() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.save_entry(key("2024-7"), "stays put").unwrap();
        let other = world.fs.add_dir("/mnt/usb/Journal");
        world.fs.deny_listing(&other);

        let err = selector
            .change_directory(&FixedPicker::path(&other))
            .unwrap_err();
        assert!(is_directory_deleted_error(&err));
        assert_eq!(selector.mode(), StorageMode::Durable);
        assert_eq!(
            selector.durable().handle().map(|h| h.path().to_path_buf()),
            Some(world.dir.clone())
        );
        assert_eq!(
            selector.get_entry(&key("2024-7")).unwrap().unwrap().memory,
            "stays put"
        );

        let restarted = world.session();
        assert_eq!(restarted.mode(), StorageMode::Durable);
        assert_eq!(restarted.durable().get_directory_path(), "Journal");
    }

    #[test]
    fn test_migrate_to_unreadable_directory_stays_local() {
        let world = World::new();
        let mut selector = world.session();
        selector.save_entry(key("2024-7"), "local note").unwrap();
        world.fs.deny_listing(&world.dir);

        assert!(selector.migrate_to_file_system(&world.picker()).is_err());
        assert_eq!(selector.mode(), StorageMode::Ephemeral);
        assert!(!selector.durable().has_directory());
        assert_eq!(selector.get_all_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_startup_folds_legacy_files() {
        let world = World::new();
        world.durable_session();
        world.fs.remove_dir(&world.dir);
        world.fs.add_dir(world.dir.clone());
        for day in 0..3 {
            world.fs.put_file(
                &world.dir,
                &format!("2023-{}.json", day),
                r#"{"date":"2023-01-01T00:00:00Z","memory":"legacy"}"#,
            );
        }

        let mut selector = world.session();
        assert_eq!(selector.mode(), StorageMode::Durable);
        assert_eq!(selector.get_all_entries().unwrap().len(), 3);
        assert_eq!(world.fs.file_names(&world.dir), vec!["journal.json"]);

        // Second run is a no-op
        let report = selector.migrate_legacy_files().unwrap();
        assert_eq!(report, MigrationReport::default());
    }

    #[test]
    fn test_status() {
        let world = World::new();
        let mut selector = world.durable_session();
        selector.save_entry(key("2024-0"), "x").unwrap();

        let status = selector.status().unwrap();
        assert_eq!(status.mode, StorageMode::Durable);
        assert_eq!(status.directory.as_deref(), Some("Journal"));
        assert_eq!(status.entry_count, 1);
        assert!(status.supported);
        assert_eq!(status.access, AccessStatus::Accessible);
    }

    #[test]
    fn test_is_directory_deleted_error() {
        assert!(is_directory_deleted_error(&JournalError::AccessLost {
            directory: "Journal".to_string()
        }));
        assert!(!is_directory_deleted_error(&JournalError::NoDirectory));
        assert!(!is_directory_deleted_error(&JournalError::Io(
            std::io::Error::from(std::io::ErrorKind::NotFound)
        )));
    }
}
