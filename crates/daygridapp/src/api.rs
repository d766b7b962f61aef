//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every journal operation, whatever the UI.
//!
//! The API facade:
//! - **Normalizes inputs**: a day can be given as today, a day key
//!   (`2024-41`) or a calendar date (`2024-02-11`); all become a [`DayKey`].
//! - **Dispatches** to the matching command function.
//! - **Returns structured types** (`Result<CmdResult>`).
//!
//! It holds no business logic and does no terminal I/O.
//!
//! ## Generic Over Storage
//!
//! `JournalApi<K, F>` is generic over the key/value area and the directory
//! filesystem:
//! - Production: `JournalApi<FsKvArea, FsDirectory>`
//! - Testing: `JournalApi<MemKvArea, MemDirectory>`

use crate::commands;
use crate::error::{JournalError, Result};
use crate::model::{DayKey, StorageMode};
use crate::settings::SettingsStore;
use crate::store::directory::{DirectoryFs, DirectoryPicker};
use crate::store::kv::KeyValueArea;
use crate::store::selector::StorageSelector;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// How a UI names a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayRef {
    Today,
    /// `<year>-<day index>`, e.g. `2024-41`
    Key(String),
    /// `YYYY-MM-DD`
    Date(String),
}

impl DayRef {
    pub fn resolve(&self) -> Result<DayKey> {
        match self {
            DayRef::Today => DayKey::today(),
            DayRef::Key(raw) => raw.trim().parse(),
            DayRef::Date(raw) => {
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    JournalError::InvalidDate(format!("'{}' (expected YYYY-MM-DD)", raw))
                })?;
                DayKey::for_date(date)
            }
        }
    }
}

/// The main API facade for journal operations.
pub struct JournalApi<K: KeyValueArea, F: DirectoryFs> {
    selector: StorageSelector<K, F>,
    settings: SettingsStore<K>,
}

impl<K: KeyValueArea, F: DirectoryFs> JournalApi<K, F> {
    pub fn new(selector: StorageSelector<K, F>, settings: SettingsStore<K>) -> Self {
        Self { selector, settings }
    }

    pub fn mode(&self) -> StorageMode {
        self.selector.mode()
    }

    pub fn directory_deleted(&self) -> bool {
        self.selector.directory_deleted()
    }

    pub fn selector(&self) -> &StorageSelector<K, F> {
        &self.selector
    }

    pub fn write_entry(&mut self, day: &DayRef, text: &str) -> Result<commands::CmdResult> {
        let key = day.resolve()?;
        commands::entries::write(&mut self.selector, key, text)
    }

    pub fn show_entry(&mut self, day: &DayRef) -> Result<commands::CmdResult> {
        let key = day.resolve()?;
        commands::entries::show(&mut self.selector, key)
    }

    pub fn list_entries(&mut self, year: Option<i32>) -> Result<commands::CmdResult> {
        commands::entries::list(&mut self.selector, year)
    }

    pub fn delete_entry(&mut self, day: &DayRef) -> Result<commands::CmdResult> {
        let key = day.resolve()?;
        commands::entries::delete(&mut self.selector, key)
    }

    pub fn storage_status(&mut self) -> Result<commands::CmdResult> {
        commands::storage::status(&mut self.selector)
    }

    pub fn migrate_to_directory(
        &mut self,
        picker: &dyn DirectoryPicker,
    ) -> Result<commands::CmdResult> {
        commands::storage::migrate(&mut self.selector, picker)
    }

    pub fn change_directory(
        &mut self,
        picker: &dyn DirectoryPicker,
    ) -> Result<commands::CmdResult> {
        commands::storage::change(&mut self.selector, picker)
    }

    pub fn use_local_storage(&mut self) -> Result<commands::CmdResult> {
        commands::storage::use_local(&mut self.selector)
    }

    pub fn export_backup(
        &mut self,
        output: Option<PathBuf>,
        dir: &Path,
    ) -> Result<commands::CmdResult> {
        commands::backup::export(&mut self.selector, &self.settings, output, dir)
    }

    pub fn import_backup(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::backup::import(&mut self.selector, &self.settings, path)
    }

    pub fn settings(
        &self,
        update: commands::settings::SettingsUpdate,
    ) -> Result<commands::CmdResult> {
        commands::settings::run(&self.settings, update)
    }
}
