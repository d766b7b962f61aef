//! # Backup and Restore
//!
//! A backup is one JSON document holding every entry plus the settings,
//! independent of which store is active:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "exportDate": "2024-03-01T18:00:00.000Z",
//!   "entries": { "2024-0": { "date": "...", "memory": "..." } },
//!   "settings": { "soundEffects": false, "notifications": { "enabled": false, "time": "20:00" } }
//! }
//! ```
//!
//! ## Restore Semantics
//!
//! The whole document is validated before anything is written: a missing
//! `version` or `entries`, an invalid day key or a malformed record rejects
//! the backup with [`JournalError::MalformedBackup`] and leaves storage as it
//! was.
//!
//! Entries are then written one at a time through the selector, keeping their
//! original timestamps. Existing entries not in the backup are left alone.
//! There is no rollback: if a write fails mid-way the journal holds a mix of
//! old and restored entries and [`JournalError::RestoreIncomplete`] says how
//! far the restore got.

use crate::error::{JournalError, Result};
use crate::model::{DayKey, EntryRecord};
use crate::settings::{AppSettings, SettingsStore};
use crate::store::directory::DirectoryFs;
use crate::store::kv::KeyValueArea;
use crate::store::selector::StorageSelector;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const BACKUP_VERSION: &str = "1.0.0";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub entries: BTreeMap<String, EntryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
}

impl BackupDocument {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    pub settings_restored: bool,
    /// The directory was lost during the restore; entries went to local storage.
    pub access_lost: bool,
}

/// `journal-backup-YYYY-MM-DD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("journal-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Reads every entry through the active store.
pub fn create_backup<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    settings: &AppSettings,
) -> Result<BackupDocument> {
    let entries = selector
        .get_all_entries()?
        .into_iter()
        .map(|(key, record)| (key.to_string(), record))
        .collect();

    Ok(BackupDocument {
        version: BACKUP_VERSION.to_string(),
        export_date: Utc::now().trunc_subsecs(3),
        entries,
        settings: Some(settings.clone()),
    })
}

struct ValidatedBackup {
    entries: Vec<(DayKey, EntryRecord)>,
    settings: Option<AppSettings>,
}

fn malformed(reason: impl Into<String>) -> JournalError {
    JournalError::MalformedBackup(reason.into())
}

fn validate(json: &str) -> Result<ValidatedBackup> {
    let doc: Value = serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;

    let version = doc
        .get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| malformed("missing version"))?;
    if version != BACKUP_VERSION {
        tracing::warn!(version, expected = BACKUP_VERSION, "restoring backup from another version");
    }

    let raw_entries = doc
        .get("entries")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing entries"))?;

    let mut entries = Vec::with_capacity(raw_entries.len());
    for (raw_key, raw_record) in raw_entries {
        let key: DayKey = raw_key
            .parse()
            .map_err(|_| malformed(format!("invalid day key '{}'", raw_key)))?;
        let record: EntryRecord = serde_json::from_value(raw_record.clone())
            .map_err(|e| malformed(format!("entry {}: {}", raw_key, e)))?;
        entries.push((key, record));
    }

    let settings = match doc.get("settings") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<AppSettings>(raw.clone())
                .map_err(|e| malformed(format!("settings: {}", e)))?,
        ),
    };

    Ok(ValidatedBackup { entries, settings })
}

pub fn restore_backup<K: KeyValueArea, F: DirectoryFs, S: KeyValueArea>(
    selector: &mut StorageSelector<K, F>,
    settings: &SettingsStore<S>,
    json: &str,
) -> Result<RestoreReport> {
    let backup = validate(json)?;
    let total = backup.entries.len();
    let mut report = RestoreReport::default();

    for (key, record) in backup.entries {
        match selector.put_record(key, record) {
            Ok(outcome) => {
                report.restored += 1;
                report.access_lost |= outcome.access_lost;
            }
            Err(e) => {
                return Err(JournalError::RestoreIncomplete {
                    restored: report.restored,
                    total,
                    source: Box::new(e),
                })
            }
        }
    }

    if let Some(restored_settings) = backup.settings {
        settings
            .save(&restored_settings)
            .map_err(|e| JournalError::RestoreIncomplete {
                restored: report.restored,
                total,
                source: Box::new(e),
            })?;
        report.settings_restored = true;
    }

    tracing::info!(count = report.restored, "restored backup");
    Ok(report)
}

pub fn write_backup(path: &Path, backup: &BackupDocument) -> Result<()> {
    let content = serde_json::to_string_pretty(backup)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn read_backup(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::dir_mem::MemDirectory;
    use crate::store::durable::DurableStore;
    use crate::store::ephemeral::EphemeralStore;
    use crate::store::kv_mem::MemKvArea;
    use tempfile::TempDir;

    fn selector(local: &MemKvArea) -> StorageSelector<MemKvArea, MemDirectory> {
        StorageSelector::initialize(
            EphemeralStore::new(local.clone()),
            DurableStore::new(MemDirectory::new(), local.clone(), MemKvArea::new()),
        )
    }

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "journal-backup-2024-03-07.json");
    }

    #[test]
    fn test_create_and_restore_into_empty_journal() {
        let local = MemKvArea::new();
        let mut source = selector(&local);
        source.save_entry(key("2024-0"), "first").unwrap();
        source.save_entry(key("2024-1"), "second").unwrap();
        let settings = AppSettings {
            sound_effects: true,
            ..Default::default()
        };

        let backup = create_backup(&mut source, &settings).unwrap();
        assert_eq!(backup.version, BACKUP_VERSION);
        assert_eq!(backup.entry_count(), 2);
        let json = serde_json::to_string(&backup).unwrap();
        assert!(json.contains("exportDate"));

        let target_local = MemKvArea::new();
        let mut target = selector(&target_local);
        let settings_store = SettingsStore::new(target_local.clone());
        let report = restore_backup(&mut target, &settings_store, &json).unwrap();

        assert_eq!(report.restored, 2);
        assert!(report.settings_restored);
        assert!(settings_store.load().sound_effects);
        let restored = target.get_all_entries().unwrap();
        assert_eq!(restored[&key("2024-1")].memory, "second");
        // Timestamps survive
        assert_eq!(
            restored[&key("2024-0")].date,
            backup.entries["2024-0"].date
        );
    }

    #[test]
    fn test_restore_merges_with_existing_entries() {
        let local = MemKvArea::new();
        let mut journal = selector(&local);
        journal.save_entry(key("2024-5"), "kept").unwrap();
        journal.save_entry(key("2024-6"), "replaced").unwrap();

        let json = r#"{"version":"1.0.0","exportDate":"2024-02-01T00:00:00Z",
            "entries":{"2024-6":{"date":"2024-01-07T12:00:00Z","memory":"from backup"}}}"#;
        let report = restore_backup(&mut journal, &SettingsStore::new(local.clone()), json).unwrap();
        assert_eq!(report.restored, 1);
        assert!(!report.settings_restored);

        let all = journal.get_all_entries().unwrap();
        assert_eq!(all[&key("2024-5")].memory, "kept");
        assert_eq!(all[&key("2024-6")].memory, "from backup");
    }

    #[test]
    fn test_malformed_backups_are_rejected_before_writing() {
        let local = MemKvArea::new();
        let mut journal = selector(&local);
        journal.save_entry(key("2024-0"), "untouched").unwrap();
        let settings = SettingsStore::new(local.clone());

        let cases = [
            "not json",
            r#"{"entries":{}}"#,
            r#"{"version":"","entries":{}}"#,
            r#"{"version":"1.0.0"}"#,
            r#"{"version":"1.0.0","entries":[]}"#,
            r#"{"version":"1.0.0","entries":{"2024-1":{"date":"2024-01-02T00:00:00Z","memory":"ok"},"bogus":{"date":"2024-01-02T00:00:00Z","memory":"x"}}}"#,
            r#"{"version":"1.0.0","entries":{"2024-1":{"memory":"no date"}}}"#,
            r#"{"version":"1.0.0","entries":{},"settings":{"soundEffects":"loud"}}"#,
        ];
        for json in cases {
            let err = restore_backup(&mut journal, &settings, json).unwrap_err();
            assert!(
                matches!(err, JournalError::MalformedBackup(_)),
                "{} gave {:?}",
                json,
                err
            );
        }

        let all = journal.get_all_entries().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&key("2024-0")].memory, "untouched");
    }

    #[test]
    fn test_failed_settings_write_reports_incomplete_restore() {
        let local = MemKvArea::new();
        let mut journal = selector(&local);
        let settings_area = MemKvArea::new();
        settings_area.set_simulate_write_error(true);

        let json = r#"{"version":"1.0.0","exportDate":"2024-02-01T00:00:00Z",
            "entries":{"2024-1":{"date":"2024-01-02T00:00:00Z","memory":"in"}},
            "settings":{"soundEffects":true}}"#;
        let err =
            restore_backup(&mut journal, &SettingsStore::new(settings_area), json).unwrap_err();
        assert!(matches!(
            err,
            JournalError::RestoreIncomplete {
                restored: 1,
                total: 1,
                ..
            }
        ));
        // Entries written before the failure stay
        assert_eq!(journal.get_all_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_write_and_read_backup_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(backup_file_name(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let local = MemKvArea::new();
        let mut journal = selector(&local);
        journal.save_entry(key("2024-0"), "on disk").unwrap();

        let backup = create_backup(&mut journal, &AppSettings::default()).unwrap();
        write_backup(&path, &backup).unwrap();

        let raw = read_backup(&path).unwrap();
        let parsed: BackupDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, backup);
    }
}
