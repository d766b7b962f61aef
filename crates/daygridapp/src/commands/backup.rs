use crate::backup::{
    backup_file_name, create_backup, read_backup, restore_backup, write_backup,
};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::SettingsStore;
use crate::store::directory::DirectoryFs;
use crate::store::kv::KeyValueArea;
use crate::store::selector::StorageSelector;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Writes a backup to `output`, or to `journal-backup-<today>.json` in `dir`.
pub fn export<K: KeyValueArea, F: DirectoryFs, S: KeyValueArea>(
    selector: &mut StorageSelector<K, F>,
    settings: &SettingsStore<S>,
    output: Option<PathBuf>,
    dir: &Path,
) -> Result<CmdResult> {
    let path = output.unwrap_or_else(|| dir.join(backup_file_name(Local::now().date_naive())));
    let backup = create_backup(selector, &settings.load())?;
    write_backup(&path, &backup)?;

    let mut result = CmdResult::default().with_directory_deleted(selector.directory_deleted());
    let noun = if backup.entry_count() == 1 { "entry" } else { "entries" };
    result.add_message(CmdMessage::success(format!(
        "Exported {} {} to {}",
        backup.entry_count(),
        noun,
        path.display()
    )));
    result.backup_path = Some(path);
    Ok(result)
}

pub fn import<K: KeyValueArea, F: DirectoryFs, S: KeyValueArea>(
    selector: &mut StorageSelector<K, F>,
    settings: &SettingsStore<S>,
    path: &Path,
) -> Result<CmdResult> {
    let json = read_backup(path)?;
    let report = restore_backup(selector, settings, &json)?;

    let mut result = CmdResult::default().with_directory_deleted(selector.directory_deleted());
    if report.access_lost {
        result.add_message(CmdMessage::warning(
            "The journal directory became inaccessible; restored entries went to local storage",
        ));
    }
    result.add_message(CmdMessage::success(format!(
        "Restored {} entries from {}",
        report.restored,
        path.display()
    )));
    if report.settings_restored {
        result.add_message(CmdMessage::info("Settings restored"));
    }
    result.backup_path = Some(path.to_path_buf());
    result.restore = Some(report);
    Ok(result)
}
