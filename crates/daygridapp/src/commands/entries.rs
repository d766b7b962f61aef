use crate::commands::{CmdMessage, CmdResult, DayEntry};
use crate::error::Result;
use crate::model::DayKey;
use crate::store::directory::DirectoryFs;
use crate::store::kv::KeyValueArea;
use crate::store::selector::StorageSelector;

/// `2024-41 (Sun Feb 11 2024)`
pub fn describe_day(key: &DayKey) -> String {
    match key.date() {
        Some(date) => format!("{} ({})", key, date.format("%a %b %-d %Y")),
        None => key.to_string(),
    }
}

fn access_lost_warning() -> CmdMessage {
    CmdMessage::warning(
        "The journal directory is no longer accessible. Entries are kept in local storage until a directory is selected again.",
    )
}

pub fn write<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    key: DayKey,
    text: &str,
) -> Result<CmdResult> {
    let outcome = selector.save_entry(key, text)?;
    let mut result = CmdResult::default()
        .with_entries(vec![DayEntry {
            key,
            record: outcome.record,
        }])
        .with_directory_deleted(selector.directory_deleted());

    if outcome.access_lost {
        result.add_message(access_lost_warning());
    }
    result.add_message(CmdMessage::success(format!(
        "Saved {} to {} storage",
        describe_day(&key),
        outcome.mode
    )));
    Ok(result)
}

pub fn show<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    key: DayKey,
) -> Result<CmdResult> {
    let entry = selector.get_entry(&key)?;
    let mut result = CmdResult::default().with_directory_deleted(selector.directory_deleted());
    match entry {
        Some(record) => result.entries.push(DayEntry { key, record }),
        None => result.add_message(CmdMessage::info(format!(
            "No entry for {}",
            describe_day(&key)
        ))),
    }
    Ok(result)
}

pub fn list<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    year: Option<i32>,
) -> Result<CmdResult> {
    let entries: Vec<DayEntry> = selector
        .get_all_entries()?
        .into_iter()
        .filter(|(key, _)| year.is_none_or(|y| key.year() == y))
        .map(|(key, record)| DayEntry { key, record })
        .collect();

    let mut result = CmdResult::default()
        .with_directory_deleted(selector.directory_deleted());
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No entries yet"));
    }
    Ok(result.with_entries(entries))
}

pub fn delete<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    key: DayKey,
) -> Result<CmdResult> {
    let existed = selector.get_entry(&key)?.is_some();
    selector.delete_entry(&key)?;

    let mut result = CmdResult::default().with_directory_deleted(selector.directory_deleted());
    if existed {
        result.add_message(CmdMessage::success(format!(
            "Deleted {}",
            describe_day(&key)
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "No entry for {}",
            describe_day(&key)
        )));
    }
    Ok(result)
}
