use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::directory::{DirectoryFs, DirectoryPicker, DirectoryRequest};
use crate::store::kv::KeyValueArea;
use crate::store::selector::StorageSelector;

pub fn status<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
) -> Result<CmdResult> {
    let status = selector.status()?;
    Ok(CmdResult::default()
        .with_directory_deleted(status.directory_deleted)
        .with_status(status))
}

/// Adds the message for a picker outcome. Cancelling is not an error.
fn report_request<K: KeyValueArea, F: DirectoryFs>(
    selector: &StorageSelector<K, F>,
    request: DirectoryRequest,
    done: &str,
    result: &mut CmdResult,
) {
    match request {
        DirectoryRequest::Granted => result.add_message(CmdMessage::success(format!(
            "{} {}",
            done,
            selector.durable().get_directory_path()
        ))),
        DirectoryRequest::Cancelled => {
            result.add_message(CmdMessage::info("No directory selected, nothing changed"))
        }
        DirectoryRequest::Failed => result.add_message(CmdMessage::error(
            "Could not use the selected directory",
        )),
    }
}

/// Moves the journal from local storage into a directory the user picks.
pub fn migrate<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    picker: &dyn DirectoryPicker,
) -> Result<CmdResult> {
    let request = selector.migrate_to_file_system(picker)?;
    let mut result = CmdResult::default();
    report_request(selector, request, "Journal is now stored in", &mut result);
    Ok(result.with_directory_deleted(selector.directory_deleted()))
}

/// Points the journal at another directory.
pub fn change<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
    picker: &dyn DirectoryPicker,
) -> Result<CmdResult> {
    let request = selector.change_directory(picker)?;
    let mut result = CmdResult::default();
    report_request(selector, request, "Journal directory changed to", &mut result);
    Ok(result.with_directory_deleted(selector.directory_deleted()))
}

/// Stops using the directory. Its files are left in place.
pub fn use_local<K: KeyValueArea, F: DirectoryFs>(
    selector: &mut StorageSelector<K, F>,
) -> Result<CmdResult> {
    let previous = selector.durable().handle().map(|h| h.name().to_string());
    selector.use_local_storage()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Using local storage"));
    if let Some(name) = previous {
        result.add_message(CmdMessage::info(format!(
            "Files in {} were left untouched",
            name
        )));
    }
    Ok(result)
}
