//! # Command Layer
//!
//! Each command lives in its own submodule as plain functions over the
//! [`StorageSelector`](crate::store::selector::StorageSelector) and the
//! settings store.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr or prompts. A directory picker is
//!   passed in; how it asks the user is the caller's business.
//! - **Argument parsing**: day references are resolved by the API facade.
//! - **Exit codes**: return `Result`, let the caller decide.
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. It carries the entries to show,
//! the storage status or settings when asked for, and leveled messages. It
//! also carries `directory_deleted` so every UI can offer the same recovery
//! choice after the journal directory went away.
//!
//! ## Command Modules
//!
//! - [`entries`]: write, show, list and delete day entries
//! - [`storage`]: status, moving the journal to a directory, switching back
//! - [`backup`]: export and import backup files
//! - [`settings`]: show and update preferences

use crate::backup::RestoreReport;
use crate::model::{DayKey, EntryRecord};
use crate::settings::AppSettings;
use crate::store::selector::StorageStatus;
use serde::Serialize;
use std::path::PathBuf;

pub mod backup;
pub mod entries;
pub mod settings;
pub mod storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One day's note together with its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub key: DayKey,
    pub record: EntryRecord,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub entries: Vec<DayEntry>,
    pub status: Option<StorageStatus>,
    pub settings: Option<AppSettings>,
    pub backup_path: Option<PathBuf>,
    pub restore: Option<RestoreReport>,
    pub messages: Vec<CmdMessage>,
    /// The journal directory is gone and local storage is in use.
    pub directory_deleted: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_entries(mut self, entries: Vec<DayEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_status(mut self, status: StorageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_directory_deleted(mut self, deleted: bool) -> Self {
        self.directory_deleted = deleted;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
