use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    /// The configured journal directory is gone or no longer grants access.
    ///
    /// Distinct from a missing `journal.json` (normal for a fresh directory)
    /// and from an unsupported platform. Callers react to this one by falling
    /// back to local storage and asking the user to re-select a directory.
    #[error("Journal directory is no longer accessible: {directory}")]
    AccessLost { directory: String },

    #[error("No directory selected")]
    NoDirectory,

    #[error("Directory storage is not supported on this platform")]
    Unsupported,

    #[error("Invalid day key: {0} (expected <year>-<day index 0..=364>)")]
    InvalidDayKey(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Malformed backup: {0}")]
    MalformedBackup(String),

    #[error("Migration incomplete: {migrated} entries copied, {failed} failed; source left untouched")]
    MigrationIncomplete { migrated: usize, failed: usize },

    #[error("Restore incomplete: {restored} of {total} entries written before failure: {source}")]
    RestoreIncomplete {
        restored: usize,
        total: usize,
        #[source]
        source: Box<JournalError>,
    },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl JournalError {
    /// True for the access-lost signal (and only for it).
    pub fn is_access_lost(&self) -> bool {
        matches!(self, JournalError::AccessLost { .. })
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
