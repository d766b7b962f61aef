//! # Configuration
//!
//! Configuration is managed by [`clapfig`], which handles layered loading from
//! a TOML file and environment variables on top of compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `DAYGRID__JOURNAL_FILE`, `DAYGRID__ENTRIES_KEY`.
//! 2. **Config file**: `daygrid.toml` in the app data directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `journal_file` | `journal.json` | Journal file inside the chosen directory |
//! | `entries_key` | `journal-entries` | Key of the journal in local storage |
//!
//! Changing either value points the app at a different journal; the old one is
//! left where it was.

use clapfig::{Clapfig, SearchPath};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "daygrid.toml";

/// Configuration for daygrid, stored in `daygrid.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// Journal file name inside the chosen directory
    #[config(default = "journal.json")]
    pub journal_file: String,

    /// Key of the journal document in local storage
    #[config(default = "journal-entries")]
    pub entries_key: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            journal_file: "journal.json".to_string(),
            entries_key: "journal-entries".to_string(),
        }
    }
}

impl JournalConfig {
    /// Loads `daygrid.toml` from `data_dir` plus environment overrides.
    /// Anything unreadable falls back to the defaults.
    pub fn load(data_dir: &Path) -> Self {
        let config: JournalConfig = Clapfig::builder()
            .app_name("daygrid")
            .file_name(CONFIG_FILE)
            .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
            .load()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to load configuration, using defaults");
                JournalConfig::default()
            });
        config.sanitized()
    }

    /// Replaces values that cannot work with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let journal_file = if is_plain_file_name(&self.journal_file) {
            self.journal_file
        } else {
            tracing::warn!(value = %self.journal_file, "journal_file must be a plain file name");
            defaults.journal_file
        };
        let entries_key = if self.entries_key.trim().is_empty() {
            tracing::warn!("entries_key must not be empty");
            defaults.entries_key
        } else {
            self.entries_key
        };
        Self {
            journal_file,
            entries_key,
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = JournalConfig::default();
        assert_eq!(config.journal_file, "journal.json");
        assert_eq!(config.entries_key, "journal-entries");
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(JournalConfig::load(tmp.path()), JournalConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "journal_file = \"days.json\"\n",
        )
        .unwrap();
        let config = JournalConfig::load(tmp.path());
        assert_eq!(config.journal_file, "days.json");
        assert_eq!(config.entries_key, "journal-entries");
    }

    #[test]
    fn test_sanitized_rejects_paths() {
        let config = JournalConfig {
            journal_file: "../escape.json".to_string(),
            entries_key: " ".to_string(),
        }
        .sanitized();
        assert_eq!(config, JournalConfig::default());
    }
}
