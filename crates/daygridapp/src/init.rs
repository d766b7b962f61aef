//! # Startup
//!
//! [`initialize`] wires a ready-to-use [`JournalApi`] from the environment:
//!
//! 1. **Data directory**: `data_override` (the CLI's `--data`), else the
//!    `DAYGRID_DATA` environment variable, else the OS data directory via the
//!    `directories` crate.
//! 2. **Configuration**: `daygrid.toml` in that directory (see [`crate::config`]).
//! 3. **Stores**: the local key/value area (`local-storage.json`), the
//!    capability store (`journal-fs.json`) and the real filesystem.
//! 4. **Storage initialization**: the selector restores and probes the journal
//!    directory and picks the active store.
//!
//! The data directory only holds app-private state. The journal directory the
//! user picks can be anywhere and is never created by the app.

use crate::api::JournalApi;
use crate::config::JournalConfig;
use crate::error::{JournalError, Result};
use crate::settings::SettingsStore;
use crate::store::dir_fs::FsDirectory;
use crate::store::durable::DurableStore;
use crate::store::ephemeral::EphemeralStore;
use crate::store::kv_fs::FsKvArea;
use crate::store::selector::StorageSelector;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "DAYGRID_DATA";
pub const LOCAL_STORAGE_FILE: &str = "local-storage.json";
pub const CAPABILITY_FILE: &str = "journal-fs.json";

pub struct JournalContext {
    pub api: JournalApi<FsKvArea, FsDirectory>,
    pub config: JournalConfig,
    pub data_dir: PathBuf,
}

/// Resolves where app-private state lives.
pub fn data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "daygrid", "daygrid")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| JournalError::Config("Could not determine data directory".to_string()))
}

/// Initialize the journal context: resolve paths, load config, build the
/// stores and pick the active one.
pub fn initialize(data_override: Option<PathBuf>) -> Result<JournalContext> {
    let data_dir = data_dir(data_override)?;
    let config = JournalConfig::load(&data_dir);
    tracing::debug!(data_dir = %data_dir.display(), ?config, "initializing journal");

    let local = FsKvArea::new(data_dir.join(LOCAL_STORAGE_FILE));
    let capabilities = FsKvArea::new(data_dir.join(CAPABILITY_FILE));

    let ephemeral = EphemeralStore::with_key(local.clone(), &config.entries_key);
    let durable = DurableStore::new(FsDirectory::new(), local.clone(), capabilities)
        .with_journal_file(&config.journal_file);
    let selector = StorageSelector::initialize(ephemeral, durable);
    let api = JournalApi::new(selector, SettingsStore::new(local));

    Ok(JournalContext {
        api,
        config,
        data_dir,
    })
}
