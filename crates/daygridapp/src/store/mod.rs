//! # Storage Layer
//!
//! The journal lives in exactly one of two stores at a time:
//!
//! 1. **Ephemeral**: [`ephemeral::EphemeralStore`], a JSON document in the app's
//!    private key/value area. Always available, never portable.
//! 2. **Durable**: [`durable::DurableStore`], a `journal.json` file in a
//!    directory the user picked. Survives reinstalls and can be synced or
//!    backed up by the user, but the directory can vanish at any time.
//!
//! [`selector::StorageSelector`] owns both and decides which one is active.
//!
//! ## Layers
//!
//! Each store sits on a narrow trait so tests can run without touching disk:
//!
//! | Trait                        | Production                   | Tests                        |
//! |------------------------------|------------------------------|------------------------------|
//! | [`kv::KeyValueArea`]         | [`kv_fs::FsKvArea`]          | [`kv_mem::MemKvArea`]        |
//! | [`directory::DirectoryFs`]   | [`dir_fs::FsDirectory`]      | [`dir_mem::MemDirectory`]    |
//! | [`directory::DirectoryPicker`] | CLI prompt / `--dir`       | [`directory::FixedPicker`]   |
//!
//! ## Mode State Machine
//!
//! ```text
//! initialize ── directory accessible ──────────────> DURABLE
//! initialize ── none / unsupported / lost ─────────> EPHEMERAL (+ directory_deleted if lost)
//! DURABLE ── access lost during read or write ─────> EPHEMERAL (+ directory_deleted)
//! EPHEMERAL ── migrate_to_file_system ─────────────> DURABLE
//! any ── use_local_storage ────────────────────────> EPHEMERAL (directory_deleted reset)
//! ```
//!
//! No state is terminal. `directory_deleted` tells the caller to offer a
//! choice: pick a directory again, or keep using local storage.
//!
//! ## Access Loss
//!
//! See [`access`]. A missing `journal.json` is normal (a fresh directory); a
//! missing or forbidden *directory* is access loss and is never silently
//! dropped: the selector turns it into the fallback above.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── local-storage.json   # key/value area: journal-entries, app-settings, fs-directory-handle
//! └── journal-fs.json      # capability store: the granted directory handle
//!
//! <chosen dir>/
//! └── journal.json         # { "entries": { "2024-0": { "date": ..., "memory": ... } } }
//! ```

pub mod access;
pub mod dir_fs;
pub mod dir_mem;
pub mod directory;
pub mod durable;
pub mod ephemeral;
pub mod handles;
pub mod kv;
pub mod kv_fs;
pub mod kv_mem;
pub mod selector;
