//! # Access-Loss Detection
//!
//! A durable store can be in one of several states when a session starts, and
//! the caller must react to each one differently:
//!
//! | Status          | Meaning                                        | Caller reaction          |
//! |-----------------|------------------------------------------------|--------------------------|
//! | `Unsupported`   | no directory storage on this platform          | local storage, silently  |
//! | `NotConfigured` | no directory was ever granted                  | local storage, silently  |
//! | `Accessible`    | granted and the probe succeeded                | directory storage        |
//! | `Lost`          | directory deleted or permission revoked        | local storage + recovery prompt |
//! | `Unavailable`   | granted, but the probe failed for another reason | local storage + recovery prompt |
//!
//! `Lost` and `Unavailable` differ in one respect: a lost handle is forgotten
//! (memory and capability store), an unavailable one is kept so a later
//! session can try again.
//!
//! ## Error Classification
//!
//! [`classify`] is the single place that decides whether an I/O error means
//! access is gone. Directory-level `NotFound`, `NotADirectory` and
//! `PermissionDenied` are access loss. A missing *file* never reaches this
//! function: [`super::directory::DirectoryFs`] reports it as `Ok(None)`.

use super::directory::DirectoryFs;
use super::durable::DurableStore;
use super::kv::KeyValueArea;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFailure {
    /// The directory is gone or no longer grants access.
    Lost,
    /// Anything else; worth retrying later.
    Transient,
}

pub fn classify(err: &io::Error) -> AccessFailure {
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::NotADirectory
        | io::ErrorKind::PermissionDenied => AccessFailure::Lost,
        _ => AccessFailure::Transient,
    }
}

/// Result of probing the current handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessProbe {
    Accessible,
    Lost,
    Unavailable,
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Unsupported,
    NotConfigured,
    Accessible,
    Lost,
    Unavailable,
}

impl AccessStatus {
    /// A directory was configured but cannot be used now.
    pub fn directory_deleted(&self) -> bool {
        matches!(self, AccessStatus::Lost | AccessStatus::Unavailable)
    }
}

impl From<AccessProbe> for AccessStatus {
    fn from(probe: AccessProbe) -> Self {
        match probe {
            AccessProbe::Accessible => AccessStatus::Accessible,
            AccessProbe::Lost => AccessStatus::Lost,
            AccessProbe::Unavailable => AccessStatus::Unavailable,
            AccessProbe::NotConfigured => AccessStatus::NotConfigured,
        }
    }
}

/// Restores the persisted handle (if any) and probes it.
pub fn detect<K: KeyValueArea, F: DirectoryFs>(durable: &DurableStore<K, F>) -> AccessStatus {
    if !durable.is_supported() {
        return AccessStatus::Unsupported;
    }
    if !durable.restore_directory() {
        return AccessStatus::NotConfigured;
    }
    durable.probe_access().into()
}
