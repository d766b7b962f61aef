//! Directory capability, the filesystem seam behind it, and the picker.
//!
//! A [`DirectoryHandle`] is what the user grants when picking a directory. It
//! can be persisted and restored in a later session, but it is only a claim:
//! the directory may have been deleted or its permissions revoked in the
//! meantime, which is why every use goes through [`DirectoryFs`] and its
//! errors through [`super::access::classify`].

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Opaque capability for one user-chosen directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryHandle {
    path: PathBuf,
    name: String,
}

impl DirectoryHandle {
    pub(crate) fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    /// Human-readable directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Raw I/O against a granted directory.
///
/// Implementations report failures as plain `io::Error`s and leave their
/// interpretation to the durable store. Two contracts matter:
/// - a missing *file* inside an existing directory is `Ok(None)` / `Ok(false)`,
/// - a missing or inaccessible *directory* is an `Err`.
pub trait DirectoryFs {
    fn is_supported(&self) -> bool {
        true
    }

    /// Validates a freshly picked path for read-write use and returns its handle.
    fn open(&self, path: &Path) -> io::Result<DirectoryHandle>;

    /// Cheap access check: lists at most one entry.
    fn probe(&self, dir: &DirectoryHandle) -> io::Result<()>;

    fn file_exists(&self, dir: &DirectoryHandle, name: &str) -> io::Result<bool>;

    fn read_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<Option<String>>;

    /// MUST be atomic (write to tmp then rename).
    fn write_file(&self, dir: &DirectoryHandle, name: &str, content: &str) -> io::Result<()>;

    /// Removing a file that is already gone is not an error.
    fn remove_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<()>;

    /// Names of the regular files directly inside the directory.
    fn list_files(&self, dir: &DirectoryHandle) -> io::Result<Vec<String>>;
}

/// Outcome of asking the user for a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRequest {
    Granted,
    /// The user declined. Not an error: no error UI.
    Cancelled,
    Failed,
}

impl DirectoryRequest {
    pub fn is_success(&self) -> bool {
        matches!(self, DirectoryRequest::Granted)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DirectoryRequest::Cancelled)
    }
}

/// Asks the user for a directory. May block until they answer.
pub trait DirectoryPicker {
    /// `Ok(None)` means the user cancelled.
    fn pick_directory(&self) -> io::Result<Option<PathBuf>>;
}

/// Picker with a predetermined answer (command-line flag, tests).
#[derive(Debug, Clone, Default)]
pub struct FixedPicker {
    answer: Option<PathBuf>,
}

impl FixedPicker {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            answer: Some(path.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl DirectoryPicker for FixedPicker {
    fn pick_directory(&self) -> io::Result<Option<PathBuf>> {
        Ok(self.answer.clone())
    }
}
