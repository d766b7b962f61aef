use super::directory::{DirectoryFs, DirectoryHandle};
use std::fs;
use std::io;
use std::path::Path;
use uuid::Uuid;

/// Directory access on the real filesystem.
///
/// Never creates the granted directory: if it disappears, every call fails
/// with the underlying `NotFound`, which the durable store treats as access
/// loss.
#[derive(Debug, Clone, Default)]
pub struct FsDirectory;

impl FsDirectory {
    pub fn new() -> Self {
        Self
    }
}

/// Why the directory itself can no longer be used, if it cannot.
fn directory_failure(dir: &DirectoryHandle) -> Option<io::Error> {
    match fs::metadata(dir.path()) {
        Ok(meta) if !meta.is_dir() => {
            return Some(io::Error::from(io::ErrorKind::NotADirectory));
        }
        Ok(meta) if meta.permissions().readonly() => {
            return Some(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", dir.path().display()),
            ));
        }
        Ok(_) => {}
        Err(e) => return Some(e),
    }
    fs::read_dir(dir.path()).err()
}

/// Errors on a single file keep an access-loss kind only when the directory
/// is affected too.
fn file_failure(dir: &DirectoryHandle, name: &str, err: io::Error) -> io::Error {
    if let Some(dir_err) = directory_failure(dir) {
        return dir_err;
    }
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::NotADirectory
        | io::ErrorKind::PermissionDenied => io::Error::other(format!("{}: {}", name, err)),
        _ => err,
    }
}

/// Turns "file not found" into `missing` as long as the directory is fine.
fn missing_file<T>(
    dir: &DirectoryHandle,
    name: &str,
    err: io::Error,
    missing: T,
) -> io::Result<T> {
    if err.kind() != io::ErrorKind::NotFound {
        return Err(file_failure(dir, name, err));
    }
    match directory_failure(dir) {
        Some(dir_err) => Err(dir_err),
        None => Ok(missing),
    }
}

impl DirectoryFs for FsDirectory {
    fn open(&self, path: &Path) -> io::Result<DirectoryHandle> {
        let meta = fs::metadata(path)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        if meta.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        let canonical = fs::canonicalize(path)?;
        Ok(DirectoryHandle::new(canonical))
    }

    fn probe(&self, dir: &DirectoryHandle) -> io::Result<()> {
        let mut entries = fs::read_dir(dir.path())?;
        if let Some(entry) = entries.next() {
            entry?;
        }
        Ok(())
    }

    fn file_exists(&self, dir: &DirectoryHandle, name: &str) -> io::Result<bool> {
        match fs::metadata(dir.path().join(name)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) => missing_file(dir, name, e, false),
        }
    }

    fn read_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(dir.path().join(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) => missing_file(dir, name, e, None),
        }
    }

    fn write_file(&self, dir: &DirectoryHandle, name: &str, content: &str) -> io::Result<()> {
        let target = dir.path().join(name);
        let tmp = dir.path().join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, content) {
            return Err(file_failure(dir, name, e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(file_failure(dir, name, e));
        }
        Ok(())
    }

    fn remove_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<()> {
        match fs::remove_file(dir.path().join(name)) {
            Ok(()) => Ok(()),
            Err(e) => missing_file(dir, name, e, ()),
        }
    }

    fn list_files(&self, dir: &DirectoryHandle) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir.path())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
