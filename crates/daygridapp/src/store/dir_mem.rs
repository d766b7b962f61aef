use super::directory::{DirectoryFs, DirectoryHandle};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Default)]
struct MemDir {
    files: BTreeMap<String, String>,
    revoked: bool,
}

/// In-memory directory tree for testing.
///
/// Clones share state, so a test can keep one copy to delete directories,
/// revoke permissions or inject failures while the store holds another.
#[derive(Clone, Default)]
pub struct MemDirectory {
    dirs: Rc<RefCell<HashMap<PathBuf, MemDir>>>,
    unsupported: Rc<Cell<bool>>,
    simulate_io_error: Rc<Cell<bool>>,
    simulate_write_error: Rc<Cell<bool>>,
    failing_reads: Rc<RefCell<HashSet<String>>>,
    failing_removes: Rc<RefCell<HashSet<String>>>,
    unlisted: Rc<RefCell<HashSet<PathBuf>>>,
}

impl MemDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        self.dirs
            .borrow_mut()
            .entry(path.clone())
            .or_default();
        path
    }

    /// Deletes the directory and everything in it.
    pub fn remove_dir(&self, path: &Path) {
        self.dirs.borrow_mut().remove(path);
    }

    /// Keeps the directory but denies every access to it.
    pub fn revoke(&self, path: &Path) {
        if let Some(dir) = self.dirs.borrow_mut().get_mut(path) {
            dir.revoked = true;
        }
    }

    /// The directory opens, but listing its files is refused.
    pub fn deny_listing(&self, path: &Path) {
        self.unlisted.borrow_mut().insert(path.to_path_buf());
    }

    pub fn put_file(&self, path: &Path, name: &str, content: &str) {
        if let Some(dir) = self.dirs.borrow_mut().get_mut(path) {
            dir.files.insert(name.to_string(), content.to_string());
        }
    }

    pub fn file(&self, path: &Path, name: &str) -> Option<String> {
        self.dirs
            .borrow()
            .get(path)
            .and_then(|dir| dir.files.get(name).cloned())
    }

    pub fn file_names(&self, path: &Path) -> Vec<String> {
        self.dirs
            .borrow()
            .get(path)
            .map(|dir| dir.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn set_supported(&self, supported: bool) {
        self.unsupported.set(!supported);
    }

    /// Every call fails with a non-access error.
    pub fn set_simulate_io_error(&self, simulate: bool) {
        self.simulate_io_error.set(simulate);
    }

    /// Writes and removals fail with a non-access error.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn fail_reads_of(&self, name: &str) {
        self.failing_reads.borrow_mut().insert(name.to_string());
    }

    pub fn fail_removes_of(&self, name: &str) {
        self.failing_removes.borrow_mut().insert(name.to_string());
    }

    fn with_dir<T>(
        &self,
        path: &Path,
        op: impl FnOnce(&mut MemDir) -> io::Result<T>,
    ) -> io::Result<T> {
        if self.simulate_io_error.get() {
            return Err(io::Error::other("Simulated I/O error"));
        }
        let mut dirs = self.dirs.borrow_mut();
        let dir = dirs.get_mut(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })?;
        if dir.revoked {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access to {} was revoked", path.display()),
            ));
        }
        op(dir)
    }

    fn check_write(&self) -> io::Result<()> {
        if self.simulate_write_error.get() {
            return Err(io::Error::other("Simulated write error"));
        }
        Ok(())
    }
}

impl DirectoryFs for MemDirectory {
    fn is_supported(&self) -> bool {
        !self.unsupported.get()
    }

    fn open(&self, path: &Path) -> io::Result<DirectoryHandle> {
        self.with_dir(path, |_| Ok(()))?;
        Ok(DirectoryHandle::new(path.to_path_buf()))
    }

    fn probe(&self, dir: &DirectoryHandle) -> io::Result<()> {
        self.with_dir(dir.path(), |_| Ok(()))
    }

    fn file_exists(&self, dir: &DirectoryHandle, name: &str) -> io::Result<bool> {
        self.with_dir(dir.path(), |d| Ok(d.files.contains_key(name)))
    }

    fn read_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<Option<String>> {
        if self.failing_reads.borrow().contains(name) {
            return Err(io::Error::other(format!("Simulated read error for {}", name)));
        }
        self.with_dir(dir.path(), |d| Ok(d.files.get(name).cloned()))
    }

    fn write_file(&self, dir: &DirectoryHandle, name: &str, content: &str) -> io::Result<()> {
        self.with_dir(dir.path(), |d| {
            self.check_write()?;
            d.files.insert(name.to_string(), content.to_string());
            Ok(())
        })
    }

    fn remove_file(&self, dir: &DirectoryHandle, name: &str) -> io::Result<()> {
        self.with_dir(dir.path(), |d| {
            self.check_write()?;
            if self.failing_removes.borrow().contains(name) {
                return Err(io::Error::other(format!("Simulated remove error for {}", name)));
            }
            d.files.remove(name);
            Ok(())
        })
    }

    fn list_files(&self, dir: &DirectoryHandle) -> io::Result<Vec<String>> {
        if self.unlisted.borrow().contains(dir.path()) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot list {}", dir.path().display()),
            ));
        }
        self.with_dir(dir.path(), |d| Ok(d.files.keys().cloned().collect()))
    }
}
