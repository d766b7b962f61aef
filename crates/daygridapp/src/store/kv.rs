use crate::error::Result;

/// A small string key/value area private to the application.
///
/// Stands in for the browser's per-origin storage: the ephemeral journal,
/// the settings and the "a directory was granted" marker all live in one
/// area, the directory capability in a second one.
///
/// Methods take `&self`; implementations handle their own interior
/// mutability (or are plain file I/O).
pub trait KeyValueArea {
    /// Returns `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`. Must not leave a half-written area behind.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Whether the area can be used at all.
    fn is_available(&self) -> bool {
        true
    }
}
