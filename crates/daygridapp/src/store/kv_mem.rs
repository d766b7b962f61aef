use super::kv::KeyValueArea;
use crate::error::{JournalError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory key/value area for testing.
///
/// Clones share the same storage, the way several components share one
/// browser origin.
#[derive(Clone, Default)]
pub struct MemKvArea {
    items: Rc<RefCell<HashMap<String, String>>>,
    simulate_write_error: Rc<Cell<bool>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemKvArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail, like a full quota.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueArea for MemKvArea {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(JournalError::Store("Simulated write error".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(JournalError::Store("Simulated write error".to_string()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.unavailable.get()
    }
}
