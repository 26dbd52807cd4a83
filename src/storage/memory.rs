//! In-memory store.
//!
//! Nothing survives the process. Useful for tests and throwaway sessions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use super::schema::StoreMetadata;
use super::StateStore;
use crate::error::Result;

/// HashMap-backed [`StateStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    metadata: StoreMetadata,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> T) -> T {
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl StateStore for MemoryStore {
    fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.with_entries(|entries| entries.get(key).cloned()))
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<()> {
        self.with_entries(|entries| entries.insert(key.to_string(), value.to_vec()));
        Ok(())
    }
}
