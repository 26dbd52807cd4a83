//! Store layout definitions and versioning.
//!
//! # Format Versioning
//!
//! The format version describes the table layout of the store file and is
//! kept in the metadata table. Opening a file written with a different
//! layout fails. The JSON entries themselves carry no version; missing or
//! unreadable fields fall back to defaults when loaded.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                               │
//! │   Key: &str                                                  │
//! │   Value: &[u8] (bincode)                                     │
//! │   Entries: "store_metadata" -> StoreMetadata                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ STATE_TABLE                                                  │
//! │   Key: &str                                                  │
//! │   Value: &[u8] (JSON object)                                 │
//! │   Entries: "settings" -> Settings, "user" -> Profile         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::TableDefinition;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Current store format version.
///
/// Increment this when changing the table layout.
pub const FORMAT_VERSION: u32 = 1;

/// Key of the settings entry.
pub const SETTINGS_KEY: &str = "settings";

/// Key of the profile entry.
pub const PROFILE_KEY: &str = "user";

/// Key of the metadata record in [`METADATA_TABLE`].
pub const METADATA_KEY: &str = "store_metadata";

/// Store-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Persisted preferences, one JSON object per key.
pub const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

/// Store metadata kept in the metadata table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Layout version for compatibility checking.
    pub format_version: u32,

    /// When the store was created.
    pub created_at: Timestamp,

    /// Last time the store was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl StoreMetadata {
    /// Creates metadata for a fresh store.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            format_version: FORMAT_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata matches the current layout.
    pub fn is_compatible(&self) -> bool {
        self.format_version == FORMAT_VERSION
    }
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_metadata_new() {
        let meta = StoreMetadata::new();
        assert_eq!(meta.format_version, FORMAT_VERSION);
        assert_eq!(meta.created_at, meta.last_opened_at);
        assert!(meta.is_compatible());
    }

    #[test]
    fn test_store_metadata_touch() {
        let mut meta = StoreMetadata::new();
        let original = meta.last_opened_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        meta.touch();
        assert!(meta.last_opened_at > original);
    }

    #[test]
    fn test_store_metadata_bincode() {
        let meta = StoreMetadata::new();
        let bytes = bincode::serialize(&meta).unwrap();
        let restored: StoreMetadata = bincode::deserialize(&bytes).unwrap();
        assert_eq!(meta, restored);
    }

    #[test]
    fn test_incompatible_version() {
        let meta = StoreMetadata {
            format_version: FORMAT_VERSION + 1,
            ..StoreMetadata::new()
        };
        assert!(!meta.is_compatible());
    }
}
