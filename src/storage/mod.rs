//! Key-value persistence for settings and profile.
//!
//! This module provides a trait-based abstraction over the store, allowing
//! different backends to be used (redb on disk, in-memory for tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Magic8Ball                              │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │     StateStore      │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                    ▲         ▲                              │
//! │                    │         │                              │
//! │         ┌─────────┴─┐   ┌───┴─────────┐                    │
//! │         │RedbStorage│   │ MemoryStore │                    │
//! │         └───────────┘   └─────────────┘                    │
//! │           (disk)          (ephemeral)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Loading
//!
//! Entries are JSON objects. A stored object is shallow-merged over the
//! default value, so a partial entry keeps the defaults for keys it lacks.
//! An entry that is not valid JSON, not an object, or that fails to
//! deserialize or validate after merging is ignored with a warning and the
//! defaults are used.

pub mod memory;
pub mod redb;
pub mod schema;

pub use self::memory::MemoryStore;
pub use self::redb::RedbStorage;
pub use schema::{StoreMetadata, FORMAT_VERSION, PROFILE_KEY, SETTINGS_KEY};

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::profile::Profile;
use crate::settings::Settings;

/// Key-value store trait for magic8.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the facade can be shared
/// across threads. The store handles internal synchronization.
pub trait StateStore: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the store metadata.
    fn metadata(&self) -> &StoreMetadata;

    /// Closes the store, flushing any pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend supports reporting flush failures.
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the store file, if applicable.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Raw entries
    // =========================================================================

    /// Reads an entry.
    ///
    /// Returns `None` if the key has never been written.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrites an entry. Each call commits on its own.
    fn put_raw(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Opens a store at the given path.
///
/// This is a convenience function that creates a [`RedbStorage`] instance.
///
/// # Errors
///
/// Returns an error if:
/// - The store file is corrupted
/// - The store is locked by another process
/// - The format version doesn't match
pub fn open_storage(path: impl AsRef<Path>, config: &Config) -> Result<Box<dyn StateStore>> {
    let storage = RedbStorage::open(path, config)?;
    Ok(Box::new(storage))
}

/// Writes the full settings object under [`SETTINGS_KEY`].
pub fn save_settings<S: StateStore + ?Sized>(store: &S, settings: &Settings) -> Result<()> {
    put_json(store, SETTINGS_KEY, settings)
}

/// Writes the full profile object under [`PROFILE_KEY`].
pub fn save_profile<S: StateStore + ?Sized>(store: &S, profile: &Profile) -> Result<()> {
    put_json(store, PROFILE_KEY, profile)
}

/// Loads settings merged over [`Settings::default`].
pub fn load_settings<S: StateStore + ?Sized>(store: &S) -> Result<Settings> {
    load_merged(store, SETTINGS_KEY, |settings: &Settings| {
        settings.validate().map_err(|e| e.to_string())
    })
}

/// Loads the profile merged over [`Profile::default`].
pub fn load_profile<S: StateStore + ?Sized>(store: &S) -> Result<Profile> {
    load_merged(store, PROFILE_KEY, |profile: &Profile| {
        profile.validate().map_err(|e| e.to_string())
    })
}

fn put_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: StateStore + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(value)?;
    store.put_raw(key, &bytes)?;
    debug!(key, bytes = bytes.len(), "Entry written");
    Ok(())
}

fn load_merged<S, T>(
    store: &S,
    key: &str,
    check: impl Fn(&T) -> std::result::Result<(), String>,
) -> Result<T>
where
    S: StateStore + ?Sized,
    T: Serialize + DeserializeOwned + Default,
{
    let Some(bytes) = store.get_raw(key)? else {
        debug!(key, "Entry missing, using defaults");
        return Ok(T::default());
    };

    let merged = merge_over_default::<T>(&bytes).and_then(|value| {
        check(&value)?;
        Ok(value)
    });

    match merged {
        Ok(value) => Ok(value),
        Err(reason) => {
            warn!(key, %reason, "Ignoring unreadable entry, using defaults");
            Ok(T::default())
        }
    }
}

/// Shallow-merges a stored JSON object over the serialized default.
fn merge_over_default<T>(bytes: &[u8]) -> std::result::Result<T, String>
where
    T: Serialize + DeserializeOwned + Default,
{
    let stored: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let Value::Object(stored) = stored else {
        return Err("entry is not a JSON object".to_string());
    };

    let mut merged = serde_json::to_value(T::default()).map_err(|e| e.to_string())?;
    if let Value::Object(base) = &mut merged {
        base.extend(stored);
    }

    serde_json::from_value(merged).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use tempfile::tempdir;

    #[test]
    fn test_open_storage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let storage = open_storage(&path, &Config::default()).unwrap();

        assert_eq!(storage.metadata().format_version, FORMAT_VERSION);
        assert!(storage.path().is_some());

        storage.close().unwrap();
    }

    #[test]
    fn test_storage_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RedbStorage>();
        assert_send_sync::<MemoryStore>();
    }

    #[test]
    fn test_missing_entries_default() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());
        assert_eq!(load_profile(&store).unwrap(), Profile::default());
    }

    #[test]
    fn test_partial_settings_merge() {
        let store = MemoryStore::new();
        store.put_raw(SETTINGS_KEY, br#"{"theme":"neon"}"#).unwrap();
        let settings = load_settings(&store).unwrap();
        assert_eq!(settings.theme, Theme::Neon);
        assert!(!settings.dark_mode);
        assert_eq!(settings.animation_speed, 1.0);
    }

    #[test]
    fn test_partial_profile_merge() {
        let store = MemoryStore::new();
        store.put_raw(PROFILE_KEY, br#"{"xp":40,"extra":true}"#).unwrap();
        let profile = load_profile(&store).unwrap();
        assert_eq!(profile.xp, 40);
        assert_eq!(profile.name, "Curious User");
        assert_eq!(profile.badges.len(), 2);
    }

    #[test]
    fn test_malformed_entries_default() {
        let store = MemoryStore::new();
        store.put_raw(SETTINGS_KEY, b"{not json").unwrap();
        store.put_raw(PROFILE_KEY, b"[1,2,3]").unwrap();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());
        assert_eq!(load_profile(&store).unwrap(), Profile::default());
    }

    #[test]
    fn test_wrong_field_type_defaults() {
        let store = MemoryStore::new();
        store.put_raw(SETTINGS_KEY, br#"{"darkMode":"yes"}"#).unwrap();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());
    }

    #[test]
    fn test_out_of_range_speed_defaults() {
        let store = MemoryStore::new();
        store
            .put_raw(SETTINGS_KEY, br#"{"animationSpeed":9.0,"darkMode":true}"#)
            .unwrap();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut profile = Profile::named("Ada");
        profile.xp = 70;
        save_profile(&store, &profile).unwrap();
        assert_eq!(load_profile(&store).unwrap(), profile);

        let settings = Settings {
            dark_mode: true,
            animation_speed: 1.5,
            theme: Theme::Galaxy,
        };
        save_settings(&store, &settings).unwrap();
        assert_eq!(load_settings(&store).unwrap(), settings);
    }
}
