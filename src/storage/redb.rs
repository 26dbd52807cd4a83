//! redb store implementation.
//!
//! This module provides the on-disk backend for magic8 using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//!
//! # File Layout
//!
//! When you open a store at `./magic8.db`, redb creates:
//! - `./magic8.db` - Main store file
//! - `./magic8.db.lock` - Lock file for writer coordination (may not be visible)

use std::path::{Path, PathBuf};

use ::redb::{Database, Durability};
use tracing::{debug, info, instrument, warn};

use super::schema::{StoreMetadata, FORMAT_VERSION, METADATA_KEY, METADATA_TABLE, STATE_TABLE};
use super::StateStore;
use crate::config::{Config, SyncMode};
use crate::error::{Magic8Error, Result, StorageError};

/// redb store wrapper.
///
/// Holds the redb database handle and cached metadata.
///
/// # Thread Safety
///
/// `RedbStorage` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStorage {
    /// The redb database handle.
    db: Database,

    /// Cached store metadata.
    metadata: StoreMetadata,

    /// Path to the store file.
    path: PathBuf,

    /// Durability applied to every write.
    sync_mode: SyncMode,
}

impl RedbStorage {
    /// Opens or creates a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store file is corrupted
    /// - The store is locked by another process
    /// - The format version doesn't match
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use magic8::{Config, storage::RedbStorage};
    ///
    /// let storage = RedbStorage::open("./magic8.db", &Config::default())?;
    /// ```
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let exists = path.exists();

        debug!(exists, "Opening store");

        let db = Self::create_database(path)?;

        if exists {
            Self::open_existing(db, path.to_path_buf(), config.sync_mode)
        } else {
            Self::initialize_new(db, path.to_path_buf(), config.sync_mode)
        }
    }

    fn create_database(path: &Path) -> Result<Database> {
        // redb has no typed lock-conflict error, so match on the message.
        let db = Database::builder().create(path).map_err(|e| {
            if e.to_string().contains("locked") {
                StorageError::DatabaseLocked
            } else {
                StorageError::Redb(e.to_string())
            }
        })?;

        debug!("Store file opened");
        Ok(db)
    }

    #[instrument(skip(db), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf, sync_mode: SyncMode) -> Result<Self> {
        info!("Initializing new store");

        let metadata = StoreMetadata::new();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(format_version = FORMAT_VERSION, "Store initialized");

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode,
        })
    }

    #[instrument(skip(db), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, sync_mode: SyncMode) -> Result<Self> {
        info!("Opening existing store");

        let read_txn = db.begin_read().map_err(StorageError::from)?;

        let mut metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing store metadata"))?;

            bincode::deserialize::<StoreMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        if !metadata.is_compatible() {
            warn!(
                expected = FORMAT_VERSION,
                found = metadata.format_version,
                "Format version mismatch"
            );
            return Err(Magic8Error::Storage(StorageError::FormatVersionMismatch {
                expected: FORMAT_VERSION,
                found: metadata.format_version,
            }));
        }

        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            format_version = metadata.format_version,
            created_at = %metadata.created_at,
            "Store opened"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode,
        })
    }

    /// Durability configured for writes.
    #[inline]
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    #[allow(deprecated)]
    fn durability(&self) -> Durability {
        match self.sync_mode {
            SyncMode::Normal => Durability::Immediate,
            SyncMode::Fast => Durability::Eventual,
            SyncMode::Paranoid => Durability::Paranoid,
        }
    }
}

impl StateStore for RedbStorage {
    fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing store");

        // redb flushes durably on drop, which is infallible.
        drop(self.db);

        info!("Store closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(STATE_TABLE)?;

        let value = table.get(key)?.map(|v| v.value().to_vec());
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut write_txn = self.db.begin_write().map_err(StorageError::from)?;
        write_txn.set_durability(self.durability());
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(key, bytes = value.len(), "Store entry saved");
        Ok(())
    }
}
