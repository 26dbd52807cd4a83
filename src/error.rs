//! Error types for magic8.
//!
//! magic8 uses a hierarchical error system:
//! - `Magic8Error` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`) provide detail
//!
//! Rejected asks (empty question, ball already shaking) are not errors; they
//! are reported through [`AskOutcome::Rejected`](crate::AskOutcome).
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use magic8::{Magic8Ball, Config, Result};
//!
//! async fn example() -> Result<()> {
//!     let ball = Magic8Ball::open("./magic8.db", Config::default())?;
//!     ball.ask("Will it rain?").await?;
//!     ball.close()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias for magic8 operations.
pub type Result<T> = std::result::Result<T, Magic8Error>;

/// Top-level error enum for all magic8 operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum Magic8Error {
    /// Storage layer error (I/O, corruption, transactions).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// Error reported by the answer service.
    #[error("Remote error: {0}")]
    Remote(String),

    /// The ask state machine was not where an operation expected it.
    #[error("Invalid ask state: {0}")]
    InvalidState(String),
}

impl Magic8Error {
    /// Creates a remote error with the given message.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Creates an invalid state error with the given message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the underlying key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store file or data is corrupted.
    #[error("Store corrupted: {0}")]
    Corrupted(String),

    /// Store is locked by another process.
    #[error("Store is locked by another writer")]
    DatabaseLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Store file layout version doesn't match the expected version.
    #[error("Format version mismatch: expected {expected}, found {found}")]
    FormatVersionMismatch {
        /// Expected format version.
        expected: u32,
        /// Actual format version found in the store.
        found: u32,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

// Conversions from redb error types
impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

// Also allow direct conversion to Magic8Error for convenience
impl From<redb::TransactionError> for Magic8Error {
    fn from(err: redb::TransactionError) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for Magic8Error {
    fn from(err: redb::CommitError) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for Magic8Error {
    fn from(err: redb::TableError) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for Magic8Error {
    fn from(err: redb::StorageError) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for Magic8Error {
    fn from(err: bincode::Error) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

impl From<serde_json::Error> for Magic8Error {
    fn from(err: serde_json::Error) -> Self {
        Magic8Error::Storage(StorageError::from(err))
    }
}

/// Validation errors for input data.
///
/// These errors indicate problems with data provided by the caller.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A numeric field is outside its allowed range.
    #[error("'{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the field.
        field: String,
        /// Value provided.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Manual level-up requested without enough XP.
    #[error("Level up needs {required} XP, have {xp}")]
    LevelUpLocked {
        /// Current XP.
        xp: i64,
        /// XP needed to unlock the level-up (`level * 100`).
        required: i64,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Creates a level-up locked error.
    pub fn level_up_locked(xp: i64, required: i64) -> Self {
        Self::LevelUpLocked { xp, required }
    }
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// History record with given ID not found.
    #[error("History record not found: {0}")]
    Record(String),

    /// Popular question at the given rank not found.
    #[error("Popular question not found: {0}")]
    PopularQuestion(String),
}

impl NotFoundError {
    /// Creates a history record not found error.
    pub fn record(id: impl ToString) -> Self {
        Self::Record(id.to_string())
    }

    /// Creates a popular question not found error.
    pub fn popular_question(rank: impl ToString) -> Self {
        Self::PopularQuestion(rank.to_string())
    }
}
