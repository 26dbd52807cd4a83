//! Configuration types for magic8.
//!
//! The [`Config`] struct controls engine behavior including:
//! - Ask timing (shake animation and "thinking" delay)
//! - Durability of key-value writes
//! - Author label on new history records
//!
//! # Example
//! ```rust
//! use magic8::{Config, SyncMode};
//! use std::time::Duration;
//!
//! // Use defaults (2.5s shake, 0.5s thinking)
//! let config = Config::default();
//!
//! // Faster ball for a kiosk
//! let config = Config {
//!     shake_duration: Duration::from_millis(800),
//!     sync_mode: SyncMode::Fast,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest a single ask may keep the ball busy.
pub const MAX_ASK_DURATION: Duration = Duration::from_secs(60);

/// Engine configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use magic8::Config;
///
/// let config = Config {
///     author: "Player One".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// How long the shake animation keeps the ball busy.
    ///
    /// Default: 2.5s (five 0.5s shake passes)
    pub shake_duration: Duration,

    /// Pause between the end of the shake and the reveal.
    ///
    /// Default: 0.5s
    pub thinking_delay: Duration,

    /// Durability mode for key-value writes.
    pub sync_mode: SyncMode,

    /// Author recorded on history entries created by [`ask`](crate::Magic8Ball::ask).
    pub author: String,

    /// Start the popularity tracker with the starter questions.
    pub seed_popular: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shake_duration: Duration::from_millis(2500),
            thinking_delay: Duration::from_millis(500),
            sync_mode: SyncMode::Normal,
            author: "You".to_string(),
            seed_popular: true,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config with no shake or thinking delay.
    ///
    /// Asks still pass through the busy state, they just don't wait.
    ///
    /// # Example
    /// ```rust
    /// use magic8::Config;
    ///
    /// let config = Config::instant();
    /// assert!(config.ask_duration().is_zero());
    /// ```
    pub fn instant() -> Self {
        Self {
            shake_duration: Duration::ZERO,
            thinking_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Total time an ask keeps the ball busy.
    pub fn ask_duration(&self) -> Duration {
        self.shake_duration + self.thinking_delay
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `Magic8Ball::open()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `shake_duration + thinking_delay` exceeds [`MAX_ASK_DURATION`]
    /// - `author` is empty or whitespace-only
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ask_duration() > MAX_ASK_DURATION {
            return Err(ValidationError::invalid_field(
                "shake_duration",
                format!(
                    "shake plus thinking delay must not exceed {}s",
                    MAX_ASK_DURATION.as_secs()
                ),
            ));
        }

        if self.author.trim().is_empty() {
            return Err(ValidationError::invalid_field("author", "must not be empty"));
        }

        Ok(())
    }
}

/// Durability mode for write operations.
///
/// Controls the trade-off between write performance and crash safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    #[default]
    Normal,

    /// Async sync (faster writes, may lose recent preference changes on crash).
    Fast,

    /// Sync every write with extra verification (slowest).
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode syncs on every write.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}
