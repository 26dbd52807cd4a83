//! # magic8
//!
//! A Magic 8 Ball: ask a yes/no question, shake, and get one of twenty
//! canned answers.
//!
//! Around the draw sits a small game: every ask lands in a history log,
//! earns experience towards levels and badges, and counts towards a ranked
//! list of popular questions. Settings and profile persist in an embedded
//! key-value store.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use magic8::{Magic8Ball, Config};
//!
//! // Open or create a store
//! let ball = Magic8Ball::open("./magic8.db", Config::default())?;
//!
//! // Load the shared history
//! ball.refresh_history().await?;
//!
//! // Ask
//! if let Some(report) = ball.ask("Will I get a promotion this year?").await?.report() {
//!     println!("{}", magic8::answer::plain_text(&report.answer));
//! }
//!
//! // Clean up
//! ball.close()?;
//! ```
//!
//! ## Key Concepts
//!
//! ### Ask workflow
//!
//! An ask moves the ball `Idle -> Busy -> Revealing -> Idle`. While busy,
//! further asks are rejected rather than queued. Completing an ask appends
//! a [`HistoryRecord`], credits 10 XP, and counts the question in the
//! [`PopularityTracker`].
//!
//! ### State and effects
//!
//! [`AppState`] holds everything and is updated by plain functions that
//! return [`Effect`]s. [`Magic8Ball`] applies those effects through a
//! [`Platform`] and persists settings and profile through a
//! [`StateStore`](storage::StateStore).
//!
//! ## Thread Safety
//!
//! `Magic8Ball` is `Send + Sync` and can be shared across tasks using `Arc`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod ball;
mod config;
mod error;
mod state;
mod types;

pub mod answer;
pub mod effects;
pub mod remote;
pub mod storage;

// Domain modules
mod history;
mod popularity;
mod profile;
mod session;
mod settings;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main interface
pub use ball::Magic8Ball;

// Configuration
pub use config::{Config, SyncMode, MAX_ASK_DURATION};

// Error handling
pub use error::{Magic8Error, NotFoundError, Result, StorageError, ValidationError};

// Core types
pub use types::{RecordId, Timestamp};

// State
pub use state::{AppState, AskOutcome, AskReport, AskTicket};

// Domain types
pub use answer::{AnswerSelector, ANSWERS};
pub use effects::{Celebration, Effect, Platform, ShareOutcome, ShareRequest, SoundClip};
pub use history::{HistoryLog, HistoryRecord};
pub use popularity::{
    PopularQuestion, PopularityChange, PopularityTracker, POPULAR_CAPACITY, STARTER_QUESTIONS,
};
pub use profile::{
    derived_level, level_badge, Profile, ProfileUpdate, DEDICATED_SEEKER, DEFAULT_NAME,
    STARTER_BADGES, XP_PER_ASK, XP_PER_LEVEL,
};
pub use session::{AskState, InvalidTransition, RejectReason, Session};
pub use settings::{Settings, Theme, MAX_ANIMATION_SPEED, MIN_ANIMATION_SPEED};

// Storage (for advanced users)
pub use storage::StoreMetadata;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common magic8 usage.
///
/// ```rust
/// use magic8::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ball::Magic8Ball;
    pub use crate::config::{Config, SyncMode};
    pub use crate::error::{Magic8Error, Result};
    pub use crate::history::HistoryRecord;
    pub use crate::session::AskState;
    pub use crate::state::{AskOutcome, AskReport};
    pub use crate::types::{RecordId, Timestamp};
}
