//! Popularity tracker: a bounded ranking of asked questions.
//!
//! # Constraints
//!
//! - At most [`POPULAR_CAPACITY`] distinct questions are tracked
//! - Entries are never removed; once full, novel questions are ignored
//! - After every mutation the list is sorted by count, descending, with
//!   ties keeping their previous relative order

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of tracked questions.
pub const POPULAR_CAPACITY: usize = 20;

/// Questions the tracker starts with, with their starting counts.
pub const STARTER_QUESTIONS: [(&str, u32); 10] = [
    ("Will I get a promotion this year?", 15),
    ("Should I start a new hobby?", 12),
    ("Is it a good time to travel?", 10),
    ("Will I find love soon?", 9),
    ("Should I change my career?", 8),
    ("Will I make new friends this year?", 7),
    ("Is it a good time to invest in stocks?", 6),
    ("Will I achieve my fitness goals?", 5),
    ("Should I adopt a pet?", 4),
    ("Will I learn a new skill successfully?", 3),
];

/// A tracked question and how often it came up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularQuestion {
    /// Question text; unique within the tracker.
    pub text: String,

    /// Occurrences (asks plus likes), at least 1.
    pub count: u32,
}

/// What [`PopularityTracker::record`] did with a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopularityChange {
    /// Existing entry incremented.
    Incremented,
    /// New entry inserted with count 1.
    Inserted,
    /// Tracker full; question not tracked.
    Dropped,
}

/// Bounded, count-ranked list of questions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopularityTracker {
    entries: Vec<PopularQuestion>,
}

impl PopularityTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker holding [`STARTER_QUESTIONS`].
    pub fn seeded() -> Self {
        Self::from_entries(
            STARTER_QUESTIONS
                .iter()
                .map(|(text, count)| PopularQuestion {
                    text: (*text).to_string(),
                    count: *count,
                })
                .collect(),
        )
    }

    /// Builds a tracker from arbitrary entries.
    ///
    /// Duplicate texts after the first and entries past capacity are
    /// discarded; the rest are ranked.
    pub fn from_entries(entries: Vec<PopularQuestion>) -> Self {
        let mut tracker = Self::new();
        for entry in entries {
            if tracker.entries.len() >= POPULAR_CAPACITY {
                break;
            }
            if tracker.position(&entry.text).is_none() {
                tracker.entries.push(entry);
            }
        }
        tracker.rank();
        tracker
    }

    /// Counts one occurrence of `text`.
    pub fn record(&mut self, text: &str) -> PopularityChange {
        let change = if let Some(idx) = self.position(text) {
            let entry = &mut self.entries[idx];
            entry.count = entry.count.saturating_add(1);
            PopularityChange::Incremented
        } else if self.entries.len() < POPULAR_CAPACITY {
            self.entries.push(PopularQuestion {
                text: text.to_string(),
                count: 1,
            });
            PopularityChange::Inserted
        } else {
            PopularityChange::Dropped
        };

        if change != PopularityChange::Dropped {
            self.rank();
        }
        debug!(question = %text, ?change, tracked = self.entries.len(), "Popularity updated");
        change
    }

    /// Entries ranked by count, highest first.
    pub fn entries(&self) -> &[PopularQuestion] {
        &self.entries
    }

    /// Entry at the given rank (0 = most popular).
    pub fn get(&self, rank: usize) -> Option<&PopularQuestion> {
        self.entries.get(rank)
    }

    /// Count for a question, if tracked.
    pub fn count_of(&self, text: &str) -> Option<u32> {
        self.position(text).map(|idx| self.entries[idx].count)
    }

    /// Number of tracked questions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true once capacity is reached.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= POPULAR_CAPACITY
    }

    fn position(&self, text: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.text == text)
    }

    // Vec::sort_by is stable, so equal counts keep their order.
    fn rank(&mut self) {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
    }
}
