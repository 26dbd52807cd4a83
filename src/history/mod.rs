//! Answer history log.
//!
//! The log is ordered most recent first. Operations on ids that are not in
//! the log are no-ops; each mutating operation returns whether a record
//! matched so callers can decide what to do about it.
//!
//! # Operations
//!
//! - [`HistoryLog::append`] prepends a record
//! - [`HistoryLog::delete`] removes a record by id
//! - [`HistoryLog::like`] increments a record's like count
//! - [`HistoryLog::rate`] stores a star rating as-is
//! - [`HistoryLog::replace`] swaps in a fetched history wholesale

pub mod types;

pub use types::HistoryRecord;

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::{RecordId, Timestamp};

/// Insertion-ordered history, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id for a record created at `now`.
    ///
    /// Uses the creation millisecond, bumped past the largest id in the log
    /// so two records never share an id. When the largest id is `i64::MAX`
    /// the first free id at or after `now` is used instead.
    pub fn next_id(&self, now: Timestamp) -> RecordId {
        let now = now.as_millis();
        let newest = self.records.iter().map(|r| r.id.get()).max();
        match newest {
            Some(max) if max >= now => match max.checked_add(1) {
                Some(id) => RecordId::new(id),
                None => self.first_free_id(now),
            },
            _ => RecordId::new(now),
        }
    }

    fn first_free_id(&self, from: i64) -> RecordId {
        let taken: BTreeSet<i64> = self.records.iter().map(|r| r.id.get()).collect();
        let id = (from..=i64::MAX)
            .chain(i64::MIN..from)
            .find(|id| !taken.contains(id))
            .unwrap_or(from);
        RecordId::new(id)
    }

    /// Prepends a record.
    pub fn append(&mut self, record: HistoryRecord) {
        debug!(id = %record.id, question = %record.question, "History record appended");
        self.records.insert(0, record);
    }

    /// Removes the record with the given id. Returns false if absent.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        debug!(%id, removed, "History delete");
        removed
    }

    /// Increments the like count of a record.
    ///
    /// Returns the liked record's question so the caller can feed the
    /// popularity tracker, or `None` if the id is absent.
    pub fn like(&mut self, id: RecordId) -> Option<String> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.like_count = record.like_count.saturating_add(1);
        debug!(%id, likes = record.like_count, "History record liked");
        Some(record.question.clone())
    }

    /// Sets a record's rating. Returns false if absent.
    ///
    /// The value is stored as given; the 1-5 star range is a UI convention.
    pub fn rate(&mut self, id: RecordId, stars: i32) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.rating = stars;
                debug!(%id, stars, "History record rated");
                true
            }
            None => false,
        }
    }

    /// Replaces the whole log.
    pub fn replace(&mut self, records: Vec<HistoryRecord>) {
        debug!(
            dropped = self.records.len(),
            loaded = records.len(),
            "History replaced"
        );
        self.records = records;
    }

    /// Looks up a record by id.
    pub fn get(&self, id: RecordId) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Returns the most recent record.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.first()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the log has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }

    /// Returns the records as a slice, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }
}
