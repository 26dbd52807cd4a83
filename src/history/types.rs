//! Data types for the answer history.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// One asked question and the answer the ball gave.
///
/// Records are created on ask with `like_count = 0` and `rating = 0`,
/// mutated by like/rate, and removed only by an explicit delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Unique id (creation time in milliseconds).
    pub id: RecordId,

    /// Who asked.
    pub author: String,

    /// The question text as asked.
    pub question: String,

    /// The answer, with its layout line breaks.
    pub answer: String,

    /// When the record was created.
    pub created_at: Timestamp,

    /// Number of likes.
    pub like_count: u32,

    /// Star rating. Expected 1-5 once rated, 0 when unrated; not enforced.
    pub rating: i32,
}

impl HistoryRecord {
    /// Creates an unrated, unliked record.
    pub fn new(
        id: RecordId,
        author: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            question: question.into(),
            answer: answer.into(),
            created_at,
            like_count: 0,
            rating: 0,
        }
    }

    /// Returns true once the record has at least one like.
    pub fn is_liked(&self) -> bool {
        self.like_count > 0
    }
}
