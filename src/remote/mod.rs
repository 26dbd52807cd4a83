//! Answer service: where history comes from and where answers go.
//!
//! There is no real backend. [`SimulatedAnswerService`] stands in for one
//! with fixed delays, calls that always succeed, two seed records, and a
//! log line for every submitted answer.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::history::HistoryRecord;
use crate::types::{RecordId, Timestamp};

/// Delay before a simulated history fetch resolves.
pub const FETCH_DELAY: Duration = Duration::from_millis(500);

/// Delay before a simulated submission resolves.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(300);

const ONE_DAY_MS: i64 = 86_400_000;

/// Remote collaborator for answer history.
///
/// # Implementing a Custom Service
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use magic8::remote::AnswerService;
/// use magic8::{HistoryRecord, Result};
///
/// struct HttpAnswers { client: MyClient }
///
/// #[async_trait]
/// impl AnswerService for HttpAnswers {
///     async fn fetch_answer_history(&self) -> Result<Vec<HistoryRecord>> {
///         Ok(self.client.get_history().await?)
///     }
///
///     async fn submit_answer(&self, question: &str, answer: &str) -> Result<()> {
///         Ok(self.client.post_answer(question, answer).await?)
///     }
/// }
/// ```
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Fetches the history to show at startup, newest first.
    async fn fetch_answer_history(&self) -> Result<Vec<HistoryRecord>>;

    /// Reports a completed ask.
    async fn submit_answer(&self, question: &str, answer: &str) -> Result<()>;
}

/// Fixed-delay stand-in for a backend.
#[derive(Clone, Debug)]
pub struct SimulatedAnswerService {
    fetch_delay: Duration,
    submit_delay: Duration,
}

impl Default for SimulatedAnswerService {
    fn default() -> Self {
        Self {
            fetch_delay: FETCH_DELAY,
            submit_delay: SUBMIT_DELAY,
        }
    }
}

impl SimulatedAnswerService {
    /// Creates a service with the standard delays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service with custom delays.
    pub fn with_delays(fetch_delay: Duration, submit_delay: Duration) -> Self {
        Self {
            fetch_delay,
            submit_delay,
        }
    }

    /// Creates a service that answers without waiting.
    pub fn instant() -> Self {
        Self::with_delays(Duration::ZERO, Duration::ZERO)
    }
}

/// The two records every simulated fetch returns.
pub fn seed_history(now: Timestamp) -> Vec<HistoryRecord> {
    vec![
        HistoryRecord {
            id: RecordId::new(1),
            author: "Alice".to_string(),
            question: "Will it rain today?".to_string(),
            answer: "Yes".to_string(),
            created_at: now,
            like_count: 5,
            rating: 4,
        },
        HistoryRecord {
            id: RecordId::new(2),
            author: "Bob".to_string(),
            question: "Should I buy a new car?".to_string(),
            answer: "Ask again later".to_string(),
            created_at: now.minus_millis(ONE_DAY_MS),
            like_count: 3,
            rating: 3,
        },
    ]
}

#[async_trait]
impl AnswerService for SimulatedAnswerService {
    async fn fetch_answer_history(&self) -> Result<Vec<HistoryRecord>> {
        pause(self.fetch_delay).await;
        Ok(seed_history(Timestamp::now()))
    }

    async fn submit_answer(&self, question: &str, answer: &str) -> Result<()> {
        pause(self.submit_delay).await;
        info!(question, answer, "Added answer");
        Ok(())
    }
}

/// Sleeps for `delay`; zero delays return without touching the timer.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_history() {
        let now = Timestamp::from_millis(ONE_DAY_MS * 10);
        let records = seed_history(now);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "Alice");
        assert_eq!(records[0].like_count, 5);
        assert_eq!(records[0].rating, 4);
        assert_eq!(records[1].author, "Bob");
        assert_eq!(records[1].created_at, Timestamp::from_millis(ONE_DAY_MS * 9));
    }

    #[tokio::test]
    async fn test_simulated_fetch() {
        let service = SimulatedAnswerService::instant();
        let records = service.fetch_answer_history().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "Will it rain today?");
    }

    #[tokio::test]
    async fn test_simulated_submit_always_succeeds() {
        let service = SimulatedAnswerService::instant();
        assert!(service.submit_answer("q", "Yes").await.is_ok());
    }
}
