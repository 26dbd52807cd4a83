//! Application state and its update functions.
//!
//! [`AppState`] is plain data. Its methods apply one user action and return
//! what happened, including the [`Effect`]s the platform should render. They
//! never persist anything or touch the platform; the
//! [`Magic8Ball`](crate::Magic8Ball) facade does that after each update.

use tracing::debug;

use crate::answer::is_affirmative;
use crate::effects::{Celebration, Effect, ShareRequest, SHARE_TITLE};
use crate::error::ValidationError;
use crate::history::{HistoryLog, HistoryRecord};
use crate::popularity::{PopularityChange, PopularityTracker};
use crate::profile::{Profile, ProfileUpdate};
use crate::session::{AskState, RejectReason, Session};
use crate::settings::Settings;
use crate::types::{RecordId, Timestamp};

/// Everything the ball knows.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Question box, shown answer, ask state machine.
    pub session: Session,
    /// Answer history, newest first.
    pub history: HistoryLog,
    /// Ranked questions.
    pub popular: PopularityTracker,
    /// Player progression.
    pub profile: Profile,
    /// Display preferences.
    pub settings: Settings,
}

/// A started ask, waiting for its shake to finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AskTicket {
    /// Question being asked.
    pub question: String,
    /// Effects for the start of the shake.
    pub effects: Vec<Effect>,
}

/// Result of a completed ask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AskReport {
    /// Id of the new history record.
    pub record_id: RecordId,
    /// Question asked.
    pub question: String,
    /// Answer drawn, with layout line breaks.
    pub answer: String,
    /// XP/level/badge changes.
    pub profile: ProfileUpdate,
    /// What the popularity tracker did with the question.
    pub popularity: PopularityChange,
    /// Effects fired at reveal, in order.
    pub effects: Vec<Effect>,
}

impl AskReport {
    /// Returns true if the answer earned the affirmative burst.
    pub fn is_affirmative(&self) -> bool {
        self.effects.contains(&Effect::Burst(Celebration::Minor))
    }
}

/// Outcome of an ask request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AskOutcome {
    /// The ball answered.
    Answered(AskReport),
    /// The ask was a no-op.
    Rejected(RejectReason),
}

impl AskOutcome {
    /// Returns the report if the ball answered.
    pub fn report(&self) -> Option<&AskReport> {
        match self {
            Self::Answered(report) => Some(report),
            Self::Rejected(_) => None,
        }
    }

    /// Returns true if the ask was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl AppState {
    /// Creates state from loaded preferences, with an empty history.
    pub fn new(profile: Profile, settings: Settings, popular: PopularityTracker) -> Self {
        Self {
            session: Session::new(),
            history: HistoryLog::new(),
            popular,
            profile,
            settings,
        }
    }

    /// Current ask state.
    pub fn ask_state(&self) -> AskState {
        self.session.state()
    }

    /// Starts an ask (`Idle -> Busy`).
    pub fn begin_ask(&mut self, question: Option<&str>) -> Result<AskTicket, RejectReason> {
        let (question, effects) = self.session.begin(question)?;
        Ok(AskTicket { question, effects })
    }

    /// Completes the ask in progress with the drawn answer.
    ///
    /// Runs `Busy -> Revealing -> Idle` and, in order: appends the history
    /// record, fires the affirmative burst, credits the profile, counts the
    /// question in the popularity tracker, clears the question box.
    ///
    /// Returns `None` if no ask is in progress.
    pub fn complete_ask(&mut self, answer: &str, author: &str, now: Timestamp) -> Option<AskReport> {
        let question = self.session.in_flight()?.to_string();
        let mut effects = self.session.reveal(answer).ok()?;

        let record_id = self.history.next_id(now);
        self.history.append(HistoryRecord::new(
            record_id, author, &question, answer, now,
        ));

        if is_affirmative(answer) {
            effects.push(Effect::Burst(Celebration::Minor));
        }

        let profile = self.profile.apply_ask();
        if profile.leveled_up() {
            effects.push(Effect::Burst(Celebration::Major));
        }

        let popularity = self.popular.record(&question);

        self.session.finish().ok()?;

        debug!(%record_id, xp = self.profile.xp, "Ask completed");
        Some(AskReport {
            record_id,
            question,
            answer: answer.to_string(),
            profile,
            popularity,
            effects,
        })
    }

    /// Likes a history record and counts its question as popular.
    ///
    /// Returns false, changing nothing, if the id is absent.
    pub fn like(&mut self, id: RecordId) -> bool {
        match self.history.like(id) {
            Some(question) => {
                self.popular.record(&question);
                true
            }
            None => false,
        }
    }

    /// Deletes a history record. Returns false if absent.
    pub fn delete(&mut self, id: RecordId) -> bool {
        self.history.delete(id)
    }

    /// Rates a history record. Returns false if absent.
    pub fn rate(&mut self, id: RecordId, stars: i32) -> bool {
        self.history.rate(id, stars)
    }

    /// Manual level-up. Returns the new level and its celebration.
    pub fn level_up(&mut self) -> Result<(u32, Vec<Effect>), ValidationError> {
        let level = self.profile.level_up()?;
        Ok((level, vec![Effect::Burst(Celebration::Major)]))
    }

    /// Share sheet content for the last answer.
    pub fn share_request(&self) -> ShareRequest {
        let question = self.session.last_question.as_deref().unwrap_or_default();
        ShareRequest {
            title: SHARE_TITLE.to_string(),
            text: format!(
                "I just asked the Magic 8 Ball: \"{}\"\nThe answer was: \"{}\"\nI'm a Level {} Seeker! Can you beat my level?\nTry it yourself!",
                question, self.session.current_answer, self.profile.level
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> AppState {
        AppState::new(
            Profile::default(),
            Settings::default(),
            PopularityTracker::new(),
        )
    }

    fn ask(state: &mut AppState, question: &str, answer: &str, now: i64) -> AskReport {
        state.begin_ask(Some(question)).unwrap();
        state
            .complete_ask(answer, "You", Timestamp::from_millis(now))
            .unwrap()
    }

    #[test]
    fn test_complete_ask_updates_everything() {
        let mut state = fresh();
        state.session.pending_question = "Will it rain?".to_string();
        state.begin_ask(None).unwrap();
        assert_eq!(state.ask_state(), AskState::Busy);

        let report = state
            .complete_ask("Yes", "You", Timestamp::from_millis(1000))
            .unwrap();

        assert_eq!(state.ask_state(), AskState::Idle);
        assert_eq!(report.record_id, RecordId::new(1000));
        assert_eq!(state.history.len(), 1);
        let record = state.history.latest().unwrap();
        assert_eq!(record.question, "Will it rain?");
        assert_eq!(record.author, "You");
        assert_eq!((record.like_count, record.rating), (0, 0));
        assert_eq!(state.profile.xp, 10);
        assert_eq!(state.popular.count_of("Will it rain?"), Some(1));
        assert!(state.session.pending_question.is_empty());
        assert_eq!(state.session.current_answer, "Yes");
        assert!(state.session.revealed);
        assert!(!report.is_affirmative());
    }

    #[test]
    fn test_complete_without_begin_is_none() {
        let mut state = fresh();
        assert!(state
            .complete_ask("Yes", "You", Timestamp::from_millis(1))
            .is_none());
        assert!(state.history.is_empty());
        assert_eq!(state.profile.xp, 0);
    }

    #[test]
    fn test_affirmative_answer_bursts() {
        let mut state = fresh();
        let report = ask(&mut state, "q", "Yes\n definitely", 1);
        assert!(report.is_affirmative());
        assert_eq!(
            report.effects,
            vec![
                Effect::PlayClip(crate::effects::SoundClip::Reveal),
                Effect::Burst(Celebration::Minor)
            ]
        );
    }

    #[test]
    fn test_level_up_burst_on_tenth_ask() {
        let mut state = fresh();
        for i in 0..9 {
            ask(&mut state, "q", "Yes", i);
        }
        let report = ask(&mut state, "q", "Yes", 100);
        assert_eq!(report.profile.new_level, Some(2));
        assert!(report.effects.contains(&Effect::Burst(Celebration::Major)));
    }

    #[test]
    fn test_like_counts_popularity() {
        let mut state = fresh();
        let report = ask(&mut state, "Will it rain?", "Yes", 5);
        assert!(state.like(report.record_id));
        assert_eq!(state.popular.count_of("Will it rain?"), Some(2));
        assert_eq!(state.history.latest().unwrap().like_count, 1);
    }

    #[test]
    fn test_like_missing_changes_nothing() {
        let mut state = fresh();
        ask(&mut state, "q", "Yes", 5);
        let popular_before = state.popular.clone();
        assert!(!state.like(RecordId::new(12345)));
        assert_eq!(state.popular, popular_before);
        assert_eq!(state.history.latest().unwrap().like_count, 0);
    }

    #[test]
    fn test_manual_level_up() {
        let mut state = fresh();
        assert!(state.level_up().is_err());
        state.profile.xp = 100;
        let (level, effects) = state.level_up().unwrap();
        assert_eq!(level, 2);
        assert_eq!(effects, vec![Effect::Burst(Celebration::Major)]);
    }

    #[test]
    fn test_share_text() {
        let mut state = fresh();
        ask(&mut state, "Will it rain?", "Yes", 5);
        let request = state.share_request();
        assert_eq!(request.title, "My Magic 8 Ball Result");
        assert_eq!(
            request.text,
            "I just asked the Magic 8 Ball: \"Will it rain?\"\nThe answer was: \"Yes\"\nI'm a Level 1 Seeker! Can you beat my level?\nTry it yourself!"
        );
    }
}
