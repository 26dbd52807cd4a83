//! Magic8Ball main struct and lifecycle operations.
//!
//! The [`Magic8Ball`] struct is the primary interface to the game. It owns
//! the [`AppState`] and applies each update's side effects:
//!
//! - Persisting settings and profile through a [`StateStore`]
//! - Rendering haptics, audio and particles through a [`Platform`]
//! - Fetching and submitting answers through an [`AnswerService`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use magic8::{Magic8Ball, Config};
//!
//! let ball = Magic8Ball::open("./magic8.db", Config::default())?;
//!
//! let outcome = ball.ask("Will it rain today?").await?;
//! if let Some(report) = outcome.report() {
//!     println!("{}", magic8::answer::plain_text(&report.answer));
//! }
//!
//! ball.close()?;
//! ```
//!
//! # Thread Safety
//!
//! `Magic8Ball` is `Send + Sync` and can be shared across tasks using `Arc`.
//! State sits behind a mutex that is only held between suspension points,
//! so a second `ask` issued while one is shaking sees the `Busy` state and
//! is rejected.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use crate::answer::AnswerSelector;
use crate::config::Config;
use crate::effects::{dispatch, share_or_copy, Effect, NullPlatform, Platform, ShareOutcome};
use crate::error::{Magic8Error, NotFoundError, Result};
use crate::history::HistoryRecord;
use crate::popularity::{PopularQuestion, PopularityTracker};
use crate::profile::Profile;
use crate::remote::{pause, AnswerService, SimulatedAnswerService};
use crate::session::{AskState, Session};
use crate::settings::{Settings, Theme};
use crate::state::{AppState, AskOutcome};
use crate::storage::{
    load_profile, load_settings, open_storage, save_profile, save_settings, MemoryStore,
    StateStore, StoreMetadata,
};
use crate::types::{RecordId, Timestamp};

struct Inner {
    state: AppState,
    selector: AnswerSelector,
}

/// The Magic 8 Ball handle.
///
/// Create an instance with [`Magic8Ball::open()`] (on-disk store),
/// [`Magic8Ball::in_memory()`], or [`Magic8Ball::with_parts()`] to inject
/// every collaborator. Close it with [`Magic8Ball::close()`].
pub struct Magic8Ball {
    inner: Mutex<Inner>,

    /// Settings and profile persistence.
    store: Box<dyn StateStore>,

    /// History source and answer sink.
    answers: Box<dyn AnswerService>,

    /// Haptics, audio, particles, sharing.
    platform: Arc<dyn Platform>,

    /// Configuration used to open this ball.
    config: Config,
}

impl std::fmt::Debug for Magic8Ball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Magic8Ball")
            .field("config", &self.config)
            .field("ask_state", &self.ask_state())
            .field("path", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl Magic8Ball {
    /// Opens the ball with an on-disk store at `path`.
    ///
    /// Uses the simulated answer service and a platform with no
    /// capabilities; swap them with [`with_platform`](Self::with_platform)
    /// and [`with_answer_service`](Self::with_answer_service).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - The store file is corrupted or locked by another process
    /// - The store format version doesn't match
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;

        info!("Opening Magic8Ball");
        let store = open_storage(&path, &config)?;

        Self::with_parts(
            store,
            Box::new(SimulatedAnswerService::new()),
            Arc::new(NullPlatform),
            config,
        )
    }

    /// Opens the ball with a store that lives only as long as the process.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_parts(
            Box::new(MemoryStore::new()),
            Box::new(SimulatedAnswerService::new()),
            Arc::new(NullPlatform),
            config,
        )
    }

    /// Builds the ball from explicit collaborators.
    ///
    /// Loads settings and profile from `store`; history starts empty until
    /// [`refresh_history`](Self::refresh_history) is awaited.
    pub fn with_parts(
        store: Box<dyn StateStore>,
        answers: Box<dyn AnswerService>,
        platform: Arc<dyn Platform>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;

        let settings = load_settings(store.as_ref())?;
        let profile = load_profile(store.as_ref())?;
        let popular = if config.seed_popular {
            PopularityTracker::seeded()
        } else {
            PopularityTracker::new()
        };

        info!(
            level = profile.level,
            xp = profile.xp,
            theme = %settings.theme,
            sync_mode = ?config.sync_mode,
            "Magic8Ball ready"
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                state: AppState::new(profile, settings, popular),
                selector: AnswerSelector::new(),
            }),
            store,
            answers,
            platform,
            config,
        })
    }

    /// Replaces the platform.
    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = platform;
        self
    }

    /// Replaces the answer service.
    pub fn with_answer_service(mut self, answers: Box<dyn AnswerService>) -> Self {
        self.answers = answers;
        self
    }

    /// Replaces the answer selector, e.g. with a seeded one.
    pub fn with_selector(self, selector: AnswerSelector) -> Self {
        self.lock().selector = selector;
        self
    }

    /// Closes the ball, flushing the store.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing Magic8Ball");
        self.store.close()?;
        info!("Magic8Ball closed");
        Ok(())
    }

    /// Configuration used to open this ball.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store metadata.
    #[inline]
    pub fn metadata(&self) -> &StoreMetadata {
        self.store.metadata()
    }

    // =========================================================================
    // Asking
    // =========================================================================

    /// Asks `question`.
    ///
    /// Waits out the shake and the thinking delay, draws an answer, applies
    /// every ask-completion update, persists the profile and submits the
    /// answer. Returns [`AskOutcome::Rejected`] without changing anything if
    /// the question is blank or another ask is in progress.
    pub async fn ask(&self, question: &str) -> Result<AskOutcome> {
        self.run_ask(Some(question)).await
    }

    /// Asks the question currently typed into the question box.
    pub async fn ask_pending(&self) -> Result<AskOutcome> {
        self.run_ask(None).await
    }

    /// Re-asks the popular question at `rank` (0 = most asked).
    pub async fn ask_popular(&self, rank: usize) -> Result<AskOutcome> {
        let text = self
            .lock()
            .state
            .popular
            .get(rank)
            .map(|entry| entry.text.clone())
            .ok_or_else(|| NotFoundError::popular_question(rank))?;
        self.ask(&text).await
    }

    /// Sets the question box text.
    pub fn set_pending_question(&self, text: impl Into<String>) {
        self.lock().state.session.pending_question = text.into();
    }

    async fn run_ask(&self, question: Option<&str>) -> Result<AskOutcome> {
        let ticket = {
            let mut inner = self.lock();
            match inner.state.begin_ask(question) {
                Ok(ticket) => ticket,
                Err(reason) => return Ok(AskOutcome::Rejected(reason)),
            }
        };
        self.render(&ticket.effects);

        pause(self.config.shake_duration).await;
        pause(self.config.thinking_delay).await;

        let (report, profile) = {
            let mut inner = self.lock();
            let answer = inner.selector.draw();
            let report = inner
                .state
                .complete_ask(answer, &self.config.author, Timestamp::now())
                .ok_or_else(|| Magic8Error::invalid_state("no ask in progress at reveal"))?;
            (report, inner.state.profile.clone())
        };
        self.render(&report.effects);

        save_profile(self.store.as_ref(), &profile)?;
        self.answers
            .submit_answer(&report.question, &report.answer)
            .await?;

        Ok(AskOutcome::Answered(report))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Replaces the history with the answer service's records.
    ///
    /// Overwrites whatever is in memory when the fetch resolves, including
    /// records appended by asks that completed meanwhile.
    pub async fn refresh_history(&self) -> Result<usize> {
        let records = self.answers.fetch_answer_history().await?;
        let count = records.len();
        self.lock().state.history.replace(records);
        info!(count, "History loaded");
        Ok(count)
    }

    /// Likes a record and counts its question as popular.
    ///
    /// Returns false, changing nothing, if no record has this id.
    pub fn like(&self, id: RecordId) -> bool {
        self.lock().state.like(id)
    }

    /// Deletes a record. Returns false if no record has this id.
    pub fn delete(&self, id: RecordId) -> bool {
        self.lock().state.delete(id)
    }

    /// Rates a record. `stars` is stored as given.
    pub fn rate(&self, id: RecordId, stars: i32) -> bool {
        self.lock().state.rate(id, stars)
    }

    /// Returns the record with this id or a not-found error.
    pub fn require_record(&self, id: RecordId) -> Result<HistoryRecord> {
        self.lock()
            .state
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError::record(id).into())
    }

    /// History, newest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.lock().state.history.records().to_vec()
    }

    /// Popular questions, most asked first.
    pub fn popular(&self) -> Vec<PopularQuestion> {
        self.lock().state.popular.entries().to_vec()
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Current profile.
    pub fn profile(&self) -> Profile {
        self.lock().state.profile.clone()
    }

    /// Manual level-up. Returns the new level.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LevelUpLocked`](crate::ValidationError::LevelUpLocked)
    /// when `xp < level * 100`.
    pub fn level_up(&self) -> Result<u32> {
        let (level, effects, profile) = {
            let mut inner = self.lock();
            let (level, effects) = inner.state.level_up()?;
            (level, effects, inner.state.profile.clone())
        };
        self.render(&effects);
        save_profile(self.store.as_ref(), &profile)?;
        info!(level, "Leveled up");
        Ok(level)
    }

    /// Renames the player.
    pub fn set_profile_name(&self, name: impl Into<String>) -> Result<()> {
        let profile = {
            let mut inner = self.lock();
            inner.state.profile.name = name.into();
            inner.state.profile.clone()
        };
        save_profile(self.store.as_ref(), &profile)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.lock().state.settings
    }

    /// Validates and stores new settings.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.lock().state.settings = settings;
        save_settings(self.store.as_ref(), &settings)?;
        debug!(?settings, "Settings updated");
        Ok(())
    }

    /// Toggles dark mode.
    pub fn set_dark_mode(&self, on: bool) -> Result<()> {
        self.update_settings(Settings {
            dark_mode: on,
            ..self.settings()
        })
    }

    /// Sets the animation speed (0.5 to 2.0).
    pub fn set_animation_speed(&self, speed: f32) -> Result<()> {
        self.update_settings(Settings {
            animation_speed: speed,
            ..self.settings()
        })
    }

    /// Sets the theme.
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.update_settings(Settings {
            theme,
            ..self.settings()
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Turns sound effects on or off. Not persisted.
    pub fn set_sound(&self, on: bool) {
        self.lock().state.session.sound_on = on;
    }

    /// Current ask state.
    pub fn ask_state(&self) -> AskState {
        self.lock().state.ask_state()
    }

    /// Copy of the session: question box, shown answer, sound flag.
    pub fn session(&self) -> Session {
        self.lock().state.session.clone()
    }

    /// Shares the last answer, falling back to the clipboard.
    pub fn share(&self) -> ShareOutcome {
        let request = self.lock().state.share_request();
        let outcome = share_or_copy(self.platform.as_ref(), &request);
        debug!(?outcome, "Share requested");
        outcome
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn render(&self, effects: &[Effect]) {
        for effect in effects {
            dispatch(self.platform.as_ref(), effect);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// Magic8Ball is auto Send + Sync: every collaborator trait requires it.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Celebration, RecordingPlatform};
    use crate::session::RejectReason;
    use tempfile::tempdir;

    fn instant_ball() -> Magic8Ball {
        Magic8Ball::in_memory(Config::instant())
            .unwrap()
            .with_answer_service(Box::new(SimulatedAnswerService::instant()))
            .with_selector(AnswerSelector::seeded(7))
    }

    #[test]
    fn test_open_creates_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let ball = Magic8Ball::open(&path, Config::default()).unwrap();
        assert!(path.exists());
        assert_eq!(ball.profile(), Profile::default());
        assert_eq!(ball.popular().len(), 10);
        ball.close().unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            author: String::new(),
            ..Config::instant()
        };
        assert!(Magic8Ball::in_memory(config).unwrap_err().is_validation());
    }

    #[test]
    fn test_unseeded_popularity() {
        let config = Config {
            seed_popular: false,
            ..Config::instant()
        };
        let ball = Magic8Ball::in_memory(config).unwrap();
        assert!(ball.popular().is_empty());
    }

    #[tokio::test]
    async fn test_ask_appends_and_persists() {
        let ball = instant_ball();
        let outcome = ball.ask("Will it rain?").await.unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(ball.ask_state(), AskState::Idle);
        assert_eq!(ball.history()[0].id, report.record_id);
        assert_eq!(ball.history()[0].author, "You");
        assert_eq!(ball.profile().xp, 10);
        assert_eq!(
            load_profile(ball.store.as_ref()).unwrap(),
            ball.profile()
        );
    }

    #[tokio::test]
    async fn test_blank_ask_rejected() {
        let ball = instant_ball();
        let outcome = ball.ask("   ").await.unwrap();
        assert_eq!(outcome, AskOutcome::Rejected(RejectReason::EmptyQuestion));
        assert!(ball.history().is_empty());
        assert_eq!(ball.profile().xp, 0);
    }

    #[tokio::test]
    async fn test_ask_pending_uses_question_box() {
        let ball = instant_ball();
        ball.set_pending_question("Should I go?");
        let outcome = ball.ask_pending().await.unwrap();
        assert_eq!(outcome.report().unwrap().question, "Should I go?");
        assert!(ball.session().pending_question.is_empty());
    }

    #[tokio::test]
    async fn test_ask_popular_out_of_range() {
        let ball = instant_ball();
        let err = ball.ask_popular(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_effects_reach_platform() {
        let platform = Arc::new(RecordingPlatform::new());
        let ball = instant_ball().with_platform(platform.clone());
        ball.ask("q").await.unwrap();

        let log = platform.snapshot();
        assert!(log.effects.len() >= 3);
        assert!(matches!(log.effects[1], Effect::Vibrate(_)));
        assert_eq!(platform.bursts(Celebration::Major), 0);
    }

    #[test]
    fn test_settings_validated_before_save() {
        let ball = instant_ball();
        assert!(ball.set_animation_speed(5.0).unwrap_err().is_validation());
        assert_eq!(ball.settings(), Settings::default());

        ball.set_theme(Theme::Sunset).unwrap();
        assert_eq!(
            load_settings(ball.store.as_ref()).unwrap().theme,
            Theme::Sunset
        );
    }

    #[test]
    fn test_require_record_missing() {
        let ball = instant_ball();
        assert!(ball.require_record(RecordId::new(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_magic8ball_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Magic8Ball>();
    }
}
