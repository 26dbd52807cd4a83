//! Ask session state and the shake/reveal state machine.
//!
//! ```text
//!          ask(q)               shake + thinking          draw answer
//!   Idle ─────────▶ Busy ───────────────────────▶ Revealing ─────────▶ Idle
//!    ▲   (rejected if q is blank                       │  history, profile,
//!    │    or not Idle)                                 │  popularity updated
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! Only `Idle` accepts a new ask. There is no cancel path: once `Busy`, the
//! ask runs to completion.

use std::fmt;

use tracing::debug;

use crate::answer::IDLE_FACE;
use crate::effects::{Effect, SoundClip, SHAKE_VIBRATION};

/// Where the ask state machine is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AskState {
    /// Accepting asks.
    #[default]
    Idle,
    /// Shaking and thinking; asks are rejected.
    Busy,
    /// Answer drawn, side effects being applied.
    Revealing,
}

impl AskState {
    /// Returns true if a new ask would be accepted.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for AskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Revealing => "revealing",
        };
        f.write_str(name)
    }
}

/// Why an ask was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Question was empty or whitespace only.
    EmptyQuestion,
    /// Another ask is still in progress.
    Busy,
}

/// State of an ask after a transition that the current state does not allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTransition {
    /// State the machine was in.
    pub from: AskState,
    /// State that was requested.
    pub to: AskState,
}

/// What a player sees and has typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Text in the question box.
    pub pending_question: String,

    /// Answer (or idle face) shown in the ball.
    pub current_answer: String,

    /// Most recently answered question.
    pub last_question: Option<String>,

    /// Whether the answer triangle is showing.
    pub revealed: bool,

    /// Whether clips are played.
    pub sound_on: bool,

    state: AskState,
    in_flight: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pending_question: String::new(),
            current_answer: IDLE_FACE.to_string(),
            last_question: None,
            revealed: false,
            sound_on: true,
            state: AskState::Idle,
            in_flight: None,
        }
    }
}

impl Session {
    /// Creates an idle session showing the idle face.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current machine state.
    pub fn state(&self) -> AskState {
        self.state
    }

    /// Question of the ask in progress, if any.
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// `Idle -> Busy`.
    ///
    /// Uses `question` if given, otherwise the pending question. Returns the
    /// question being asked and the effects for the start of the shake.
    pub fn begin(&mut self, question: Option<&str>) -> Result<(String, Vec<Effect>), RejectReason> {
        let question = question.unwrap_or(&self.pending_question).to_string();
        if question.trim().is_empty() {
            debug!("Ask rejected: empty question");
            return Err(RejectReason::EmptyQuestion);
        }
        if !self.state.is_idle() {
            debug!(state = %self.state, "Ask rejected: ball busy");
            return Err(RejectReason::Busy);
        }

        self.state = AskState::Busy;
        self.revealed = false;
        self.in_flight = Some(question.clone());

        let mut effects = Vec::with_capacity(2);
        if self.sound_on {
            effects.push(Effect::PlayClip(SoundClip::Shake));
        }
        effects.push(Effect::Vibrate(SHAKE_VIBRATION.to_vec()));

        debug!(question = %question, "Ball shaking");
        Ok((question, effects))
    }

    /// `Busy -> Revealing`: shows the drawn answer.
    pub fn reveal(&mut self, answer: &str) -> Result<Vec<Effect>, InvalidTransition> {
        if self.state != AskState::Busy {
            return Err(InvalidTransition {
                from: self.state,
                to: AskState::Revealing,
            });
        }

        self.state = AskState::Revealing;
        self.current_answer = answer.to_string();
        self.revealed = true;

        let mut effects = Vec::with_capacity(1);
        if self.sound_on {
            effects.push(Effect::PlayClip(SoundClip::Reveal));
        }
        Ok(effects)
    }

    /// `Revealing -> Idle`: clears the question box.
    ///
    /// Returns the question that was answered.
    pub fn finish(&mut self) -> Result<String, InvalidTransition> {
        if self.state != AskState::Revealing {
            return Err(InvalidTransition {
                from: self.state,
                to: AskState::Idle,
            });
        }

        let question = self.in_flight.take().unwrap_or_default();
        self.pending_question.clear();
        self.last_question = Some(question.clone());
        self.state = AskState::Idle;
        Ok(question)
    }
}
