//! Platform effects and the hooks that render them.
//!
//! State updates never touch the platform directly. They return a list of
//! [`Effect`]s which the [`Magic8Ball`](crate::Magic8Ball) facade hands to
//! the injected [`Platform`] after the update is applied.
//!
//! Every hook has a no-op default. Unsupported capabilities report `false`
//! and the caller degrades (no vibration, clipboard instead of share).

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Haptic pattern played when the ball starts shaking (on/off milliseconds).
pub const SHAKE_VIBRATION: [u64; 5] = [100, 30, 100, 30, 100];

/// Title of the share sheet.
pub const SHARE_TITLE: &str = "My Magic 8 Ball Result";

/// Acknowledgment shown after the clipboard fallback.
pub const CLIPBOARD_ACK: &str = "Result copied to clipboard! Share it with your friends!";

/// Named audio clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundClip {
    /// Played when the ball starts shaking.
    Shake,
    /// Played when the answer appears.
    Reveal,
}

impl SoundClip {
    /// Clip name as used for asset lookup.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shake => "shake",
            Self::Reveal => "reveal",
        }
    }
}

/// Particle-burst sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Celebration {
    /// Affirmative answer.
    Minor,
    /// Level reached.
    Major,
}

impl Celebration {
    /// Number of particles in the burst.
    pub fn particle_count(&self) -> u32 {
        match self {
            Self::Minor => 100,
            Self::Major => 200,
        }
    }

    /// Spread angle of the burst, in degrees.
    pub fn spread(&self) -> u32 {
        70
    }
}

/// A side effect requested by a state update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Haptic pulse pattern.
    Vibrate(Vec<u64>),
    /// Play a named clip. Only emitted while sound is on.
    PlayClip(SoundClip),
    /// Particle burst.
    Burst(Celebration),
}

/// Content handed to the native share sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    /// Sheet title.
    pub title: String,
    /// Shared text.
    pub text: String,
}

/// How a share request was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Native share sheet accepted it.
    Shared,
    /// Copied to the clipboard instead.
    Copied,
    /// Neither share nor clipboard was available.
    Unavailable,
}

/// Host capabilities: haptics, audio, particles, sharing.
pub trait Platform: Send + Sync {
    /// Plays a vibration pattern. Returns false if unsupported.
    fn vibrate(&self, _pattern: &[u64]) -> bool {
        false
    }

    /// Plays an audio clip.
    fn play_clip(&self, _clip: SoundClip) {}

    /// Fires a particle burst.
    fn burst(&self, _celebration: Celebration) {}

    /// Opens the native share sheet. Returns false if unsupported.
    fn share(&self, _request: &ShareRequest) -> bool {
        false
    }

    /// Copies text to the clipboard. Returns false if unsupported.
    fn copy_to_clipboard(&self, _text: &str) -> bool {
        false
    }

    /// Shows a short user-visible message.
    fn notify(&self, _message: &str) {}
}

/// Routes an effect to the matching platform hook.
pub fn dispatch(platform: &dyn Platform, effect: &Effect) {
    match effect {
        Effect::Vibrate(pattern) => {
            if !platform.vibrate(pattern) {
                tracing::trace!("Vibration unsupported, skipped");
            }
        }
        Effect::PlayClip(clip) => platform.play_clip(*clip),
        Effect::Burst(celebration) => platform.burst(*celebration),
    }
}

/// Shares through the native sheet, falling back to the clipboard.
pub fn share_or_copy(platform: &dyn Platform, request: &ShareRequest) -> ShareOutcome {
    if platform.share(request) {
        ShareOutcome::Shared
    } else if platform.copy_to_clipboard(&request.text) {
        platform.notify(CLIPBOARD_ACK);
        ShareOutcome::Copied
    } else {
        ShareOutcome::Unavailable
    }
}

/// Platform with no capabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {}

/// Platform that records every hook call.
///
/// Supports vibration and the clipboard; native share is off unless
/// enabled with [`RecordingPlatform::with_native_share`].
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    native_share: bool,
    log: Mutex<PlatformLog>,
}

/// Calls captured by a [`RecordingPlatform`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformLog {
    /// Effects in the order they were rendered.
    pub effects: Vec<Effect>,
    /// Requests accepted by the native share sheet.
    pub shared: Vec<ShareRequest>,
    /// Texts copied to the clipboard.
    pub clipboard: Vec<String>,
    /// Notifications shown.
    pub notifications: Vec<String>,
}

impl RecordingPlatform {
    /// Creates a recorder without native share.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose native share succeeds.
    pub fn with_native_share() -> Self {
        Self {
            native_share: true,
            ..Default::default()
        }
    }

    /// Returns a copy of everything recorded so far.
    pub fn snapshot(&self) -> PlatformLog {
        self.with_log(|log| log.clone())
    }

    /// Number of bursts of the given size recorded.
    pub fn bursts(&self, celebration: Celebration) -> usize {
        self.with_log(|log| {
            log.effects
                .iter()
                .filter(|e| **e == Effect::Burst(celebration))
                .count()
        })
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut PlatformLog) -> T) -> T {
        let mut guard = self.log.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl Platform for RecordingPlatform {
    fn vibrate(&self, pattern: &[u64]) -> bool {
        self.with_log(|log| log.effects.push(Effect::Vibrate(pattern.to_vec())));
        true
    }

    fn play_clip(&self, clip: SoundClip) {
        self.with_log(|log| log.effects.push(Effect::PlayClip(clip)));
    }

    fn burst(&self, celebration: Celebration) {
        self.with_log(|log| log.effects.push(Effect::Burst(celebration)));
    }

    fn share(&self, request: &ShareRequest) -> bool {
        if self.native_share {
            self.with_log(|log| log.shared.push(request.clone()));
        }
        self.native_share
    }

    fn copy_to_clipboard(&self, text: &str) -> bool {
        self.with_log(|log| log.clipboard.push(text.to_string()));
        true
    }

    fn notify(&self, message: &str) {
        self.with_log(|log| log.notifications.push(message.to_string()));
    }
}
