//! Player profile and XP/level progression.
//!
//! # Rules
//!
//! | Event | Effect |
//! |-------|--------|
//! | completed ask | `xp += 10`, `level = floor(xp / 100) + 1` |
//! | ask reaches a new level | badge `"Level N Seeker"`, major celebration |
//! | ask with `xp >= 100` | badge `"Dedicated Seeker"` (once) |
//! | manual level-up (`xp >= level * 100`) | `xp -= level * 100`, `level += 1`, badge, major celebration |
//!
//! Manual level-up does not go through the derived formula, so the two can
//! disagree and xp can go negative. Level badges are not de-duplicated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

/// XP earned per completed ask.
pub const XP_PER_ASK: i64 = 10;

/// XP span of one level.
pub const XP_PER_LEVEL: i64 = 100;

/// Badge awarded once xp reaches [`XP_PER_LEVEL`].
pub const DEDICATED_SEEKER: &str = "Dedicated Seeker";

/// Badges every new profile starts with.
pub const STARTER_BADGES: [&str; 2] = ["Novice Seeker", "First Question"];

/// Name of a fresh profile.
pub const DEFAULT_NAME: &str = "Curious User";

/// Badge label for reaching a level.
pub fn level_badge(level: u32) -> String {
    format!("Level {} Seeker", level)
}

/// Level implied by an XP total, never below 1.
pub fn derived_level(xp: i64) -> u32 {
    let level = xp.div_euclid(XP_PER_LEVEL) + 1;
    level.clamp(1, i64::from(u32::MAX)) as u32
}

/// A player's progression state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,

    /// Current level, starting at 1.
    pub level: u32,

    /// Experience points. Signed: manual level-ups can overdraw it.
    pub xp: i64,

    /// Badges in the order earned.
    pub badges: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            level: 1,
            xp: 0,
            badges: STARTER_BADGES.iter().map(|b| (*b).to_string()).collect(),
        }
    }
}

/// Outcome of crediting a completed ask.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Set when the derived level went up.
    pub new_level: Option<u32>,

    /// Badges appended, in order.
    pub badges_awarded: Vec<String>,
}

impl ProfileUpdate {
    /// Returns true if the ask produced a level-up.
    pub fn leveled_up(&self) -> bool {
        self.new_level.is_some()
    }
}

impl Profile {
    /// Creates a fresh profile with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// XP needed before a manual level-up unlocks (`level * 100`).
    pub fn xp_to_next_level(&self) -> i64 {
        i64::from(self.level) * XP_PER_LEVEL
    }

    /// Returns true if the manual level-up is available.
    pub fn can_level_up(&self) -> bool {
        self.xp >= self.xp_to_next_level()
    }

    /// Fill of the progress bar, `xp / (level * 100)` clamped to 0..=1.
    pub fn progress(&self) -> f64 {
        (self.xp as f64 / self.xp_to_next_level() as f64).clamp(0.0, 1.0)
    }

    /// Returns true if the profile holds the badge.
    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }

    /// Credits one completed ask.
    pub fn apply_ask(&mut self) -> ProfileUpdate {
        let old_level = self.level;
        self.xp = self.xp.saturating_add(XP_PER_ASK);
        let new_level = derived_level(self.xp);
        self.level = new_level;

        let mut update = ProfileUpdate::default();

        if new_level > old_level {
            let badge = level_badge(new_level);
            self.badges.push(badge.clone());
            update.badges_awarded.push(badge);
            update.new_level = Some(new_level);
        }

        if self.xp >= XP_PER_LEVEL && !self.has_badge(DEDICATED_SEEKER) {
            self.badges.push(DEDICATED_SEEKER.to_string());
            update.badges_awarded.push(DEDICATED_SEEKER.to_string());
        }

        debug!(
            xp = self.xp,
            level = self.level,
            awarded = update.badges_awarded.len(),
            "Profile credited"
        );
        update
    }

    /// Checks the invariants a loaded profile must hold.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if `level` is 0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.level == 0 {
            return Err(ValidationError::invalid_field("level", "must be at least 1"));
        }
        Ok(())
    }

    /// Spends `level * 100` XP to go up one level.
    ///
    /// Returns the new level.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::LevelUpLocked` if `xp < level * 100`.
    pub fn level_up(&mut self) -> Result<u32, ValidationError> {
        let required = self.xp_to_next_level();
        if self.xp < required {
            return Err(ValidationError::level_up_locked(self.xp, required));
        }

        self.xp -= required;
        self.level = self.level.saturating_add(1);
        self.badges.push(level_badge(self.level));

        debug!(xp = self.xp, level = self.level, "Manual level up");
        Ok(self.level)
    }
}
