//! User preferences persisted under the `settings` key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Slowest allowed animation speed multiplier.
pub const MIN_ANIMATION_SPEED: f32 = 0.5;

/// Fastest allowed animation speed multiplier.
pub const MAX_ANIMATION_SPEED: f32 = 2.0;

/// Ball color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Deep blue ball.
    #[default]
    Classic,
    /// Green ball.
    Neon,
    /// Orange ball.
    Sunset,
    /// Purple ball.
    Galaxy,
}

impl Theme {
    /// All themes in menu order.
    pub const ALL: [Theme; 4] = [Theme::Classic, Theme::Neon, Theme::Sunset, Theme::Galaxy];

    /// Lowercase name used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Neon => "neon",
            Self::Sunset => "sunset",
            Self::Galaxy => "galaxy",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_field(
                    "theme",
                    format!("unknown theme '{}', expected classic, neon, sunset or galaxy", s),
                )
            })
    }
}

/// Display preferences.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Dark background.
    pub dark_mode: bool,

    /// Animation speed multiplier, 0.5 to 2.0.
    pub animation_speed: f32,

    /// Ball color scheme.
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            animation_speed: 1.0,
            theme: Theme::Classic,
        }
    }
}

impl Settings {
    /// Checks that `animation_speed` is finite and within range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let speed = self.animation_speed;
        if !speed.is_finite() || !(MIN_ANIMATION_SPEED..=MAX_ANIMATION_SPEED).contains(&speed) {
            return Err(ValidationError::out_of_range(
                "animation_speed",
                f64::from(speed),
                f64::from(MIN_ANIMATION_SPEED),
                f64::from(MAX_ANIMATION_SPEED),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.dark_mode);
        assert_eq!(settings.animation_speed, 1.0);
        assert_eq!(settings.theme, Theme::Classic);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_speed_bounds() {
        let mut settings = Settings::default();
        settings.animation_speed = 0.5;
        assert!(settings.validate().is_ok());
        settings.animation_speed = 2.0;
        assert!(settings.validate().is_ok());
        settings.animation_speed = 2.1;
        assert!(settings.validate().is_err());
        settings.animation_speed = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("neon".parse::<Theme>().unwrap(), Theme::Neon);
        assert_eq!(" Galaxy ".parse::<Theme>().unwrap(), Theme::Galaxy);
        assert!("plaid".parse::<Theme>().is_err());
    }

    #[test]
    fn test_settings_json_keys() {
        let settings = Settings {
            dark_mode: true,
            animation_speed: 1.5,
            theme: Theme::Sunset,
        };
        let value = serde_json::to_value(settings).unwrap();
        assert_eq!(value["darkMode"], true);
        assert_eq!(value["animationSpeed"], 1.5);
        assert_eq!(value["theme"], "sunset");
    }
}
