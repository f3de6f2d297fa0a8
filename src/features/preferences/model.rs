//! The preferences record and its defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StudyError;

/// Sites offered by "add defaults" and used on reset.
pub const DEFAULT_WEBSITES: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "youtube.com",
    "instagram.com",
    "reddit.com",
    "tiktok.com",
    "netflix.com",
    "twitch.tv",
];

/// Techniques offered by "add defaults" and used on reset.
pub const DEFAULT_TECHNIQUES: &[&str] = &[
    "Pomodoro Technique",
    "Time blocking",
    "Active recall",
    "Spaced repetition",
    "Feynman technique",
    "Mind mapping",
];

pub const DEFAULT_STUDY_TIMES: &[&str] = &["09:00", "14:00", "19:00"];

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap_or_else(|e| panic!("Invalid time regex: {e}"))
});

/// User study preferences as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub default_study_duration: u32,
    pub default_break_duration: u32,
    pub preferred_study_times: Vec<String>,
    pub distracting_websites: Vec<String>,
    pub focus_techniques: Vec<String>,
    pub notifications_enabled: bool,
    pub auto_block_websites: bool,
}

impl Default for Preferences {
    /// The base that loaded preferences are merged into. Lists start empty.
    fn default() -> Self {
        Self {
            default_study_duration: 25,
            default_break_duration: 5,
            preferred_study_times: owned(DEFAULT_STUDY_TIMES),
            distracting_websites: Vec::new(),
            focus_techniques: Vec::new(),
            notifications_enabled: true,
            auto_block_websites: true,
        }
    }
}

impl Preferences {
    /// Defaults with the website and technique lists filled in.
    #[must_use]
    pub fn recommended() -> Self {
        Self {
            distracting_websites: owned(DEFAULT_WEBSITES),
            focus_techniques: owned(DEFAULT_TECHNIQUES),
            ..Self::default()
        }
    }

    /// Check values a patch could have set to something unusable.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Preferences`] for a zero duration or a study
    /// time that is not `HH:MM`.
    pub fn validate(&self) -> Result<(), StudyError> {
        if self.default_study_duration == 0 {
            return Err(StudyError::Preferences(
                "default_study_duration must be greater than zero".to_string(),
            ));
        }
        if self.default_break_duration == 0 {
            return Err(StudyError::Preferences(
                "default_break_duration must be greater than zero".to_string(),
            ));
        }
        if let Some(bad) = self
            .preferred_study_times
            .iter()
            .find(|t| !is_valid_time(t))
        {
            return Err(StudyError::Preferences(format!(
                "\"{bad}\" is not a valid study time (expected HH:MM)"
            )));
        }
        Ok(())
    }
}

/// Whether `value` is a 24-hour `HH:MM` time.
#[must_use]
pub fn is_valid_time(value: &str) -> bool {
    TIME_PATTERN.is_match(value)
}

pub(crate) fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.default_study_duration, 25);
        assert_eq!(prefs.default_break_duration, 5);
        assert_eq!(prefs.preferred_study_times, vec!["09:00", "14:00", "19:00"]);
        assert!(prefs.distracting_websites.is_empty());
        assert!(prefs.notifications_enabled);
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_recommended_fills_lists() {
        let prefs = Preferences::recommended();
        assert_eq!(prefs.distracting_websites.len(), 8);
        assert_eq!(prefs.focus_techniques.len(), 6);
        assert_eq!(prefs.focus_techniques[0], "Pomodoro Technique");
    }

    #[test]
    fn test_time_format() {
        assert!(is_valid_time("09:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:00"));
        assert!(!is_valid_time("09:60"));
        assert!(!is_valid_time("noon"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut prefs = Preferences::default();
        prefs.default_break_duration = 0;
        assert!(matches!(prefs.validate(), Err(StudyError::Preferences(_))));

        let mut prefs = Preferences::default();
        prefs.preferred_study_times.push("7pm".to_string());
        assert!(prefs.validate().is_err());
    }
}
