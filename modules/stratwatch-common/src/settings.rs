use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounds for the top-stories setting.
pub const TOP_STORIES_MIN: usize = 1;
pub const TOP_STORIES_MAX: usize = 10;

/// Floor for the automatic refresh interval, in minutes.
pub const REFRESH_INTERVAL_MIN_MINUTES: u32 = 1;

const PASSWORD_MIN_CHARS: usize = 6;

/// Per-user dashboard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub top_stories_count: usize,
    pub refresh_interval_minutes: u32,
    pub morning_feed_hour: u8,
    pub evening_feed_hour: u8,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            top_stories_count: 5,
            refresh_interval_minutes: 15,
            morning_feed_hour: 7,
            evening_feed_hour: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("story count must be between 1 and 10, got {0}")]
    StoryCount(usize),

    #[error("refresh interval must be at least 1 minute, got {0}")]
    RefreshInterval(u32),

    #[error("feed hour must be between 0 and 23, got {0}")]
    FeedHour(u8),
}

impl UserSettings {
    /// Validate at the point of edit. Rejected settings are never applied.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(TOP_STORIES_MIN..=TOP_STORIES_MAX).contains(&self.top_stories_count) {
            return Err(SettingsError::StoryCount(self.top_stories_count));
        }
        if self.refresh_interval_minutes < REFRESH_INTERVAL_MIN_MINUTES {
            return Err(SettingsError::RefreshInterval(self.refresh_interval_minutes));
        }
        for hour in [self.morning_feed_hour, self.evening_feed_hour] {
            if hour > 23 {
                return Err(SettingsError::FeedHour(hour));
            }
        }
        Ok(())
    }

    /// Period of the automatic refresh timer.
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_interval_minutes) * 60)
    }
}

/// A requested password change. Validation only; credentials are forwarded
/// to the hosted identity provider, never stored here.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current: String,
    pub new_password: String,
    pub confirm: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("new passwords do not match")]
    Mismatch,

    #[error("current password is required")]
    CurrentRequired,

    #[error("new password must be at least 6 characters")]
    TooShort,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.new_password != self.confirm {
            return Err(PasswordError::Mismatch);
        }
        if self.current.is_empty() {
            return Err(PasswordError::CurrentRequired);
        }
        if self.new_password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(PasswordError::TooShort);
        }
        Ok(())
    }
}
