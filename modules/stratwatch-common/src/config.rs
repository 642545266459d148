use std::env;

use crate::settings::UserSettings;

/// Deployment configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the intelligence backend REST API.
    pub backend_url: String,
    /// Initial user settings, overridable per deployment.
    pub settings: UserSettings,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing or invalid.
    pub fn from_env() -> Self {
        let defaults = UserSettings::default();
        let settings = UserSettings {
            top_stories_count: optional_env("STRATWATCH_TOP_STORIES", defaults.top_stories_count),
            refresh_interval_minutes: optional_env(
                "STRATWATCH_REFRESH_MINUTES",
                defaults.refresh_interval_minutes,
            ),
            morning_feed_hour: optional_env("STRATWATCH_MORNING_HOUR", defaults.morning_feed_hour),
            evening_feed_hour: optional_env("STRATWATCH_EVENING_HOUR", defaults.evening_feed_hour),
        };
        if let Err(err) = settings.validate() {
            panic!("invalid settings from environment: {err}");
        }

        Self {
            backend_url: required_env("STRATWATCH_BACKEND_URL"),
            settings,
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn optional_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
