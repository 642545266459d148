//! Dashboard state owner.
//!
//! The controller is the only writer of [`DashboardState`]. Every refresh
//! builds a complete replacement state and assigns it in one statement, so
//! a snapshot can never observe a half-updated view. The refresh loop in
//! [`crate::refresh`] serializes all calls.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use stratwatch_common::settings::{SettingsError, UserSettings};
use stratwatch_common::types::{DashboardState, StoryCard};

use crate::feed::{FeedGate, FeedSlot, FeedStatus, PullOutcome};
use crate::notify::{Notice, Notify};
use crate::traits::DashboardSource;
use crate::transform::{stats_from_status, story_card_from_summary, threads_from_connections};

/// What a settings update changed, from the refresh loop's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsApplied {
    /// The periodic timer must be rearmed and a load re-triggered.
    pub rearm: bool,
}

pub struct DashboardController {
    source: Arc<dyn DashboardSource>,
    notifier: Box<dyn Notify>,
    state: DashboardState,
    feed: FeedGate,
}

impl DashboardController {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        notifier: Box<dyn Notify>,
        settings: UserSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            state: DashboardState::initial(settings, Utc::now()),
            feed: FeedGate::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn settings(&self) -> &UserSettings {
        &self.state.user_settings
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.feed.status(Utc::now())
    }

    /// One full refresh cycle: Loading -> fetch -> transform -> replace.
    ///
    /// On failure the previous stories, threads, and stats are carried into
    /// the replacement state untouched; only the loading flag and the error
    /// text change.
    pub async fn load_dashboard_data(&mut self) {
        self.state.loading = true;
        let now = Utc::now();

        match self.source.fetch_dashboard().await {
            Ok(payload) => {
                if payload.top_stories.is_empty() {
                    self.notify(Notice::warning(
                        "No Stories Available",
                        "No strategic stories are currently available in the system".to_string(),
                    ))
                    .await;
                }

                let stories: Vec<StoryCard> = payload
                    .top_stories
                    .iter()
                    .take(self.state.user_settings.top_stories_count)
                    .map(|story| story_card_from_summary(story, now))
                    .collect();
                let connected_threads = threads_from_connections(&payload.strategic_threads, now);
                let stats =
                    stats_from_status(&payload.processing_status, &payload.recent_analysis, now);
                let loaded = stories.len();

                self.state = DashboardState {
                    stories,
                    connected_threads,
                    stats,
                    user_settings: self.state.user_settings.clone(),
                    loading: false,
                    last_updated: now,
                    error: None,
                };

                info!(stories = loaded, "dashboard refreshed");
                self.notify(Notice::info(
                    "Dashboard Updated",
                    format!("Loaded {loaded} strategic stories"),
                ))
                .await;
            }
            Err(err) => {
                warn!(error = %err, "dashboard load failed");

                self.state = DashboardState {
                    loading: false,
                    error: Some("Failed to load dashboard data".to_string()),
                    ..self.state.clone()
                };

                self.notify(Notice::error(
                    "Error Loading Data",
                    format!("Failed to load dashboard data: {err}"),
                ))
                .await;
            }
        }
    }

    /// Awaitable alias for the manual refresh button.
    pub async fn refresh_dashboard(&mut self) {
        self.load_dashboard_data().await;
    }

    /// Validate and apply new user settings. Prior settings are kept on
    /// rejection.
    pub fn update_user_settings(
        &mut self,
        settings: UserSettings,
    ) -> Result<SettingsApplied, SettingsError> {
        settings.validate()?;

        let current = &self.state.user_settings;
        let rearm = settings.refresh_interval_minutes != current.refresh_interval_minutes
            || settings.top_stories_count != current.top_stories_count;

        self.state.user_settings = settings;
        Ok(SettingsApplied { rearm })
    }

    /// Request a manual feed pull. A denied request performs no work and
    /// surfaces an unavailability notice instead.
    pub async fn request_feed_pull(&mut self) -> PullOutcome {
        let outcome = self.feed.request_pull(Utc::now());
        match &outcome {
            PullOutcome::Started => {
                self.notify(Notice::info(
                    "Pulling New Feed",
                    "Fetching the latest strategic intelligence".to_string(),
                ))
                .await;
            }
            PullOutcome::Unavailable { retry_at } => {
                self.notify(Notice::warning(
                    "Refresh Unavailable",
                    format!("Manual refresh is available once per day; next at {retry_at}"),
                ))
                .await;
            }
        }
        outcome
    }

    /// Finish the pull indicator; the feed selector pins to a custom
    /// timestamp.
    pub fn complete_feed_pull(&mut self) {
        self.feed.complete_pull(Utc::now());
    }

    pub fn select_feed_slot(&mut self, slot: FeedSlot) {
        self.feed.select_slot(slot);
    }

    async fn notify(&self, notice: Notice) {
        if let Err(err) = self.notifier.send(&notice).await {
            warn!(error = %err, "notice delivery failed");
        }
    }
}
