//! Command-driven refresh loop.
//!
//! The loop owns the controller; presentation talks to it through a
//! cloneable [`DashboardHandle`]. The periodic timer, its rearm on settings
//! change, and the feed-pull indicator all live inside the loop's `select!`,
//! so tearing the loop down cancels every timer with it. Because the loop
//! handles one thing at a time, refreshes coalesce: a second request queues
//! behind the one in flight instead of overlapping it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval};
use tracing::info;

use stratwatch_common::settings::{SettingsError, UserSettings};
use stratwatch_common::types::DashboardState;

use crate::controller::DashboardController;
use crate::feed::{FeedSlot, FeedStatus, PullOutcome, PULL_INDICATOR_SECS};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum Command {
    Refresh {
        done: oneshot::Sender<()>,
    },
    UpdateSettings {
        settings: UserSettings,
        done: oneshot::Sender<Result<(), SettingsError>>,
    },
    PullFeed {
        done: oneshot::Sender<PullOutcome>,
    },
    SelectSlot {
        slot: FeedSlot,
    },
    Snapshot {
        reply: oneshot::Sender<DashboardState>,
    },
    FeedStatus {
        reply: oneshot::Sender<FeedStatus>,
    },
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    /// The refresh loop has shut down; no further commands can be served.
    #[error("dashboard refresh loop has shut down")]
    LoopGone,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Presentation-facing handle to a running refresh loop.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<Command>,
}

impl DashboardHandle {
    /// Trigger a refresh and wait for the cycle to finish.
    pub async fn refresh_dashboard(&self) -> Result<(), HandleError> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Command::Refresh { done })
            .await
            .map_err(|_| HandleError::LoopGone)?;
        wait.await.map_err(|_| HandleError::LoopGone)
    }

    /// Validate and apply new settings. An interval or story-count change
    /// rearms the periodic timer and triggers a fresh load.
    pub async fn update_user_settings(&self, settings: UserSettings) -> Result<(), HandleError> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Command::UpdateSettings { settings, done })
            .await
            .map_err(|_| HandleError::LoopGone)?;
        wait.await.map_err(|_| HandleError::LoopGone)??;
        Ok(())
    }

    /// Request a manual feed pull.
    pub async fn pull_feed(&self) -> Result<PullOutcome, HandleError> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Command::PullFeed { done })
            .await
            .map_err(|_| HandleError::LoopGone)?;
        wait.await.map_err(|_| HandleError::LoopGone)
    }

    pub async fn select_feed_slot(&self, slot: FeedSlot) -> Result<(), HandleError> {
        self.tx
            .send(Command::SelectSlot { slot })
            .await
            .map_err(|_| HandleError::LoopGone)
    }

    /// Clone of the current dashboard state.
    pub async fn snapshot(&self) -> Result<DashboardState, HandleError> {
        let (reply, wait) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| HandleError::LoopGone)?;
        wait.await.map_err(|_| HandleError::LoopGone)
    }

    pub async fn feed_status(&self) -> Result<FeedStatus, HandleError> {
        let (reply, wait) = oneshot::channel();
        self.tx
            .send(Command::FeedStatus { reply })
            .await
            .map_err(|_| HandleError::LoopGone)?;
        wait.await.map_err(|_| HandleError::LoopGone)
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }
}

/// Spawn the refresh loop. The initial load runs before the first command
/// is served.
pub fn spawn(controller: DashboardController) -> (DashboardHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(controller, rx));
    (DashboardHandle { tx }, task)
}

fn periodic(settings: &UserSettings) -> Interval {
    let period = settings.refresh_period();
    let mut interval = time::interval_at(Instant::now() + period, period);
    // A cycle that outlasts its period must not burst-fire afterwards.
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    interval
}

async fn run(mut controller: DashboardController, mut rx: mpsc::Receiver<Command>) {
    controller.load_dashboard_data().await;

    let mut interval = periodic(controller.settings());
    let mut pull_done_at: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                controller.load_dashboard_data().await;
            }
            _ = indicator(pull_done_at), if pull_done_at.is_some() => {
                controller.complete_feed_pull();
                pull_done_at = None;
            }
            cmd = rx.recv() => {
                match cmd {
                    Some(Command::Refresh { done }) => {
                        controller.refresh_dashboard().await;
                        let _ = done.send(());
                    }
                    Some(Command::UpdateSettings { settings, done }) => {
                        match controller.update_user_settings(settings) {
                            Ok(applied) => {
                                let _ = done.send(Ok(()));
                                if applied.rearm {
                                    interval = periodic(controller.settings());
                                    controller.load_dashboard_data().await;
                                }
                            }
                            Err(err) => {
                                let _ = done.send(Err(err));
                            }
                        }
                    }
                    Some(Command::PullFeed { done }) => {
                        let outcome = controller.request_feed_pull().await;
                        let started = matches!(outcome, PullOutcome::Started);
                        let _ = done.send(outcome);
                        if started {
                            pull_done_at =
                                Some(Instant::now() + Duration::from_secs(PULL_INDICATOR_SECS));
                            controller.load_dashboard_data().await;
                        }
                    }
                    Some(Command::SelectSlot { slot }) => {
                        controller.select_feed_slot(slot);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(controller.state().clone());
                    }
                    Some(Command::FeedStatus { reply }) => {
                        let _ = reply.send(controller.feed_status());
                    }
                    Some(Command::Shutdown) | None => break,
                }
            }
        }
    }

    info!("dashboard refresh loop stopped");
}

async fn indicator(done_at: Option<Instant>) {
    match done_at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::{dashboard_payload, MockSource, RecordingNotify};

    fn spawn_with(
        source: Arc<MockSource>,
        settings: UserSettings,
    ) -> (DashboardHandle, JoinHandle<()>) {
        let controller =
            DashboardController::new(source, Box::new(RecordingNotify::new()), settings);
        spawn(controller)
    }

    /// Let the loop task drain whatever became ready, without moving time.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initial_load_runs_at_spawn() {
        let source = MockSource::with_payload(dashboard_payload(5));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        let state = handle.snapshot().await.unwrap();
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(state.stories.len(), 5);
        assert!(!state.loading);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_timer_fires_on_the_configured_interval() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.snapshot().await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        time::advance(Duration::from_secs(14 * 60)).await;
        settle().await;
        assert_eq!(source.fetch_count(), 1);

        time::advance(Duration::from_secs(61)).await;
        settle().await;
        assert_eq!(source.fetch_count(), 2);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_rearms_the_timer() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.snapshot().await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        let mut settings = UserSettings::default();
        settings.refresh_interval_minutes = 5;
        handle.update_user_settings(settings).await.unwrap();
        settle().await;
        // The settings change itself re-triggers a load.
        assert_eq!(source.fetch_count(), 2);

        time::advance(Duration::from_secs(4 * 60)).await;
        settle().await;
        assert_eq!(source.fetch_count(), 2);

        // The next automatic fetch lands within 5 minutes, not 15.
        time::advance(Duration::from_secs(70)).await;
        settle().await;
        assert_eq!(source.fetch_count(), 3);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_settings_do_not_rearm_or_reload() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.snapshot().await.unwrap();

        let mut bad = UserSettings::default();
        bad.refresh_interval_minutes = 0;
        let err = handle.update_user_settings(bad).await.unwrap_err();
        assert!(matches!(
            err,
            HandleError::Settings(SettingsError::RefreshInterval(0))
        ));

        settle().await;
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(
            handle.snapshot().await.unwrap().user_settings,
            UserSettings::default()
        );

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_is_awaitable() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.refresh_dashboard().await.unwrap();
        assert_eq!(source.fetch_count(), 2);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn second_feed_pull_within_cooldown_makes_no_network_call() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.snapshot().await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        assert!(matches!(
            handle.pull_feed().await.unwrap(),
            PullOutcome::Started
        ));
        settle().await;
        assert_eq!(source.fetch_count(), 2);

        assert!(matches!(
            handle.pull_feed().await.unwrap(),
            PullOutcome::Unavailable { .. }
        ));
        settle().await;
        assert_eq!(source.fetch_count(), 2);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn pull_indicator_completes_into_a_custom_slot() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source.clone(), UserSettings::default());

        handle.pull_feed().await.unwrap();
        settle().await;
        let status = handle.feed_status().await.unwrap();
        assert!(status.pulling);
        assert_eq!(status.slot, FeedSlot::Morning);

        time::advance(Duration::from_secs(PULL_INDICATOR_SECS + 1)).await;
        settle().await;

        let status = handle.feed_status().await.unwrap();
        assert!(!status.pulling);
        assert!(matches!(status.slot, FeedSlot::Custom(_)));

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn slot_selection_round_trips() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source, UserSettings::default());

        handle.select_feed_slot(FeedSlot::Evening).await.unwrap();
        assert_eq!(handle.feed_status().await.unwrap().slot, FeedSlot::Evening);

        handle.shutdown().await;
        task.await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop() {
        let source = MockSource::with_payload(dashboard_payload(1));
        let (handle, task) = spawn_with(source, UserSettings::default());

        handle.shutdown().await;
        task.await.unwrap();
        assert!(matches!(
            handle.refresh_dashboard().await,
            Err(HandleError::LoopGone)
        ));
    }
}
