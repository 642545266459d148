//! Manual "pull new feed" gate, distinct from the automatic periodic
//! refresh. One pull per day; the pulling indicator runs for a fixed span
//! and is not tied to fetch completion.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Manual pulls are limited to once per this many hours.
const PULL_COOLDOWN_HOURS: i64 = 24;

/// How long the pulling indicator runs before the selector flips to a
/// custom timestamp.
pub const PULL_INDICATOR_SECS: u64 = 3;

/// Which daily feed the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSlot {
    Morning,
    Evening,
    /// Synthesized timestamp from a completed manual pull.
    Custom(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PullOutcome {
    Started,
    /// Cooldown still active; no work was performed.
    Unavailable { retry_at: DateTime<Utc> },
}

/// Read-only view of the gate for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedStatus {
    pub slot: FeedSlot,
    pub pulling: bool,
    /// When the next manual pull becomes available. `None` means now.
    pub next_pull_at: Option<DateTime<Utc>>,
}

/// Tracks the manual-pull cooldown and the selected feed slot.
#[derive(Debug)]
pub struct FeedGate {
    slot: FeedSlot,
    pulling: bool,
    last_pull: Option<DateTime<Utc>>,
}

impl FeedGate {
    pub fn new() -> Self {
        Self {
            slot: FeedSlot::Morning,
            pulling: false,
            last_pull: None,
        }
    }

    pub fn select_slot(&mut self, slot: FeedSlot) {
        self.slot = slot;
    }

    /// Request a manual pull. A denied request performs no work.
    pub fn request_pull(&mut self, now: DateTime<Utc>) -> PullOutcome {
        if let Some(last) = self.last_pull {
            let retry_at = last + Duration::hours(PULL_COOLDOWN_HOURS);
            if now < retry_at {
                return PullOutcome::Unavailable { retry_at };
            }
        }
        self.last_pull = Some(now);
        self.pulling = true;
        PullOutcome::Started
    }

    /// Finish the pull indicator and pin the selector to a synthesized
    /// custom timestamp.
    pub fn complete_pull(&mut self, now: DateTime<Utc>) {
        self.pulling = false;
        self.slot = FeedSlot::Custom(now);
    }

    pub fn status(&self, now: DateTime<Utc>) -> FeedStatus {
        let next_pull_at = self
            .last_pull
            .map(|last| last + Duration::hours(PULL_COOLDOWN_HOURS))
            .filter(|retry_at| *retry_at > now);
        FeedStatus {
            slot: self.slot,
            pulling: self.pulling,
            next_pull_at,
        }
    }
}

impl Default for FeedGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pull_starts_and_arms_the_cooldown() {
        let mut gate = FeedGate::new();
        let now = Utc::now();

        assert_eq!(gate.request_pull(now), PullOutcome::Started);
        let status = gate.status(now);
        assert!(status.pulling);
        assert_eq!(status.next_pull_at, Some(now + Duration::hours(24)));
    }

    #[test]
    fn second_pull_within_24_hours_is_denied() {
        let mut gate = FeedGate::new();
        let now = Utc::now();

        gate.request_pull(now);
        let later = now + Duration::hours(23);
        assert_eq!(
            gate.request_pull(later),
            PullOutcome::Unavailable { retry_at: now + Duration::hours(24) }
        );
    }

    #[test]
    fn pull_becomes_available_again_after_24_hours() {
        let mut gate = FeedGate::new();
        let now = Utc::now();

        gate.request_pull(now);
        let next_day = now + Duration::hours(24);
        assert_eq!(gate.request_pull(next_day), PullOutcome::Started);
    }

    #[test]
    fn completion_pins_a_custom_slot() {
        let mut gate = FeedGate::new();
        let now = Utc::now();

        gate.request_pull(now);
        let done = now + Duration::seconds(3);
        gate.complete_pull(done);

        let status = gate.status(done);
        assert!(!status.pulling);
        assert_eq!(status.slot, FeedSlot::Custom(done));
    }

    #[test]
    fn slot_selection_is_free_of_the_cooldown() {
        let mut gate = FeedGate::new();
        gate.select_slot(FeedSlot::Evening);
        assert_eq!(gate.status(Utc::now()).slot, FeedSlot::Evening);
    }
}
