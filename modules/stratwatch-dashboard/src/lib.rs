pub mod controller;
pub mod feed;
pub mod notify;
pub mod refresh;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod transform;

pub use controller::{DashboardController, SettingsApplied};
pub use feed::{FeedSlot, FeedStatus, PullOutcome};
pub use notify::{LogNotify, Notice, NoticeSeverity, Notify};
pub use refresh::{spawn, DashboardHandle, HandleError};
pub use traits::DashboardSource;
