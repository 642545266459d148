// Test mocks for the dashboard refresh pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockSource (DashboardSource): scripted payload or failure, with a fetch counter
// - RecordingNotify (Notify): collects notices for assertions
//
// Plus fixture builders for wire payloads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stratwatch_client::types::{
    DashboardResponse, PipelineStatus, RecentAnalysis, StorySummary, ThreadConnection,
};
use stratwatch_client::ApiError;

use crate::notify::{Notice, Notify};
use crate::traits::DashboardSource;

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// What the mock returns on the next fetch.
pub enum MockReply {
    Payload(DashboardResponse),
    HttpStatus(u16),
    NetworkDown,
}

/// Scripted dashboard source. Counts fetches; the reply can be swapped
/// mid-test to flip between success and failure.
pub struct MockSource {
    reply: Mutex<MockReply>,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn with_payload(payload: DashboardResponse) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(MockReply::Payload(payload)),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn with_http_status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(MockReply::HttpStatus(status)),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn with_network_failure() -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(MockReply::NetworkDown),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn set_reply(&self, reply: MockReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardSource for MockSource {
    async fn fetch_dashboard(&self) -> Result<DashboardResponse, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &*self.reply.lock().unwrap() {
            MockReply::Payload(payload) => Ok(payload.clone()),
            MockReply::HttpStatus(status) => Err(ApiError::Http {
                status: *status,
                message: "simulated backend failure".to_string(),
            }),
            MockReply::NetworkDown => {
                Err(ApiError::Network("connection refused".to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingNotify
// ---------------------------------------------------------------------------

/// Notice recorder. Clone freely; all clones share one log.
#[derive(Clone, Default)]
pub struct RecordingNotify {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.title == title)
    }
}

#[async_trait]
impl Notify for RecordingNotify {
    async fn send(&self, notice: &Notice) -> anyhow::Result<()> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A fully-populated story summary.
pub fn story(id: &str, title: &str) -> StorySummary {
    StorySummary {
        id: id.to_string(),
        title: Some(title.to_string()),
        strategic_takeaway: Some(format!("{title}: strategic takeaway")),
        importance_level: Some("HIGH".to_string()),
        importance_score: Some(88.0),
        url: Some(format!("https://example.com/{id}")),
        publish_date: Some("2025-06-20T06:00:00Z".to_string()),
        ..Default::default()
    }
}

pub fn connection(
    primary: &str,
    connected: &str,
    strength: f64,
    label: Option<&str>,
) -> ThreadConnection {
    ThreadConnection {
        primary_title: primary.to_string(),
        connected_title: connected.to_string(),
        relationship_strength: strength,
        connection_type: label.map(str::to_string),
        ..Default::default()
    }
}

/// An aggregate payload with `stories` top stories and healthy counters.
pub fn dashboard_payload(stories: usize) -> DashboardResponse {
    DashboardResponse {
        top_stories: (0..stories)
            .map(|i| story(&format!("s{i}"), &format!("Story {i}")))
            .collect(),
        strategic_threads: vec![
            connection("Story 0", "Story 1", 0.8, Some("Compute Race")),
            connection("Story 1", "Story 2", 0.6, Some("Compute Race")),
        ],
        recent_analysis: vec![RecentAnalysis::default(); 3],
        processing_status: PipelineStatus {
            active_sessions: 2,
            articles_in_pipeline: 7,
            last_update: 1_750_000_000,
        },
    }
}
