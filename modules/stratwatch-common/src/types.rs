use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::UserSettings;

// --- Importance ---

/// Coarse priority classification supplied by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportanceLevel {
    High,
    #[default]
    Medium,
    Emerging,
}

impl ImportanceLevel {
    /// Parse a backend label. Absent or unrecognized labels read as Medium.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("HIGH") => ImportanceLevel::High,
            Some("MEDIUM") => ImportanceLevel::Medium,
            Some("EMERGING") => ImportanceLevel::Emerging,
            _ => ImportanceLevel::Medium,
        }
    }
}

impl std::fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportanceLevel::High => write!(f, "HIGH"),
            ImportanceLevel::Medium => write!(f, "MEDIUM"),
            ImportanceLevel::Emerging => write!(f, "EMERGING"),
        }
    }
}

// --- Story entities ---

/// The four labeled analysis fields rendered on every story card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicDimensions {
    pub impact: String,
    pub timing: String,
    pub players: String,
    pub precedent: String,
}

/// Lightweight reference to a related story, shown in the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedStory {
    pub id: String,
    pub title: String,
    pub relative_time: String,
    pub exact_date: NaiveDate,
    pub importance: ImportanceLevel,
}

/// A cited source with its display excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub name: String,
    pub url: String,
    pub excerpt: String,
    pub published_at: DateTime<Utc>,
}

/// One view-ready story. Rebuilt from scratch on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryCard {
    pub id: String,
    pub title: String,
    pub importance: ImportanceLevel,
    pub strategic_takeaway: String,
    pub strategic_dimensions: StrategicDimensions,
    pub connected_stories: Vec<ConnectedStory>,
    pub sources: Vec<SourceRef>,
    pub published_at: DateTime<Utc>,
    /// Numeric rank, 0-100. Zero when the backend omits it.
    pub score: f64,
}

// --- Strategic threads ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: DateTime<Utc>,
    pub event: String,
    pub story_id: String,
}

/// A cluster of related story connections sharing a label, summarized by
/// mean connection strength and a synthesized timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicThread {
    pub id: String,
    pub title: String,
    pub story_ids: Vec<String>,
    pub timeline_events: Vec<TimelineEvent>,
    /// Invariant: 0.0 <= strength <= 1.0.
    pub strength: f64,
}

// --- Dashboard aggregates ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_stories_analyzed: u64,
    pub sources_monitored: u32,
    pub alerts_count: u32,
    pub last_update_time: DateTime<Utc>,
}

/// The whole dashboard view model. The refresh controller is the only
/// writer; everything else reads cloned snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub stories: Vec<StoryCard>,
    pub connected_threads: Vec<StrategicThread>,
    pub stats: DashboardStats,
    pub user_settings: UserSettings,
    pub loading: bool,
    pub last_updated: DateTime<Utc>,
    pub error: Option<String>,
}

impl DashboardState {
    /// State before the first load: loading, with empty collections.
    pub fn initial(user_settings: UserSettings, now: DateTime<Utc>) -> Self {
        Self {
            stories: Vec::new(),
            connected_threads: Vec::new(),
            stats: DashboardStats {
                total_stories_analyzed: 0,
                sources_monitored: 0,
                alerts_count: 0,
                last_update_time: now,
            },
            user_settings,
            loading: true,
            last_updated: now,
            error: None,
        }
    }

    /// Whether any refresh has ever delivered data. Presentation uses this
    /// to pick between a persistent error page and a transient notice.
    pub fn has_data(&self) -> bool {
        !self.stories.is_empty() || !self.connected_threads.is_empty()
    }
}
