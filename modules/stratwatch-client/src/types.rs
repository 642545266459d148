use serde::Deserialize;

// Wire payloads for the intelligence backend. Analysis fields are routinely
// missing or empty while the pipeline is mid-run, so everything optional is
// tolerant: `#[serde(default)]` and coalescing happens in the transform layer.

// --- Query parameters ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceFilter {
    High,
    Medium,
    Emerging,
}

impl ImportanceFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportanceFilter::High => "HIGH",
            ImportanceFilter::Medium => "MEDIUM",
            ImportanceFilter::Emerging => "EMERGING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Analyzed,
    Collected,
    Approved,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Analyzed => "analyzed",
            StatusFilter::Collected => "collected",
            StatusFilter::Approved => "approved",
        }
    }
}

/// Filters for the article listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub importance: Option<ImportanceFilter>,
    pub category: Option<String>,
    pub status: Option<StatusFilter>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ArticleQuery {
    /// Render as a query string with a leading `?`, or an empty string when
    /// no filters are set. Parameter order is fixed.
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(importance) = self.importance {
            params.push(format!("importance={}", importance.as_str()));
        }
        if let Some(category) = &self.category {
            params.push(format!("category={category}"));
        }
        if let Some(status) = self.status {
            params.push(format!("status={}", status.as_str()));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset {
            params.push(format!("offset={offset}"));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

// --- /api/dashboard ---

/// Aggregate dashboard payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub top_stories: Vec<StorySummary>,
    #[serde(default)]
    pub strategic_threads: Vec<ThreadConnection>,
    #[serde(default)]
    pub recent_analysis: Vec<RecentAnalysis>,
    #[serde(default)]
    pub processing_status: PipelineStatus,
}

/// One ranked story from the aggregate payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorySummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub strategic_takeaway: Option<String>,
    #[serde(default)]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub impact_analysis: Option<String>,
    #[serde(default)]
    pub timing_analysis: Option<String>,
    #[serde(default)]
    pub players_analysis: Option<String>,
    #[serde(default)]
    pub precedent_analysis: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub importance_level: Option<String>,
}

/// One pairwise story connection. The aggregate payload carries these flat;
/// thread grouping happens client-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadConnection {
    #[serde(default)]
    pub primary_title: String,
    #[serde(default)]
    pub connected_title: String,
    #[serde(default)]
    pub relationship_strength: f64,
    #[serde(default)]
    pub connection_type: Option<String>,
    #[serde(default)]
    pub primary_takeaway: Option<String>,
    #[serde(default)]
    pub connected_takeaway: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentAnalysis {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub importance_level: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Pipeline counters embedded in the aggregate payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineStatus {
    #[serde(default)]
    pub active_sessions: u32,
    #[serde(default)]
    pub articles_in_pipeline: u32,
    /// Epoch seconds of the last pipeline update.
    #[serde(default)]
    pub last_update: i64,
}

// --- /api/articles ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListResponse {
    #[serde(default)]
    pub articles: Vec<ArticleSummary>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub strategic_takeaway: Option<String>,
    #[serde(default)]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub impact_analysis: Option<String>,
    #[serde(default)]
    pub timing_analysis: Option<String>,
    #[serde(default)]
    pub players_analysis: Option<String>,
    #[serde(default)]
    pub precedent_analysis: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub importance_level: Option<String>,
    #[serde(default)]
    pub connection_count: u32,
}

// --- /api/articles/{id} ---

/// Full article detail, the only payload that carries nested connections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub strategic_takeaway: Option<String>,
    #[serde(default)]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub impact_analysis: Option<String>,
    #[serde(default)]
    pub timing_analysis: Option<String>,
    #[serde(default)]
    pub players_analysis: Option<String>,
    #[serde(default)]
    pub precedent_analysis: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub importance_level: Option<String>,
    #[serde(default)]
    pub connections: Vec<ArticleConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleConnection {
    #[serde(default)]
    pub connected_title: String,
    #[serde(default)]
    pub connected_id: String,
    #[serde(default)]
    pub relationship_strength: f64,
    #[serde(default)]
    pub connection_type: Option<String>,
    #[serde(default)]
    pub connected_takeaway: Option<String>,
}

// --- /api/categories ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_code: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub article_count: u32,
    #[serde(default)]
    pub avg_importance: f64,
    #[serde(default)]
    pub priority_order: u32,
}

// --- /api/processing/status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    #[default]
    Collection,
    Summary,
    Filter,
    Analysis,
    Complete,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub stage: PipelineStage,
    #[serde(default)]
    pub progress_percent: f64,
    #[serde(default)]
    pub current_article_count: u32,
    #[serde(default)]
    pub total_articles: u32,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub estimated_completion: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Free-form error records; shape varies by pipeline stage.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

// --- /api/stories/connections/{id} ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionGraph {
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub connections: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub source_article_id: String,
    #[serde(default)]
    pub target_article_id: String,
    #[serde(rename = "type", default)]
    pub edge_type: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
}
