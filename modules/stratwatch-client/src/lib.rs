pub mod error;
pub mod types;

pub use error::{ApiError, Result};
pub use types::{
    ArticleDetail, ArticleListResponse, ArticleQuery, CategoriesResponse, ConnectionGraph,
    DashboardResponse, ImportanceFilter, SessionStatus, StatusFilter,
};

use serde::de::DeserializeOwned;

/// REST client for the strategic intelligence backend.
///
/// One request, one typed failure: transport errors, non-2xx statuses,
/// HTML-instead-of-JSON bodies, and undecodable JSON each map to their own
/// [`ApiError`] variant. No retries at this layer.
pub struct IntelClient {
    client: reqwest::Client,
    base_url: String,
}

impl IntelClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "API request");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        // An HTML body behind a 2xx means the request was swallowed by a
        // front-end router or a misdeployed reverse proxy. Sniff it before
        // the JSON parser turns it into a generic parse error.
        let head = body.trim_start();
        if head.starts_with("<!DOCTYPE") || head.starts_with("<html") {
            return Err(ApiError::HtmlBody {
                endpoint: endpoint.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Json {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch the aggregate dashboard payload: top stories, strategic
    /// threads, recent analysis, and pipeline status in one round trip.
    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        self.request("/api/dashboard").await
    }

    /// Fetch a filtered, paginated article listing.
    pub async fn articles(&self, query: &ArticleQuery) -> Result<ArticleListResponse> {
        let endpoint = format!("/api/articles{}", query.to_query_string());
        self.request(&endpoint).await
    }

    /// Fetch one article with its connections.
    pub async fn article_detail(&self, article_id: &str) -> Result<ArticleDetail> {
        self.request(&format!("/api/articles/{article_id}")).await
    }

    /// Fetch the strategic category list.
    pub async fn categories(&self) -> Result<CategoriesResponse> {
        self.request("/api/categories").await
    }

    /// Fetch processing-session status, optionally scoped to one session.
    pub async fn processing_status(&self, session_id: Option<&str>) -> Result<SessionStatus> {
        let endpoint = match session_id {
            Some(id) => format!("/api/processing/status?session_id={id}"),
            None => "/api/processing/status".to_string(),
        };
        self.request(&endpoint).await
    }

    /// Fetch the connection graph for one article.
    pub async fn article_connections(&self, article_id: &str) -> Result<ConnectionGraph> {
        self.request(&format!("/api/stories/connections/{article_id}"))
            .await
    }
}
