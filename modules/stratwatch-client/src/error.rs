use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure before a status line was read.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. The body text is carried for diagnostics.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was an HTML document. Almost always a routing or deployment
    /// misconfiguration in front of the API, not a data problem.
    #[error("{endpoint} returned HTML instead of JSON; check backend routing")]
    HtmlBody { endpoint: String },

    /// The body was not parseable JSON.
    #[error("invalid JSON from {endpoint}: {message}")]
    Json { endpoint: String, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
