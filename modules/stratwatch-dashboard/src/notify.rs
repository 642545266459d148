use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible notification raised by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: NoticeSeverity,
}

impl Notice {
    pub fn info(title: &str, body: String) -> Self {
        Self { title: title.to_string(), body, severity: NoticeSeverity::Info }
    }

    pub fn warning(title: &str, body: String) -> Self {
        Self { title: title.to_string(), body, severity: NoticeSeverity::Warning }
    }

    pub fn error(title: &str, body: String) -> Self {
        Self { title: title.to_string(), body, severity: NoticeSeverity::Error }
    }
}

/// Pluggable delivery backend for notices.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, notice: &Notice) -> anyhow::Result<()>;
}

/// Default backend: structured log lines. A UI shell swaps in its own.
pub struct LogNotify;

#[async_trait]
impl Notify for LogNotify {
    async fn send(&self, notice: &Notice) -> anyhow::Result<()> {
        match notice.severity {
            NoticeSeverity::Info => info!(title = %notice.title, "{}", notice.body),
            NoticeSeverity::Warning => warn!(title = %notice.title, "{}", notice.body),
            NoticeSeverity::Error => error!(title = %notice.title, "{}", notice.body),
        }
        Ok(())
    }
}
