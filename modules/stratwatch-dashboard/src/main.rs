use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stratwatch_client::IntelClient;
use stratwatch_common::Config;
use stratwatch_dashboard::{spawn, DashboardController, LogNotify};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stratwatch=info".parse()?))
        .init();

    info!("StratWatch dashboard starting...");

    let config = Config::from_env();
    info!(backend_url = %config.backend_url, "API client configured");

    let client = IntelClient::new(config.backend_url.clone());
    let controller = DashboardController::new(
        Arc::new(client),
        Box::new(LogNotify),
        config.settings.clone(),
    );

    let (handle, task) = spawn(controller);

    let state = handle.snapshot().await?;
    info!(
        stories = state.stories.len(),
        threads = state.connected_threads.len(),
        error = state.error.as_deref().unwrap_or("none"),
        "initial load complete"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    handle.shutdown().await;
    task.await?;

    Ok(())
}
