use std::sync::Arc;

use teamreg::api::{self, AppState};
use teamreg::config::AppConfig;
use teamreg::infrastructure::repositories::SheetsWebhookSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    tracing::info!(
        webhook = %config.webhook_url,
        event_prefix = %config.event_prefix,
        relay_timeout_secs = config.relay_timeout.as_secs(),
        problem_tracks = config.problem_tracks.tracks().len(),
        "configuration loaded"
    );

    // Spreadsheet relay
    let sink = SheetsWebhookSink::new(config.webhook_url.clone(), config.relay_timeout)?;
    let state = AppState::new(Arc::new(sink), config.event_prefix.as_str())
        .with_catalog(config.problem_tracks);

    let app = api::router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
