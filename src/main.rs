use anyhow::{Context, Result};
use questionnaire::config::Config;
use questionnaire::server::{self, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("questionnaire=info".parse()?),
        )
        .init();

    info!("Starting questionnaire service");

    let config = Config::from_env()?;
    info!(
        "Serving sources from {}, storing answers in {}",
        config.data_dir.display(),
        config.answers_directory.display()
    );

    // Refuse to serve with a broken schema, catalog or template set
    let state = AppState::initialize(config)
        .await
        .context("Startup check failed")?;
    info!("✓ Sources verified");

    server::serve(Arc::new(state)).await
}
