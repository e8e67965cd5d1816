pub mod accounts;
pub mod api;
pub mod blood_requests;
pub mod config;
pub mod core_state;
pub mod crypto;
pub mod dashboard;
pub mod db;
pub mod donors;
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Prepare the database and serve until a shutdown signal arrives.
pub async fn run(config: config::ServerConfig) -> anyhow::Result<()> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = core_state::CoreState::from_config(&config);
    core.initialize()?;

    api::serve(Arc::new(core), config.bind, &config.cors_origins).await?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
