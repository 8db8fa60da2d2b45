pub mod api;
pub mod classifier;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod monitoring;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("State initialization failed: {0}")]
    Core(#[from] core_state::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    // try_init: a second call (tests, embedding) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open the database, serve the API and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let core = Arc::new(core_state::CoreState::open(&config::database_path()?)?);
    let addr = config::bind_addr()?;

    let server = api::start_api_server_on(core, addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;

    Ok(())
}
