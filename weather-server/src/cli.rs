use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use weather_core::{Config, provider::provider_from_config};

use crate::routes::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather proxy backend")]
pub struct Cli {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. "127.0.0.1:8081". Overrides the config file.
    #[arg(long)]
    pub listen: Option<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // Load .env before anything reads the environment, RUST_LOG included.
        let dotenv_result = dotenv::dotenv();
        init_tracing();
        if dotenv_result.is_err() {
            tracing::info!("No .env file found, using environment variables");
        }

        let mut config = Config::load(self.config.as_deref())?.with_process_env();
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }

        let provider = provider_from_config(&config).context("Cannot start weather server")?;
        let state = AppState::new(provider, config.default_location.clone());
        let app = routes::router(state, &config.allowed_origins);

        let listener = TcpListener::bind(&config.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

        tracing::info!(
            default_location = %config.default_location,
            "Weather Service Backend running on http://{}",
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Weather Service Backend stopped");
        Ok(())
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
