use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod evaluator;
mod models;
mod registry;
mod scores;
mod web;

use config::Config;
use registry::SportRegistry;
use scores::{EspnScoreboard, ScoreboardProvider};
use web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let registry = Arc::new(SportRegistry::builtin());
    config.validate(&registry)?;

    let sport_ids: Vec<&str> = registry.list().iter().map(|s| s.id.as_str()).collect();
    info!("Registered {} sports: {:?}", sport_ids.len(), sport_ids);

    let provider: Arc<dyn ScoreboardProvider> = Arc::new(EspnScoreboard::new(
        &config.espn_base_url,
        config.upstream_timeout(),
        config.upstream_retries,
    )?);
    info!(
        "Scoreboard provider: {} at {} (timeout {:?}, {} retries)",
        provider.name(),
        config.espn_base_url,
        config.upstream_timeout(),
        config.upstream_retries
    );

    let app = web::router(AppState {
        registry,
        provider,
        default_sport: config.default_sport.clone(),
    });

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run the server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
