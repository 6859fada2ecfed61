//! drugsim web server
//!
//! Run with: cargo run -p drugsim-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use drugsim_web::{config::Config, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drugsim=debug,info")),
        )
        .init();

    info!("Starting drugsim web server...");

    let config = Config::load()?;
    info!(
        "Simulation variant: {} (seed: {})",
        config.simulation.variant,
        config.simulation.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string())
    );

    let addr = config.bind_addr()?;
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
