use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Drop all drinks and reseed before serving")]
    pub reset_db: bool,
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;

    if args.reset_db {
        tracing::warn!("--reset-db given: dropping all drinks");
        state.store.reset().await.context("failed to reset drink store")?;
    }

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Coffee Shop API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
