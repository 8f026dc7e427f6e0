mod auth;
mod config;
mod error;
mod handlers;
mod router;
mod state;

use std::sync::Arc;
use std::time::Duration;

use config::Config;
use router::create_router;
use state::AppState;
use store::postgres::PgStore;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "fatal configuration error");
        anyhow::anyhow!(e)
    })?;

    tracing::info!("starting loyalty accrual gateway");

    let store = Arc::new(PgStore::connect(&config.database_uri).await?) as Arc<dyn store::Store>;
    let state = AppState::new(store.clone(), config.secret_key.clone());
    let app = create_router(state);

    let cancellation = CancellationToken::new();
    let reconciler_handle = tokio::spawn(reconciler::run(
        store,
        config.accrual_system_address.clone(),
        cancellation.clone(),
    ));

    let listener = TcpListener::bind(&config.run_address).await?;
    tracing::info!(address = %config.run_address, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancellation.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(1), reconciler_handle).await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining");
}
