use std::net::SocketAddr;
use std::time::Duration;

use ye_server::{AppState, Config, api, utils::logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Starting ye-server"
    );
    if config.trust_proxy {
        tracing::info!("Client addresses taken from X-Forwarded-For");
    }
    if !config.is_production() {
        tracing::warn!("Running in {} mode", config.environment);
    }

    let state = AppState::new(&config).await?;

    // Periodic rate-limiter cleanup
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::build_app(state, &config.cors_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown signal received");
}
