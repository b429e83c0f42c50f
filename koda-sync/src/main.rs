//! koda-sync — catalog/provider synchronization service
//!
//! Long-running service that:
//! - Reconciles the shop catalog with the payment provider's product/price
//!   catalog through a database-backed job queue
//! - Exposes the queue API (process / enqueue / stats / cleanup)
//! - Optionally drives the processor itself on a poll interval

mod api;
mod auth;
mod config;
mod db;
mod error;
mod money;
mod queue;
mod state;
mod stripe;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "koda_sync=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting koda-sync (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Build router
    let app = api::create_router(state.clone());

    // Background queue poller (0 = disabled, driven by external cron only)
    if config.queue_poll_interval_secs > 0 {
        let poll_state = state.clone();
        let interval_secs = config.queue_poll_interval_secs;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                match queue::process_queue(&poll_state, poll_state.queue_batch_size).await {
                    Ok(summary) if summary.processed > 0 => {
                        tracing::info!(
                            processed = summary.processed,
                            successful = summary.successful,
                            failed = summary.failed,
                            "Poller batch finished"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let app_err: shared::error::AppError = e.into();
                        tracing::error!("Poller batch failed: {app_err}");
                    }
                }
            }
        });
        tracing::info!(
            interval_secs = config.queue_poll_interval_secs,
            "Queue poller started"
        );
    }

    // Start HTTP server
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("koda-sync HTTP listening on {http_addr}");

    axum::serve(http_listener, app).await?;

    Ok(())
}
