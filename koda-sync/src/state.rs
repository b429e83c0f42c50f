//! Application state for koda-sync

use sqlx::PgPool;

use crate::config::Config;
use crate::stripe::StripeClient;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Payment provider client
    pub stripe: StripeClient,
    /// Shared secret for the sync API
    pub sync_api_token: String,
    /// Default batch size for queue processing
    pub queue_batch_size: u32,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            stripe: StripeClient::new(config.stripe_secret_key.clone()),
            sync_api_token: config.sync_api_token.clone(),
            queue_batch_size: config.queue_batch_size,
        })
    }
}
