use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::Postgres;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::pool::DbPool;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("connection acquisition was cancelled")]
    Cancelled,
    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] sqlx::Error),
}

/// Hands out one live connection per store call.
///
/// The returned connection goes back to its pool when dropped, so every exit path of the
/// caller releases it.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn acquire(&self, cancel: &CancellationToken) -> Result<PoolConnection<Postgres>, AcquireError>;
}

#[async_trait]
impl ConnectionProvider for DbPool {
    async fn acquire(&self, cancel: &CancellationToken) -> Result<PoolConnection<Postgres>, AcquireError> {
        match cancel.run_until_cancelled(sqlx::Pool::acquire(self)).await {
            Some(conn) => Ok(conn?),
            None => Err(AcquireError::Cancelled),
        }
    }
}
